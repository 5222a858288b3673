//! Deterministic ranking of the merged result set.

use crate::types::Entity;

/// Sort `entities` by total score, highest first.
///
/// The sort is stable: entities with equal scores keep their input order,
/// which is backend arrival order and then each backend's own order.
pub fn rank(entities: &mut [Entity]) {
    entities.sort_by(|a, b| b.score.cmp(&a.score));
}
