//! Weighted scoring for collected results.
//!
//! Every entity gets three integer components:
//!
//! ```text
//! position_score = (len - index) * position_weight(from)
//! search_score   = search_score_weight(from)
//! domain_score   = domain_score_weight(host)
//! score          = position_score + search_score + domain_score
//! ```
//!
//! `len` and `index` are taken from the entity's own backend list, so two
//! backends returning lists of different lengths score on different scales.
//! There is no cross-list normalisation.

use crate::config::SearchConfig;
use crate::types::{Entity, EntityList};

/// Overwrite every score field of `entity`.
///
/// `position` is the 0-based index of the entity in a list of `len` results.
pub fn score_entity(entity: &mut Entity, position: usize, len: usize, config: &SearchConfig) {
    let rank = len.saturating_sub(position) as i64;
    entity.position_score = rank * config.position_weight(&entity.from);
    entity.search_score = config.search_score_weight(&entity.from);
    entity.domain_score = config.domain_score_weight(&entity.host);
    entity.score = entity.position_score + entity.search_score + entity.domain_score;
}

/// Score every entity of one backend list in place.
pub fn score_list(list: &mut EntityList, config: &SearchConfig) {
    let len = list.list.len();
    for (position, entity) in list.list.iter_mut().enumerate() {
        score_entity(entity, position, len, config);
    }
}

/// Score every collected list in place.
pub fn score_lists(lists: &mut [EntityList], config: &SearchConfig) {
    for list in lists {
        score_list(list, config);
    }
}
