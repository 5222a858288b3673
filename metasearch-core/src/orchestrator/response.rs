//! The response envelope and its assembly from collected lists.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{Entity, EntityList};

use super::rank::rank;

/// Status code of a successful (possibly partial) search.
pub const CODE_OK: i32 = 0;
/// Status code of a rejected or failed search.
pub const CODE_ERROR: i32 = -1;

/// The JSON envelope returned for every search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// [`CODE_OK`] or [`CODE_ERROR`].
    pub code: i32,
    /// Failure description, absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Wall-clock time spent on the request, in whole milliseconds.
    pub cost: u64,
    /// Merged, ranked results.
    pub data: EntityList,
}

impl AggregateResult {
    /// Merge scored lists into a ranked envelope.
    ///
    /// `data.size` is the sum of the lists' reported sizes. Entities are
    /// concatenated in list order and then ranked.
    pub fn assemble(lists: Vec<EntityList>, started: Instant) -> Self {
        let size = lists.iter().map(|l| l.size).sum();
        let mut merged: Vec<Entity> =
            Vec::with_capacity(lists.iter().map(|l| l.list.len()).sum());
        for list in lists {
            merged.extend(list.list);
        }
        rank(&mut merged);

        Self {
            code: CODE_OK,
            msg: None,
            cost: elapsed_ms(started),
            data: EntityList {
                index: 0,
                size,
                list: merged,
            },
        }
    }

    /// An error envelope with empty data.
    pub fn failure(msg: impl Into<String>, started: Instant) -> Self {
        Self {
            code: CODE_ERROR,
            msg: Some(msg.into()),
            cost: elapsed_ms(started),
            data: EntityList::empty(),
        }
    }

    /// The envelope for a request naming engines that are not registered.
    pub fn unsupported<S: AsRef<str>>(names: &[S], started: Instant) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_owned()).collect();
        Self::from_error(&SearchError::UnsupportedEngine(names), started)
    }

    /// The error envelope for a search that never started or failed.
    pub fn from_error(err: &SearchError, started: Instant) -> Self {
        Self::failure(err.to_string(), started)
    }

    /// Encode this envelope as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>, SearchError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Whether this envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored_list(from: &str, scores: &[i64]) -> EntityList {
        EntityList::from_entities(
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let mut e = Entity::new(format!("{from} {i}"), format!("https://{from}.com/{i}"), "", from);
                    e.score = *s;
                    e
                })
                .collect(),
        )
    }

    #[test]
    fn unsupported_names_every_engine() {
        let result = AggregateResult::unsupported(&["Yahoo", "Ask"], Instant::now());
        assert_eq!(result.code, CODE_ERROR);
        let msg = result.msg.as_deref().unwrap_or_default();
        assert!(msg.contains("Yahoo"));
        assert!(msg.contains("Ask"));
        assert!(result.data.list.is_empty());
        assert_eq!(result.data.size, 0);
    }

    #[test]
    fn assemble_sums_sizes_and_ranks() {
        let lists = vec![scored_list("a", &[5, 1]), scored_list("b", &[9, 5, 0])];
        let result = AggregateResult::assemble(lists, Instant::now());
        assert!(result.is_ok());
        assert_eq!(result.data.size, 5);
        assert_eq!(result.data.list.len(), 5);
        let order: Vec<&str> = result.data.list.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(order, vec!["b 0", "a 0", "b 1", "a 1", "b 2"]);
    }

    #[test]
    fn assemble_uses_reported_size() {
        let mut list = scored_list("a", &[1]);
        list.size = 40;
        let result = AggregateResult::assemble(vec![list], Instant::now());
        assert_eq!(result.data.size, 40);
        assert_eq!(result.data.list.len(), 1);
    }

    #[test]
    fn assemble_nothing_is_valid_and_empty() {
        let result = AggregateResult::assemble(vec![], Instant::now());
        assert_eq!(result.code, CODE_OK);
        assert_eq!(result.data.size, 0);
        assert!(result.data.list.is_empty());
        let json: serde_json::Value =
            serde_json::from_slice(&result.to_json().expect("encode")).expect("decode");
        assert_eq!(json["data"]["list"], serde_json::json!([]));
        assert!(json.get("msg").is_none());
    }

    #[test]
    fn failure_has_code_minus_one_and_empty_data() {
        let err = SearchError::UnsupportedEngine(vec!["Yahoo".into()]);
        let result = AggregateResult::from_error(&err, Instant::now());
        assert_eq!(result.code, CODE_ERROR);
        assert!(result.msg.as_deref().unwrap_or_default().contains("Yahoo"));
        assert!(result.data.list.is_empty());
        assert!(!result.is_ok());
    }

    #[test]
    fn envelope_json_shape() {
        let result = AggregateResult::assemble(vec![scored_list("a", &[3])], Instant::now());
        let json: serde_json::Value =
            serde_json::from_slice(&result.to_json().expect("encode")).expect("decode");
        assert_eq!(json["code"], 0);
        assert!(json["cost"].is_u64());
        assert_eq!(json["data"]["index"], 0);
        assert_eq!(json["data"]["size"], 1);
        assert_eq!(json["data"]["list"][0]["score"], 3);
        assert_eq!(json["data"]["list"][0]["from"], "a");
    }
}
