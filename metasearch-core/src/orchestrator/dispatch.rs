//! Fan-out of backend searches and deadline-bounded fan-in.
//!
//! One task is spawned per backend. Each task sends its [`EntityList`] on a
//! bounded channel sized to the number of backends, so no send ever waits
//! on the collector. The collector takes lists in arrival order until every
//! backend has reported or the deadline fires, then cancels the request
//! token so that backends still in flight stop their network work.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::types::EntityList;

/// What the collector gathered before it stopped.
#[derive(Debug, Default)]
pub struct CollectionOutcome {
    /// Lists in the order they arrived.
    pub lists: Vec<EntityList>,
    /// Whether the deadline ended collection.
    pub timed_out: bool,
    /// Backends that had not reported when collection ended.
    pub pending: usize,
}

/// Run every backend concurrently and collect their lists until `timeout`.
///
/// A backend error is logged and counts as an empty list. `cancel` is
/// cancelled before this returns, on both the complete and the timeout path.
pub async fn dispatch_and_collect(
    backends: Vec<Box<dyn SearchBackend>>,
    timeout: Duration,
    cancel: CancellationToken,
) -> CollectionOutcome {
    let total = backends.len();
    if total == 0 {
        cancel.cancel();
        return CollectionOutcome::default();
    }

    let (tx, mut rx) = mpsc::channel::<EntityList>(total);

    for backend in backends {
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let name = backend.name().to_owned();
            let list = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(engine = %name, "backend cancelled after deadline");
                    return;
                }
                outcome = backend.search(&cancel) => match outcome {
                    Ok(list) => list,
                    Err(SearchError::Cancelled) => {
                        tracing::debug!(engine = %name, "backend cancelled after deadline");
                        return;
                    }
                    Err(err) => {
                        tracing::warn!(engine = %name, error = %err, "backend search failed");
                        EntityList::empty()
                    }
                },
            };
            tracing::debug!(engine = %name, count = list.list.len(), "backend returned results");
            // The collector may already have given up; the list is then dropped.
            let _ = tx.send(list).await;
        });
    }
    drop(tx);

    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let mut outcome = CollectionOutcome {
        lists: Vec::with_capacity(total),
        ..Default::default()
    };
    let mut remaining = total;

    while remaining > 0 {
        tokio::select! {
            biased;
            received = rx.recv() => match received {
                Some(list) => {
                    outcome.lists.push(list);
                    remaining -= 1;
                }
                // Every sender is gone: the rest of the tasks died without reporting.
                None => break,
            },
            _ = &mut deadline => {
                outcome.timed_out = true;
                break;
            }
        }
    }

    outcome.pending = remaining;
    cancel.cancel();
    outcome
}
