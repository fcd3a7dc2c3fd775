//! First-success race over a set of candidates.
//!
//! # Algorithm
//!
//! Every candidate gets its own probe task on the tokio runtime and its own
//! child token of a race-wide cancellation scope. The coordinator then
//! waits on whichever task finishes next:
//!
//! - a success ends the race: the scope is cancelled, the remaining tasks
//!   are detached (not awaited) and the winner's index is returned;
//! - a failure is dropped from the pending set and the wait continues.
//!
//! The race reports no winner only once the pending set is empty. Under
//! simultaneous completions the winner is whichever task [`JoinSet`]
//! yields first.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::data::{CandidateMirror, ProbeOutcome, RaceResult};
use crate::effects::prober::Prober;

/// Runs races with a shared [`Prober`].
#[derive(Debug)]
pub struct RaceCoordinator<P> {
    prober: Arc<P>,
}

impl<P> Clone for RaceCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            prober: Arc::clone(&self.prober),
        }
    }
}

impl<P: Prober> RaceCoordinator<P> {
    pub fn new(prober: Arc<P>) -> Self {
        Self { prober }
    }

    pub fn prober(&self) -> &Arc<P> {
        &self.prober
    }

    pub async fn race(&self, candidates: Vec<CandidateMirror>) -> RaceResult {
        race(&self.prober, candidates).await
    }
}

/// Probe all `candidates` concurrently and return the first to succeed.
///
/// Must be called from within a tokio runtime. Losing probes are signalled
/// through their tokens and left to wind down on their own, so the race
/// takes as long as its winner. Dropping the returned future aborts every
/// probe still running.
pub async fn race<P: Prober>(prober: &Arc<P>, candidates: Vec<CandidateMirror>) -> RaceResult {
    let mut outcomes = Vec::with_capacity(candidates.len());
    if candidates.is_empty() {
        return RaceResult {
            winner: None,
            outcomes,
        };
    }

    let scope = CancellationToken::new();
    let _teardown = scope.clone().drop_guard();
    let mut pending = JoinSet::new();

    for candidate in candidates {
        let prober = Arc::clone(prober);
        let cancel = scope.child_token();
        debug!(index = candidate.index, url = %candidate.url, "starting probe");
        pending.spawn(async move {
            let succeeded = prober.probe(&candidate.url, cancel).await;
            ProbeOutcome {
                index: candidate.index,
                succeeded,
            }
        });
    }

    while let Some(joined) = pending.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "probe task did not complete");
                continue;
            }
        };
        outcomes.push(outcome);

        if outcome.succeeded {
            info!(index = outcome.index, "mirror won race");
            scope.cancel();
            pending.detach_all();
            return RaceResult {
                winner: Some(outcome.index),
                outcomes,
            };
        }
    }

    warn!(attempted = outcomes.len(), "no mirror reachable");
    RaceResult {
        winner: None,
        outcomes,
    }
}
