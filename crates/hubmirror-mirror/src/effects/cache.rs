use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::data::CacheState;
use crate::effects::coordinator::RaceCoordinator;
use crate::effects::prober::Prober;
use crate::mirror_set::MirrorSet;

/// Single-slot memo of the winning mirror index.
///
/// Only a successful race writes the slot; a race with no winner leaves it
/// [`CacheState::Unset`] so the next [`get`](Self::get) races again.
///
/// The lock is held for the read and for the write, never across the race.
/// Two first-time callers can therefore both see `Unset` and race
/// independently; the last write wins. Every winner is a reachable mirror,
/// so either result is valid.
#[derive(Debug, Default)]
pub struct SelectionCache {
    state: Mutex<CacheState>,
}

impl SelectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CacheState {
        *self.lock()
    }

    /// Return the cached index, or race the mirrors of `test_url` to fill it.
    pub async fn get<P: Prober>(
        &self,
        test_url: &str,
        coordinator: &RaceCoordinator<P>,
    ) -> Option<usize> {
        if let CacheState::Resolved(index) = self.state() {
            return Some(index);
        }

        let result = coordinator.race(MirrorSet::candidates(test_url)).await;
        let index = result.winner?;
        *self.lock() = CacheState::Resolved(index);
        Some(index)
    }

    pub fn reset(&self) {
        let previous = std::mem::take(&mut *self.lock());
        info!(%previous, "mirror selection reset");
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
