//! Data layer: candidates, outcomes and cache state.

use std::fmt;

/// One entry of a mirror set.
///
/// `index` is the position inside the [`MirrorSet`](crate::MirrorSet) output
/// it came from. It is only meaningful against that ordering, not as a
/// stored identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMirror {
    pub index: usize,
    pub url: String,
}

impl CandidateMirror {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }
}

/// Completion of a single probe as seen by the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub index: usize,
    pub succeeded: bool,
}

/// Result of one race.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceResult {
    /// Index of the first candidate to succeed, `None` when all failed.
    pub winner: Option<usize>,

    /// Completions observed before the race returned, in arrival order.
    ///
    /// Ends with the winner when there is one. Losers still in flight at
    /// that point are absent.
    pub outcomes: Vec<ProbeOutcome>,
}

/// State of the single-slot selection memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheState {
    /// No race has succeeded since creation or the last reset.
    #[default]
    Unset,

    /// A race picked this candidate index.
    Resolved(usize),
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheState::Unset => write!(f, "unset"),
            CacheState::Resolved(index) => write!(f, "resolved({index})"),
        }
    }
}
