//! Error types for hubmirror-mirror.
//!
//! Probe and race failures are not errors: they surface as `false` and
//! `None`. Only building the production probe can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build HTTP client: {0}")]
    Fetch(#[from] hubmirror_fetch::FetchError),
}

pub type Result<T> = std::result::Result<T, Error>;
