//! HTTP mechanism for hubmirror.
//!
//! # Architecture
//!
//! This crate follows the same split as the rest of the workspace:
//! - [`data`] - Immutable client and probe configuration
//! - [`effects`] - I/O operations behind the [`HttpClient`] trait
//!
//! Nothing here decides *which* URL to use. The crate only answers
//! "did this URL serve the first bytes of its body", and leaves the
//! choice between mirrors to its callers.

pub mod data;
pub mod effects;
mod error;

pub use data::{
    ClientSetting, DEFAULT_USER_AGENT, DEFAULT_WINDOW_BYTES, ProbeOptions, ResourceInfo,
    file_name_from_disposition,
};
pub use effects::{BoxStream, HttpClient, is_reachable, probe, range_header};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
