//! I/O operations for hubmirror-fetch.
//!
//! Everything that touches the network lives here, behind the
//! [`HttpClient`] trait so that callers can substitute a mock.

mod http;
mod probe;

pub use http::{BoxStream, HttpClient};
pub use probe::{is_reachable, probe, range_header};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
