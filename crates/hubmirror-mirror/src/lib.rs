//! Fastest-mirror selection for GitHub-hosted resources.
//!
//! # Architecture
//!
//! - [`data`] - Candidates, probe outcomes, race results and cache state
//! - [`mirror_set`] - Pure URL to candidate-list expansion
//! - [`effects`] - Probing, racing and memoizing behind the [`Prober`] trait
//!
//! # Example
//!
//! ```no_run
//! use hubmirror_fetch::{ClientSetting, ProbeOptions};
//! use hubmirror_mirror::MirrorResolver;
//!
//! # async fn run() -> hubmirror_mirror::Result<()> {
//! let setting = ClientSetting::default();
//! let resolver = MirrorResolver::from_setting(&setting, ProbeOptions::default())?;
//! let url = "https://github.com/owner/repo/releases/download/v1/tool.zip";
//! let target = resolver.get_mirror_or_original(url).await;
//! println!("downloading from {target}");
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod effects;
mod error;
pub mod mirror_set;

pub use data::{CacheState, CandidateMirror, ProbeOutcome, RaceResult};
pub use effects::{HttpProbe, MirrorResolver, Prober, RaceCoordinator, SelectionCache, race};
pub use error::{Error, Result};
pub use mirror_set::{GITHUB_PREFIX, MIRROR_COUNT, MirrorSet, get_mirrors};
