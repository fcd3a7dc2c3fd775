//! Effectful side of mirror selection: probing, racing, memoizing.

mod cache;
mod coordinator;
mod prober;
mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::SelectionCache;
pub use coordinator::{RaceCoordinator, race};
pub use prober::{HttpProbe, Prober};
pub use resolver::MirrorResolver;
