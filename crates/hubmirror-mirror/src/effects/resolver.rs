use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::data::CacheState;
use crate::effects::cache::SelectionCache;
use crate::effects::coordinator::RaceCoordinator;
use crate::effects::prober::Prober;
use crate::mirror_set::MirrorSet;

/// Resolves canonical URLs to their fastest reachable mirror.
///
/// The first call races the mirrors of the *test URL* and remembers the
/// winning position; later calls map that position onto the mirror set of
/// whatever URL they ask for, without probing. The test URL defaults to the
/// first URL ever requested, so every URL given to one resolver should come
/// from the same family (the same host rewrites apply to all of them).
///
/// One resolver tracks one family. Create another instance for another.
#[derive(Debug)]
pub struct MirrorResolver<P> {
    coordinator: RaceCoordinator<P>,
    cache: SelectionCache,
    test_url: RwLock<Option<String>>,
}

impl<P: Prober> MirrorResolver<P> {
    pub fn new(prober: P) -> Self {
        Self::with_shared(Arc::new(prober))
    }

    pub fn with_shared(prober: Arc<P>) -> Self {
        Self {
            coordinator: RaceCoordinator::new(prober),
            cache: SelectionCache::new(),
            test_url: RwLock::new(None),
        }
    }

    pub fn coordinator(&self) -> &RaceCoordinator<P> {
        &self.coordinator
    }

    pub fn cache(&self) -> &SelectionCache {
        &self.cache
    }

    pub fn test_url(&self) -> Option<String> {
        self.test_url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the URL whose mirrors the next race probes.
    ///
    /// Does not clear an already resolved selection; call
    /// [`reset_fastest_mirror`](Self::reset_fastest_mirror) for that.
    pub fn set_test_url(&self, url: impl Into<String>) {
        *self.test_url.write().unwrap_or_else(PoisonError::into_inner) = Some(url.into());
    }

    /// The fastest reachable mirror of `url`, or `None` if no mirror could
    /// be confirmed. Callers are expected to fall back to `url` itself.
    pub async fn get_fastest_mirror(&self, url: &str) -> Option<String> {
        let index = match self.cache.state() {
            CacheState::Resolved(index) => index,
            CacheState::Unset => {
                let test_url = self.test_url_or_init(url);
                debug!(test_url = %test_url, "racing mirrors");
                self.cache.get(&test_url, &self.coordinator).await?
            }
        };

        MirrorSet::mirrors(url).get(index).cloned()
    }

    /// Like [`get_fastest_mirror`](Self::get_fastest_mirror), falling back to
    /// `url` when no mirror is reachable.
    pub async fn get_mirror_or_original(&self, url: &str) -> String {
        match self.get_fastest_mirror(url).await {
            Some(mirror) => mirror,
            None => url.to_string(),
        }
    }

    pub fn reset_fastest_mirror(&self) {
        self.cache.reset();
    }

    fn test_url_or_init(&self, url: &str) -> String {
        let mut slot = self.test_url.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert_with(|| url.to_string()).clone()
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_resolver {
    use super::*;
    use crate::effects::prober::HttpProbe;
    use crate::error::Result;
    use hubmirror_fetch::{ClientSetting, ProbeOptions, ReqwestClient};

    impl MirrorResolver<HttpProbe<ReqwestClient>> {
        /// Resolver probing through a `reqwest` client built from `setting`.
        pub fn from_setting(setting: &ClientSetting, options: ProbeOptions) -> Result<Self> {
            let client = ReqwestClient::new(setting)?;
            Ok(Self::new(HttpProbe::new(client, options)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{Script, ScriptedProber};

    const TOOL: &str = "https://github.com/owner/tool/releases/download/v1/tool.zip";
    const OTHER: &str = "https://github.com/owner/other/archive/refs/heads/main.zip";

    fn mirror(url: &str, i: usize) -> String {
        MirrorSet::mirrors(url)[i].clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_sets_test_url() {
        let resolver = MirrorResolver::new(
            ScriptedProber::new().script(&mirror(TOOL, 0), Script::succeed_after(5)),
        );
        assert_eq!(resolver.test_url(), None);

        assert_eq!(resolver.get_fastest_mirror(TOOL).await, Some(TOOL.to_string()));
        assert_eq!(resolver.test_url().as_deref(), Some(TOOL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_index_applies_to_other_urls() {
        let prober = Arc::new(
            ScriptedProber::new().script(&mirror(TOOL, 2), Script::succeed_after(5)),
        );
        let resolver = MirrorResolver::with_shared(Arc::clone(&prober));

        assert_eq!(resolver.get_fastest_mirror(TOOL).await, Some(mirror(TOOL, 2)));
        assert_eq!(resolver.get_fastest_mirror(OTHER).await, Some(mirror(OTHER, 2)));
        assert_eq!(prober.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_test_url_is_raced() {
        let prober = Arc::new(
            ScriptedProber::new().script(&mirror(OTHER, 1), Script::succeed_after(5)),
        );
        let resolver = MirrorResolver::with_shared(Arc::clone(&prober));
        resolver.set_test_url(OTHER);

        assert_eq!(resolver.get_fastest_mirror(TOOL).await, Some(mirror(TOOL, 1)));
        assert_eq!(resolver.test_url().as_deref(), Some(OTHER));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_mirror_falls_back() {
        let resolver = MirrorResolver::new(ScriptedProber::new());

        assert_eq!(resolver.get_fastest_mirror(TOOL).await, None);
        assert_eq!(resolver.get_mirror_or_original(TOOL).await, TOOL);
        assert_eq!(resolver.cache().state(), CacheState::Unset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_then_race_again() {
        let prober = Arc::new(
            ScriptedProber::new().script(&mirror(TOOL, 0), Script::succeed_after(5)),
        );
        let resolver = MirrorResolver::with_shared(Arc::clone(&prober));

        resolver.get_fastest_mirror(TOOL).await;
        resolver.get_fastest_mirror(TOOL).await;
        assert_eq!(prober.calls(), 3);

        resolver.reset_fastest_mirror();
        resolver.get_fastest_mirror(TOOL).await;
        assert_eq!(prober.calls(), 6);
    }
}
