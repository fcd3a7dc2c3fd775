//! Scripted prober shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::effects::prober::Prober;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Outcome {
    Succeed,
    Fail,
    /// Succeeds after the delay even if cancelled.
    Stubborn,
    Panic,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Script {
    delay: Duration,
    outcome: Outcome,
}

impl Script {
    pub(crate) fn succeed_after(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            outcome: Outcome::Succeed,
        }
    }

    pub(crate) fn fail_after(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            outcome: Outcome::Fail,
        }
    }

    pub(crate) fn stubborn_after(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            outcome: Outcome::Stubborn,
        }
    }

    pub(crate) fn panic() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Outcome::Panic,
        }
    }
}

/// Prober whose behaviour per URL is fixed up front. Unknown URLs fail at once.
#[derive(Debug, Default)]
pub(crate) struct ScriptedProber {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
    tokens: Mutex<Vec<(String, CancellationToken)>>,
}

impl ScriptedProber {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Token handed to the first probe of `url`.
    pub(crate) fn token(&self, url: &str) -> CancellationToken {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, t)| t.clone())
            .unwrap()
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, url: &str, cancel: CancellationToken) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .push((url.to_string(), cancel.clone()));

        let script = self
            .scripts
            .get(url)
            .copied()
            .unwrap_or(Script::fail_after(0));

        match script.outcome {
            Outcome::Panic => panic!("scripted probe panic for {url}"),
            Outcome::Stubborn => {
                tokio::time::sleep(script.delay).await;
                true
            }
            Outcome::Succeed | Outcome::Fail => tokio::select! {
                () = cancel.cancelled() => false,
                () = tokio::time::sleep(script.delay) => matches!(script.outcome, Outcome::Succeed),
            },
        }
    }
}
