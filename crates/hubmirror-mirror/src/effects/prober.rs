use std::future::Future;

use hubmirror_fetch::{HttpClient, ProbeOptions};
use tokio_util::sync::CancellationToken;

/// A cancellable reachability check for one URL.
///
/// This is the only thing a race needs from the network. Implementations
/// must collapse every failure into `false` and should return promptly
/// once `cancel` fires.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self, url: &str, cancel: CancellationToken) -> impl Future<Output = bool> + Send;
}

/// [`Prober`] backed by a ranged GET through an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpProbe<C> {
    client: C,
    options: ProbeOptions,
}

impl<C: HttpClient> HttpProbe<C> {
    pub fn new(client: C, options: ProbeOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }
}

impl<C: HttpClient + 'static> Prober for HttpProbe<C> {
    async fn probe(&self, url: &str, cancel: CancellationToken) -> bool {
        hubmirror_fetch::probe(&self.client, url, &self.options, &cancel).await
    }
}
