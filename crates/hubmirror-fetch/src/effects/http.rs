use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::ResourceInfo;

/// A boxed stream type for HTTP response bodies.
///
/// The stream yields `Result<Bytes, E>` where E is the error type from the HTTP client.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface needed for probing mirrors.
/// Implementations handle their own redirect following, timeout configuration,
/// and error mapping.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + 'static;

    /// Send a GET request and return the response body as a stream.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `headers` - Custom headers to include with the request, e.g. `Range`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (DNS failure, connection error,
    /// timeout) or the server answers with a non-success status. Dropping the
    /// returned future or stream aborts the request.
    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>>
    + Send;

    /// Send a HEAD request and report the length and suggested file name.
    ///
    /// # Returns
    ///
    /// `Ok(info)` with whichever of `Content-Length` and `Content-Disposition`
    /// the server sent, or `Err(...)` if the request fails or the status is
    /// not a success.
    fn head(&self, url: &str) -> impl Future<Output = Result<ResourceInfo, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use crate::data::{ClientSetting, file_name_from_disposition};
    use crate::error::{FetchError, Result};
    use futures_util::TryStreamExt;
    use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, HeaderName};
    use reqwest::{Client, Proxy, Response, Url};

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        /// Build a client from the given setting.
        ///
        /// # Errors
        ///
        /// [`FetchError::InvalidUrl`] if a proxy is not a valid URL, or
        /// [`FetchError::Http`] if the TLS backend cannot be initialised.
        pub fn new(setting: &ClientSetting) -> Result<Self> {
            let mut builder = Client::builder()
                .timeout(setting.timeout)
                .connect_timeout(setting.connect_timeout)
                .user_agent(setting.user_agent.as_str());

            let mut proxies = Vec::with_capacity(setting.proxies.len());
            for raw in &setting.proxies {
                let url = Url::parse(raw).map_err(|_| FetchError::InvalidUrl(raw.clone()))?;
                proxies.push(url);
            }

            let (secure, insecure): (Vec<Url>, Vec<Url>) =
                proxies.into_iter().partition(|u| u.scheme() == "https");

            for u in secure {
                builder = builder.proxy(Proxy::https(u)?);
            }

            for u in insecure {
                builder = builder.proxy(Proxy::http(u)?);
            }

            Ok(Self {
                client: builder.build()?,
            })
        }

        fn ensure_success(response: Response) -> Result<Response> {
            let status = response.status();
            if status.is_success() {
                Ok(response)
            } else {
                Err(FetchError::Status {
                    status: status.as_u16(),
                    url: response.url().to_string(),
                })
            }
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = FetchError;

        async fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<BoxStream<'static, Result<Bytes>>> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }

            let response = Self::ensure_success(request.send().await?)?;
            let stream = response.bytes_stream().map_err(FetchError::from);

            Ok(Box::pin(stream))
        }

        async fn head(&self, url: &str) -> Result<ResourceInfo> {
            let response = Self::ensure_success(self.client.head(url).send().await?)?;
            let header = |name: HeaderName| {
                response.headers().get(name).and_then(|v| v.to_str().ok())
            };

            Ok(ResourceInfo {
                content_length: header(CONTENT_LENGTH).and_then(|s| s.parse::<u64>().ok()),
                file_name: header(CONTENT_DISPOSITION).and_then(file_name_from_disposition),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_new_with_defaults() {
            assert!(ReqwestClient::new(&ClientSetting::default()).is_ok());
        }

        #[test]
        fn test_new_with_proxies() {
            let setting = ClientSetting::default()
                .proxy("http://127.0.0.1:7890")
                .proxy("https://127.0.0.1:7891");
            assert!(ReqwestClient::new(&setting).is_ok());
        }

        #[test]
        fn test_new_rejects_invalid_proxy() {
            let setting = ClientSetting::default().proxy("not a url");
            match ReqwestClient::new(&setting) {
                Err(FetchError::InvalidUrl(raw)) => assert_eq!(raw, "not a url"),
                other => panic!("expected InvalidUrl, got {other:?}"),
            }
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
