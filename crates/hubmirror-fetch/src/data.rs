//! Data layer: immutable configuration for HTTP clients and probes.

use std::time::Duration;

/// Browser-like user agent sent by default; some mirrors reject bare clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Bytes requested by a probe: the first 100 KiB of the resource.
pub const DEFAULT_WINDOW_BYTES: u64 = 100 * 1024;

/// Settings used to build a production HTTP client.
///
/// # Examples
///
/// ```
/// use hubmirror_fetch::ClientSetting;
/// use std::time::Duration;
///
/// let setting = ClientSetting::default()
///     .timeout(Duration::from_secs(3))
///     .proxy("http://127.0.0.1:7890");
/// assert_eq!(setting.proxies.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSetting {
    /// Whole-request timeout, covering connect, headers and body.
    ///
    /// This is the only time bound a probe has.
    ///
    /// Default: 5s
    pub timeout: Duration,

    /// Connection establishment timeout.
    ///
    /// Default: 5s
    pub connect_timeout: Duration,

    /// Value of the `User-Agent` header.
    ///
    /// Default: [`DEFAULT_USER_AGENT`]
    pub user_agent: String,

    /// Proxy URLs. `https://` proxies carry https traffic, any other scheme
    /// carries plain http traffic.
    ///
    /// Default: empty
    pub proxies: Vec<String>,
}

impl Default for ClientSetting {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxies: Vec::new(),
        }
    }
}

impl ClientSetting {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxies.push(proxy.into());
        self
    }
}

/// Configuration of a single ranged probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Size of the byte window requested with `Range: bytes=0-{window - 1}`.
    ///
    /// Never zero; see [`ProbeOptions::window_bytes`].
    pub window_bytes: u64,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            window_bytes: DEFAULT_WINDOW_BYTES,
        }
    }
}

impl ProbeOptions {
    /// Set the window size. A zero window is raised to one byte, since an
    /// HTTP range cannot be empty.
    #[must_use]
    pub fn window_bytes(mut self, window_bytes: u64) -> Self {
        self.window_bytes = window_bytes.max(1);
        self
    }
}

/// What a HEAD request reveals about a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceInfo {
    /// `Content-Length`, if the server sent one.
    pub content_length: Option<u64>,
    /// File name from `Content-Disposition`, if the server suggested one.
    pub file_name: Option<String>,
}

/// Extract the file name from a `Content-Disposition` header value.
///
/// `filename*=` wins over `filename=` when it carries no percent escapes.
/// Any directory part is stripped, so the result is always a bare name.
pub fn file_name_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = raw.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(raw),
            // RFC 5987: charset'lang'value
            "filename*" => extended = raw.rsplit_once("''").map(|(_, name)| name),
            _ => {}
        }
    }

    let name = extended.filter(|n| !n.contains('%')).or(plain)?;
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
}
