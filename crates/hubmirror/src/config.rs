//! On-disk configuration.
//!
//! Read from `~/.hubmirror/config.toml` unless `--config` points elsewhere.
//! Every field is optional; missing ones take the library defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use hubmirror_fetch::{ClientSetting, DEFAULT_USER_AGENT, DEFAULT_WINDOW_BYTES, ProbeOptions};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL whose mirrors are raced; defaults to the first URL resolved.
    pub test_url: Option<String>,
    pub worker_threads: usize,
    pub http: HttpConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub proxies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub window_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_url: None,
            worker_threads: 4,
            http: HttpConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        let setting = ClientSetting::default();
        Self {
            timeout_secs: setting.timeout.as_secs(),
            connect_timeout_secs: setting.connect_timeout.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxies: Vec::new(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            window_bytes: DEFAULT_WINDOW_BYTES,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".hubmirror").join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), otherwise the default path
    /// if it exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) => Self::load_or_default(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            bail!("worker_threads must be at least 1");
        }
        if self.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be at least 1");
        }
        if self.http.connect_timeout_secs == 0 {
            bail!("http.connect_timeout_secs must be at least 1");
        }
        if self.probe.window_bytes == 0 {
            bail!("probe.window_bytes must be at least 1");
        }
        Ok(())
    }

    pub fn client_setting(&self) -> ClientSetting {
        let mut setting = ClientSetting::default()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))
            .user_agent(self.http.user_agent.clone());
        setting.proxies = self.http.proxies.clone();
        setting
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions::default().window_bytes(self.probe.window_bytes)
    }
}
