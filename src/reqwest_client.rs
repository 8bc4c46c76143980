use derive_builder::Builder;
use std::time::Duration;
use url::Url;

use crate::errors::{Result, WikiError};

/// Default user agent sent to the wiki.
pub const DEFAULT_USER_AGENT: &str = concat!("wiki_bridge/", env!("CARGO_PKG_VERSION"));
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT_ENV: &str = "WIKI_BRIDGE_USER_AGENT";
const TIMEOUT_ENV: &str = "WIKI_BRIDGE_TIMEOUT_SECS";

/// Status and body of a finished request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a blocking GET.
///
/// The api functions only talk to the wiki through this, so tests can swap in
/// a fake server.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<RawResponse>;
}

/// Options for building a [`RustClient`].
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct ClientConfig {
    /// Custom user agent to tell the server.
    #[builder(setter(into))]
    pub user_agent: String,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Build a config from `WIKI_BRIDGE_USER_AGENT` and `WIKI_BRIDGE_TIMEOUT_SECS`.
    ///
    /// A timeout of `0` disables it. Values that don't parse are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(agent) = lookup(USER_AGENT_ENV).filter(|a| !a.trim().is_empty()) {
            config.user_agent = agent.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", TIMEOUT_ENV, raw, e),
            }
        }
        config
    }
}

/// Blocking reqwest client used to talk to the wiki.
#[derive(Debug, Clone)]
pub struct RustClient(pub reqwest::blocking::Client);

impl RustClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// - config -> user agent and timeout to use.
    ///
    /// # Returns
    /// - Ok(RustClient) -> a new client object to use.
    /// - Err(WikiError::Transport) -> reqwest could not set up its backend.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self(client))
    }
}

impl Transport for RustClient {
    fn get(&self, url: &Url) -> Result<RawResponse> {
        log::debug!("GET {}", url);
        let response = self.0.get(url.clone()).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(RawResponse { status, body })
    }
}
