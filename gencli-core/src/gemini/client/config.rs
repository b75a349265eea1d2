use std::time::Duration;

/// HTTP settings for the Gemini client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL up to and including the API version segment
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Maximum number of idle connections per host
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::constants::urls::GEMINI_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 4,
            user_agent: format!("gencli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_timeouts(request_timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        Self {
            request_timeout: Duration::from_secs(request_timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
