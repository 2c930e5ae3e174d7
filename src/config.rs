use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Clinical Decision Support System";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when `CDSS_API_BASE_URL` is unset or blank.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Overall bound on every outbound request.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_BASE_URL: &str = "CDSS_API_BASE_URL";
pub const ENV_APP_NAME: &str = "CDSS_APP_NAME";
pub const ENV_APP_VERSION: &str = "CDSS_APP_VERSION";

/// Log filter applied when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "cdss_lib=info"
}

/// Runtime settings for the API client and the display chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Display only.
    pub app_name: String,
    /// Display only.
    pub app_version: String,
}

impl ClientConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_base_url: read(ENV_API_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            app_name: read(ENV_APP_NAME).unwrap_or_else(|| APP_NAME.to_string()),
            app_version: read(ENV_APP_VERSION).unwrap_or_else(|| APP_VERSION.to_string()),
        }
    }

    /// Same settings pointed at another backend.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout. Production code keeps the 30s default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
