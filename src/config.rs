//! Configuration types.

use std::time::Duration;

/// Default backend base URL (the original deployment).
pub const DEFAULT_BASE_URL: &str = "https://sirius-draw-test-94500a1b4a2f.herokuapp.com";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Interval between report status fetches.
    pub poll_interval: Duration,
    /// Number of fetch attempts before an unavailable backend triggers
    /// fallback synthesis.
    pub max_unavailable_attempts: u32,
    /// Whether an unavailable backend may be answered with a locally
    /// synthesized report. Product-policy stand-in for the missing
    /// backend integration; turn off once the status endpoint is live.
    pub fallback_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(12),
            max_unavailable_attempts: 3,
            fallback_enabled: true,
        }
    }
}

impl ClientConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized: `PSYCANVAS_BASE_URL`, `PSYCANVAS_POLL_INTERVAL_SECS`,
    /// `PSYCANVAS_FALLBACK` ("0"/"false" to disable).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PSYCANVAS_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(secs) = std::env::var("PSYCANVAS_POLL_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.poll_interval = Duration::from_secs(secs);
            }
        }
        if let Ok(flag) = std::env::var("PSYCANVAS_FALLBACK") {
            config.fallback_enabled = !matches!(flag.as_str(), "0" | "false" | "off");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_policy() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(12));
        assert_eq!(config.max_unavailable_attempts, 3);
        assert!(config.fallback_enabled);
        assert!(!config.base_url.ends_with('/'));
    }
}
