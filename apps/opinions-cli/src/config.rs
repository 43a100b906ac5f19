//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use opinions_core::ClientPolicy;

const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout: Option<Duration>,
    pub policy: ClientPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ClientPolicy::default();

        Self {
            api_url: lookup("OPINIONS_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: lookup("OPINIONS_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            policy: ClientPolicy {
                rollback_failed_votes: flag(&lookup, "VOTE_ROLLBACK_ON_FAILURE")
                    .unwrap_or(defaults.rollback_failed_votes),
                reset_form_on_failed_create: flag(&lookup, "FORM_RESET_ON_FAILED_CREATE")
                    .unwrap_or(defaults.reset_form_on_failed_create),
            },
        }
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).and_then(|v| match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}
