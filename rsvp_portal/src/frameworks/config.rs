use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TOKEN_LOOKUP_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STORAGE_PATH: &str = ".rsvp_storage.json";

// Portal settings read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalConfig {
    pub api_url: String,
    pub token_lookup_timeout: Duration,
    pub storage_path: PathBuf,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: api_url(),
            token_lookup_timeout: token_lookup_timeout(),
            storage_path: storage_path(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_lookup_timeout: Duration::from_millis(DEFAULT_TOKEN_LOOKUP_TIMEOUT_MS),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

pub fn api_url() -> String {
    env::var("RSVP_API_URL")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

// Zero would fail every lookup, so it falls back to the default.
pub fn token_lookup_timeout() -> Duration {
    let millis = env::var("TOKEN_LOOKUP_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .unwrap_or(DEFAULT_TOKEN_LOOKUP_TIMEOUT_MS);
    Duration::from_millis(millis)
}

pub fn storage_path() -> PathBuf {
    env::var("RSVP_STORAGE_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH))
}
