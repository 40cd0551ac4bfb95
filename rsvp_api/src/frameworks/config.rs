use std::env;

// Runtime/server settings read from the environment.

pub fn http_port() -> u16 {
    env::var("RSVP_API_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
}

// Hex SHA-256 of the admin password. Unset disables admin login.
pub fn admin_password_sha256() -> Option<String> {
    env::var("ADMIN_PASSWORD_SHA256")
        .ok()
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit()))
}

pub fn admin_session_ttl_seconds() -> u64 {
    env::var("ADMIN_SESSION_TTL_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_ADMIN_SESSION_TTL_SECONDS)
}

pub const DEFAULT_ADMIN_SESSION_TTL_SECONDS: u64 = 8 * 60 * 60;
