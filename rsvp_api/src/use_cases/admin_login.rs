use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::AdminSession;
use crate::domain::errors::RsvpError;
use crate::domain::ports::{AdminSessionStore, Clock};

// Response returned by the admin login use case.
pub struct AdminGrant {
    pub token: String,
    pub expires_at: u64,
}

// Admin login: checks the password digest and issues an expiring bearer token.
pub struct AdminLoginUseCase<C, S> {
    pub clock: C,
    pub store: S,
    pub ttl_seconds: u64,
    // Hex SHA-256 of the configured password; `None` rejects every attempt.
    pub password_sha256: Option<String>,
}

impl<C, S> AdminLoginUseCase<C, S>
where
    C: Clock,
    S: AdminSessionStore,
{
    pub async fn execute(&self, password: &str) -> Result<AdminGrant, RsvpError> {
        let expected = self
            .password_sha256
            .as_deref()
            .ok_or(RsvpError::InvalidPassword)?;

        if !digest_matches(&sha256_hex(password), expected) {
            return Err(RsvpError::InvalidPassword);
        }

        let now = self.clock.now_epoch_seconds();
        // Grants nobody presents again would otherwise pile up.
        match self.store.remove_expired(now).await {
            Ok(0) => {}
            Ok(swept) => tracing::debug!(swept, "expired admin sessions removed"),
            Err(err) => tracing::warn!(error = %err, "failed to sweep admin sessions"),
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = now + self.ttl_seconds;
        let session = AdminSession { expires_at };

        self.store
            .insert(token.clone(), session)
            .await
            .map_err(|_| RsvpError::StorageFailure)?;

        Ok(AdminGrant { token, expires_at })
    }
}

pub fn sha256_hex(value: &str) -> String {
    format!("{:x}", Sha256::digest(value.as_bytes()))
}

// Compares every byte so timing does not leak the matching prefix.
fn digest_matches(actual: &str, expected: &str) -> bool {
    let expected = expected.trim().to_ascii_lowercase();
    if actual.len() != expected.len() {
        return false;
    }
    actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
