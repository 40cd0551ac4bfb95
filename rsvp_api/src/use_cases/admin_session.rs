use crate::domain::entities::AdminSession;
use crate::domain::errors::RsvpError;
use crate::domain::ports::{AdminSessionStore, Clock};

// Checks a bearer token before any admin read.
pub struct VerifyAdminUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> VerifyAdminUseCase<C, S>
where
    C: Clock,
    S: AdminSessionStore,
{
    pub async fn execute(&self, token: &str) -> Result<AdminSession, RsvpError> {
        let session = self
            .store
            .get(token)
            .await
            .map_err(|_| RsvpError::StorageFailure)?
            .ok_or(RsvpError::InvalidSession)?;

        if session.expires_at <= self.clock.now_epoch_seconds() {
            // Best-effort cleanup of expired session.
            let _ = self.store.remove(token).await;
            return Err(RsvpError::SessionExpired);
        }

        Ok(session)
    }
}

// Revokes an admin bearer token.
pub struct AdminLogoutUseCase<S> {
    pub store: S,
}

impl<S> AdminLogoutUseCase<S>
where
    S: AdminSessionStore,
{
    pub async fn execute(&self, token: &str) -> Result<bool, RsvpError> {
        self.store
            .remove(token)
            .await
            .map_err(|_| RsvpError::StorageFailure)
    }
}
