use crate::domain::entities::{is_valid_token, Guest};
use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;

// Resolves an invitation token to its guest record.
pub struct LookupGuestUseCase<S> {
    pub store: S,
}

impl<S> LookupGuestUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(&self, token: &str) -> Result<Guest, RsvpError> {
        find_guest(&self.store, token).await
    }
}

// Shared by every token-addressed use case: format check first, then lookup.
pub(crate) async fn find_guest<S>(store: &S, token: &str) -> Result<Guest, RsvpError>
where
    S: GuestStore,
{
    if !is_valid_token(token) {
        return Err(RsvpError::InvalidToken);
    }

    store
        .find_by_token(token)
        .await
        .map_err(|_| RsvpError::StorageFailure)?
        .ok_or(RsvpError::GuestNotFound)
}
