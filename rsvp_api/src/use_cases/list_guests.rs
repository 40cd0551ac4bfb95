use crate::domain::entities::GuestWithConfirmations;
use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;

// Admin listing: every guest with nested confirmations and plus-ones.
pub struct ListGuestsUseCase<S> {
    pub store: S,
}

impl<S> ListGuestsUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(&self) -> Result<Vec<GuestWithConfirmations>, RsvpError> {
        self.store
            .list_with_confirmations()
            .await
            .map_err(|_| RsvpError::StorageFailure)
    }
}
