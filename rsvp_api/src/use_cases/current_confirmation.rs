use crate::domain::entities::Confirmation;
use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;
use crate::use_cases::lookup_guest::find_guest;

// Reads back the guest's latest RSVP so the form can be pre-filled.
pub struct CurrentConfirmationUseCase<S> {
    pub store: S,
}

impl<S> CurrentConfirmationUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(&self, token: &str) -> Result<Option<Confirmation>, RsvpError> {
        let guest = find_guest(&self.store, token).await?;

        self.store
            .latest_confirmation(guest.id)
            .await
            .map_err(|_| RsvpError::StorageFailure)
    }
}
