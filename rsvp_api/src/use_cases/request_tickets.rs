use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;
use crate::use_cases::lookup_guest::find_guest;

// Response returned by the ticket request use case.
#[derive(Debug)]
pub struct TicketsConfirmed {
    pub guest_id: i64,
    pub tickets: i32,
}

// Records how many of the guest's tickets will be used.
pub struct RequestTicketsUseCase<S> {
    pub store: S,
}

impl<S> RequestTicketsUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(&self, token: &str, requested: i64) -> Result<TicketsConfirmed, RsvpError> {
        let guest = find_guest(&self.store, token).await?;

        if requested < 1 || requested > i64::from(guest.max_tickets) {
            return Err(RsvpError::InvalidTicketCount);
        }
        let tickets = i32::try_from(requested).map_err(|_| RsvpError::InvalidTicketCount)?;

        // Requesting tickets is an attendance confirmation.
        self.store
            .confirm_tickets(guest.id, tickets)
            .await
            .map_err(|_| RsvpError::StorageFailure)?;

        Ok(TicketsConfirmed {
            guest_id: guest.id,
            tickets,
        })
    }
}
