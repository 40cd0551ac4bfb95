use crate::domain::entities::{Confirmation, ConfirmationDraft, PlusOneDraft};
use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;
use crate::use_cases::lookup_guest::find_guest;

// Creates or updates the guest's RSVP, replacing any previous plus-ones.
pub struct SubmitConfirmationUseCase<S> {
    pub store: S,
}

impl<S> SubmitConfirmationUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(
        &self,
        token: &str,
        draft: ConfirmationDraft,
    ) -> Result<Confirmation, RsvpError> {
        let guest = find_guest(&self.store, token).await?;
        let draft = normalize_draft(draft)?;

        if draft.plus_ones.len() > guest.max_plus_ones() {
            return Err(RsvpError::TooManyPlusOnes);
        }

        self.store
            .save_confirmation(guest.id, draft)
            .await
            .map_err(|_| RsvpError::StorageFailure)
    }
}

fn normalize_draft(draft: ConfirmationDraft) -> Result<ConfirmationDraft, RsvpError> {
    // Declining drops companions; there is nobody to seat.
    let plus_ones = if draft.attending {
        draft
            .plus_ones
            .into_iter()
            .map(|plus_one| {
                let name = plus_one.name.trim().to_string();
                if name.is_empty() {
                    return Err(RsvpError::InvalidPlusOne);
                }
                Ok(PlusOneDraft {
                    name,
                    dietary_restrictions: non_blank(plus_one.dietary_restrictions),
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    Ok(ConfirmationDraft {
        attending: draft.attending,
        dietary_restrictions: non_blank(draft.dietary_restrictions),
        special_requests: non_blank(draft.special_requests),
        plus_ones,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
