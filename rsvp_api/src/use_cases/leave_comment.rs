use crate::domain::errors::RsvpError;
use crate::domain::ports::GuestStore;

// Comments longer than this are rejected rather than truncated.
const MAX_COMMENT_CHARS: usize = 2000;

// Stores a free-text note from the guest.
pub struct LeaveCommentUseCase<S> {
    pub store: S,
}

impl<S> LeaveCommentUseCase<S>
where
    S: GuestStore,
{
    pub async fn execute(&self, guest_id: i64, comment: &str) -> Result<i64, RsvpError> {
        let comment = comment.trim();
        if comment.is_empty() || comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(RsvpError::InvalidComment);
        }

        let guest = self
            .store
            .find_by_id(guest_id)
            .await
            .map_err(|_| RsvpError::StorageFailure)?
            .ok_or(RsvpError::GuestNotFound)?;

        self.store
            .set_notes(guest.id, comment)
            .await
            .map_err(|_| RsvpError::StorageFailure)?;

        Ok(guest.id)
    }
}
