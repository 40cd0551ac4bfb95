// Domain-level errors for RSVP workflows.
#[derive(Debug)]
pub enum RsvpError {
    InvalidToken,
    GuestNotFound,
    InvalidTicketCount,
    InvalidMeal,
    InvalidComment,
    InvalidPlusOne,
    TooManyPlusOnes,
    InvalidPassword,
    InvalidSession,
    SessionExpired,
    StorageFailure,
}
