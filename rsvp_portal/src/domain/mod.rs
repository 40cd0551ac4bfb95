mod errors;
mod guests;
mod ports;
mod session;

// Re-export the domain boundary types and ports.
pub use errors::{FlowError, RepositoryError};
pub(crate) use errors::FlowMessages;
pub use guests::{
    AdminGrant, ConfirmationDraft, ConfirmationRecord, GuestPayload, GuestRecord, PlusOneDraft,
    PlusOneRecord,
};
pub use ports::{Clock, GuestRepository, LocalStorage};
pub use session::{GuestSession, Meal, TOKEN_LEN, clamp_tickets, is_valid_token};
