pub mod admin_login;
pub mod admin_session;
pub mod choose_meal;
pub mod current_confirmation;
pub mod leave_comment;
pub mod list_guests;
pub mod lookup_guest;
pub mod request_tickets;
pub mod submit_confirmation;

#[cfg(test)]
pub(crate) mod test_support;
