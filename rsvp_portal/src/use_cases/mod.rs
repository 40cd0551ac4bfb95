pub mod admin_gate;
pub mod admin_report;
pub mod meals;
pub mod registration;
pub mod session_store;
pub mod tickets;
pub mod verify_token;

#[cfg(test)]
pub(crate) mod test_support;
