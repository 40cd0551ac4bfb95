use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{
    AdminSession, Confirmation, ConfirmationDraft, Guest, GuestWithConfirmations, Meal,
};

// Port for guest, confirmation and plus-one persistence.
#[async_trait]
pub trait GuestStore: Send + Sync {
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, String>;
    async fn find_by_id(&self, guest_id: i64) -> Result<Option<Guest>, String>;
    // Stores the ticket count and upserts the newest confirmation as attending, as one write.
    async fn confirm_tickets(&self, guest_id: i64, tickets: i32) -> Result<(), String>;
    async fn set_meal(&self, guest_id: i64, meal: Meal) -> Result<(), String>;
    async fn set_notes(&self, guest_id: i64, notes: &str) -> Result<(), String>;
    async fn latest_confirmation(&self, guest_id: i64) -> Result<Option<Confirmation>, String>;
    // Upserts the newest confirmation and replaces its plus-ones.
    async fn save_confirmation(
        &self,
        guest_id: i64,
        draft: ConfirmationDraft,
    ) -> Result<Confirmation, String>;
    async fn list_with_confirmations(&self) -> Result<Vec<GuestWithConfirmations>, String>;
}

#[async_trait]
impl<T> GuestStore for Arc<T>
where
    T: GuestStore + ?Sized,
{
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, String> {
        (**self).find_by_token(token).await
    }

    async fn find_by_id(&self, guest_id: i64) -> Result<Option<Guest>, String> {
        (**self).find_by_id(guest_id).await
    }

    async fn confirm_tickets(&self, guest_id: i64, tickets: i32) -> Result<(), String> {
        (**self).confirm_tickets(guest_id, tickets).await
    }

    async fn set_meal(&self, guest_id: i64, meal: Meal) -> Result<(), String> {
        (**self).set_meal(guest_id, meal).await
    }

    async fn set_notes(&self, guest_id: i64, notes: &str) -> Result<(), String> {
        (**self).set_notes(guest_id, notes).await
    }

    async fn latest_confirmation(&self, guest_id: i64) -> Result<Option<Confirmation>, String> {
        (**self).latest_confirmation(guest_id).await
    }

    async fn save_confirmation(
        &self,
        guest_id: i64,
        draft: ConfirmationDraft,
    ) -> Result<Confirmation, String> {
        (**self).save_confirmation(guest_id, draft).await
    }

    async fn list_with_confirmations(&self) -> Result<Vec<GuestWithConfirmations>, String> {
        (**self).list_with_confirmations().await
    }
}

// Port for admin session storage.
#[async_trait]
pub trait AdminSessionStore: Send + Sync {
    async fn insert(&self, token: String, session: AdminSession) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<AdminSession>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
    // Drops every session expired at `now`, returning how many went.
    async fn remove_expired(&self, now: u64) -> Result<usize, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
