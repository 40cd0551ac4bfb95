use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::RepositoryError;
use crate::domain::guests::{
    AdminGrant, ConfirmationDraft, ConfirmationRecord, GuestPayload, GuestRecord,
};
use crate::domain::session::Meal;

// Port for the RSVP API; one method per endpoint the portal uses.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn lookup_guest(&self, token: &str) -> Result<GuestPayload, RepositoryError>;
    async fn request_tickets(&self, token: &str, tickets: u32) -> Result<(), RepositoryError>;
    async fn save_meal(&self, token: &str, meal: Meal) -> Result<(), RepositoryError>;
    async fn leave_comment(&self, guest_id: i64, comment: &str) -> Result<(), RepositoryError>;
    async fn submit_confirmation(
        &self,
        token: &str,
        draft: &ConfirmationDraft,
    ) -> Result<ConfirmationRecord, RepositoryError>;
    async fn current_confirmation(
        &self,
        token: &str,
    ) -> Result<Option<ConfirmationRecord>, RepositoryError>;
    async fn admin_login(&self, password: &str) -> Result<AdminGrant, RepositoryError>;
    async fn admin_logout(&self, bearer: &str) -> Result<(), RepositoryError>;
    async fn list_guests(&self, bearer: &str) -> Result<Vec<GuestRecord>, RepositoryError>;
}

#[async_trait]
impl<T> GuestRepository for Arc<T>
where
    T: GuestRepository + ?Sized,
{
    async fn lookup_guest(&self, token: &str) -> Result<GuestPayload, RepositoryError> {
        (**self).lookup_guest(token).await
    }

    async fn request_tickets(&self, token: &str, tickets: u32) -> Result<(), RepositoryError> {
        (**self).request_tickets(token, tickets).await
    }

    async fn save_meal(&self, token: &str, meal: Meal) -> Result<(), RepositoryError> {
        (**self).save_meal(token, meal).await
    }

    async fn leave_comment(&self, guest_id: i64, comment: &str) -> Result<(), RepositoryError> {
        (**self).leave_comment(guest_id, comment).await
    }

    async fn submit_confirmation(
        &self,
        token: &str,
        draft: &ConfirmationDraft,
    ) -> Result<ConfirmationRecord, RepositoryError> {
        (**self).submit_confirmation(token, draft).await
    }

    async fn current_confirmation(
        &self,
        token: &str,
    ) -> Result<Option<ConfirmationRecord>, RepositoryError> {
        (**self).current_confirmation(token).await
    }

    async fn admin_login(&self, password: &str) -> Result<AdminGrant, RepositoryError> {
        (**self).admin_login(password).await
    }

    async fn admin_logout(&self, bearer: &str) -> Result<(), RepositoryError> {
        (**self).admin_logout(bearer).await
    }

    async fn list_guests(&self, bearer: &str) -> Result<Vec<GuestRecord>, RepositoryError> {
        (**self).list_guests(bearer).await
    }
}

/// Key-value persistence that survives restarts, like browser local storage.
/// Reads never fail; a missing or unreadable entry is simply absent.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

impl<T> LocalStorage for Arc<T>
where
    T: LocalStorage + ?Sized,
{
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        (**self).remove_item(key)
    }
}

// Time source for grant expiry checks.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
