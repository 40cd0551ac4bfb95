use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::entities::{
    AdminSession, Confirmation, ConfirmationDraft, Guest, GuestWithConfirmations, Meal,
};
use crate::domain::ports::{AdminSessionStore, Clock, GuestStore};
use crate::interface_adapters::state::InMemoryGuestStore;

pub(crate) type SessionTable = Arc<Mutex<HashMap<String, AdminSession>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Guest fixture with a stable creation time derived from the id.
pub(crate) fn guest(id: i64, token: &str, max_tickets: i32) -> Guest {
    Guest {
        id,
        token: token.to_string(),
        first_name: "Ana".to_string(),
        last_name: "García".to_string(),
        email: Some("ana@example.com".to_string()),
        phone: None,
        max_tickets,
        tickets_confirmed: None,
        meal: None,
        notes: None,
        created_at: Utc
            .timestamp_opt(1_700_000_000 + id, 0)
            .single()
            .expect("valid fixture timestamp"),
    }
}

pub(crate) fn store_with(guests: Vec<Guest>) -> InMemoryGuestStore {
    InMemoryGuestStore::with_guests(guests)
}

// Guest store whose every call fails, for storage error mapping.
pub(crate) struct BrokenGuestStore;

#[async_trait]
impl GuestStore for BrokenGuestStore {
    async fn find_by_token(&self, _token: &str) -> Result<Option<Guest>, String> {
        Err("find failed".to_string())
    }

    async fn find_by_id(&self, _guest_id: i64) -> Result<Option<Guest>, String> {
        Err("find failed".to_string())
    }

    async fn confirm_tickets(&self, _guest_id: i64, _tickets: i32) -> Result<(), String> {
        Err("update failed".to_string())
    }

    async fn set_meal(&self, _guest_id: i64, _meal: Meal) -> Result<(), String> {
        Err("update failed".to_string())
    }

    async fn set_notes(&self, _guest_id: i64, _notes: &str) -> Result<(), String> {
        Err("update failed".to_string())
    }

    async fn latest_confirmation(&self, _guest_id: i64) -> Result<Option<Confirmation>, String> {
        Err("find failed".to_string())
    }

    async fn save_confirmation(
        &self,
        _guest_id: i64,
        _draft: ConfirmationDraft,
    ) -> Result<Confirmation, String> {
        Err("insert failed".to_string())
    }

    async fn list_with_confirmations(&self) -> Result<Vec<GuestWithConfirmations>, String> {
        Err("list failed".to_string())
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingSessionStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingSessionStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, expires_at: u64) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(
            token.into(),
            AdminSession { expires_at },
        );
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<AdminSession> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }
}

#[async_trait]
impl AdminSessionStore for RecordingSessionStore {
    async fn insert(&self, token: String, session: AdminSession) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<AdminSession>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }

    async fn remove_expired(&self, now: u64) -> Result<usize, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        let before = guard.len();
        guard.retain(|_, session| session.expires_at > now);
        Ok(before - guard.len())
    }
}

// Delegates to the in-memory store but fails every ticket confirmation.
#[derive(Clone)]
pub(crate) struct TicketFailingStore {
    pub(crate) inner: InMemoryGuestStore,
}

#[async_trait]
impl GuestStore for TicketFailingStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, String> {
        self.inner.find_by_token(token).await
    }

    async fn find_by_id(&self, guest_id: i64) -> Result<Option<Guest>, String> {
        self.inner.find_by_id(guest_id).await
    }

    async fn confirm_tickets(&self, _guest_id: i64, _tickets: i32) -> Result<(), String> {
        Err("attendance upsert failed".to_string())
    }

    async fn set_meal(&self, guest_id: i64, meal: Meal) -> Result<(), String> {
        self.inner.set_meal(guest_id, meal).await
    }

    async fn set_notes(&self, guest_id: i64, notes: &str) -> Result<(), String> {
        self.inner.set_notes(guest_id, notes).await
    }

    async fn latest_confirmation(&self, guest_id: i64) -> Result<Option<Confirmation>, String> {
        self.inner.latest_confirmation(guest_id).await
    }

    async fn save_confirmation(
        &self,
        guest_id: i64,
        draft: ConfirmationDraft,
    ) -> Result<Confirmation, String> {
        self.inner.save_confirmation(guest_id, draft).await
    }

    async fn list_with_confirmations(&self) -> Result<Vec<GuestWithConfirmations>, String> {
        self.inner.list_with_confirmations().await
    }
}
