use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::{
    AdminGrant, Clock, ConfirmationDraft, ConfirmationRecord, GuestPayload, GuestRecord,
    GuestRepository, GuestSession, LocalStorage, Meal, PlusOneRecord, RepositoryError,
};
use crate::interface_adapters::storage::MemoryStorage;
use crate::use_cases::session_store::SessionStore;

pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Local storage whose writes always fail, as on a read-only disk.
pub(crate) struct FailingStorage;

impl LocalStorage for FailingStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), String> {
        Err("read-only storage".to_string())
    }

    fn remove_item(&self, _key: &str) -> Result<(), String> {
        Err("read-only storage".to_string())
    }
}

#[derive(Default)]
struct FakeState {
    lookup: Option<Result<GuestPayload, RepositoryError>>,
    lookup_delay: Option<Duration>,
    failure: Option<RepositoryError>,
    admin_password: Option<String>,
    grant: Option<AdminGrant>,
    guests: Vec<GuestRecord>,
    confirmation: Option<ConfirmationRecord>,
    calls: Vec<String>,
}

// Scripted repository that records every call as `name:args`.
#[derive(Clone, Default)]
pub(crate) struct FakeRepository {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRepository {
    pub(crate) fn with_lookup(self, result: Result<GuestPayload, RepositoryError>) -> Self {
        self.state.lock().expect("fake lock").lookup = Some(result);
        self
    }

    pub(crate) fn with_lookup_delay(self, delay: Duration) -> Self {
        self.state.lock().expect("fake lock").lookup_delay = Some(delay);
        self
    }

    // Every guest endpoint except the lookup fails with `err`.
    pub(crate) fn failing_with(self, err: RepositoryError) -> Self {
        self.state.lock().expect("fake lock").failure = Some(err);
        self
    }

    pub(crate) fn with_admin(self, password: &str, grant: AdminGrant, guests: Vec<GuestRecord>) -> Self {
        {
            let mut state = self.state.lock().expect("fake lock");
            state.admin_password = Some(password.to_string());
            state.grant = Some(grant);
            state.guests = guests;
        }
        self
    }

    pub(crate) fn with_confirmation(self, confirmation: ConfirmationRecord) -> Self {
        self.state.lock().expect("fake lock").confirmation = Some(confirmation);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().expect("fake lock").calls.clone()
    }

    fn record(&self, call: String) -> Option<RepositoryError> {
        let mut state = self.state.lock().expect("fake lock");
        state.calls.push(call);
        state.failure.clone()
    }
}

#[async_trait]
impl GuestRepository for FakeRepository {
    async fn lookup_guest(&self, token: &str) -> Result<GuestPayload, RepositoryError> {
        let (delay, result) = {
            let mut state = self.state.lock().expect("fake lock");
            state.calls.push(format!("lookup:{token}"));
            (
                state.lookup_delay,
                state
                    .lookup
                    .clone()
                    .unwrap_or(Err(RepositoryError::Status(404))),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn request_tickets(&self, token: &str, tickets: u32) -> Result<(), RepositoryError> {
        match self.record(format!("tickets:{token}:{tickets}")) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn save_meal(&self, token: &str, meal: Meal) -> Result<(), RepositoryError> {
        match self.record(format!("meal:{token}:{}", meal.as_str())) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn leave_comment(&self, guest_id: i64, comment: &str) -> Result<(), RepositoryError> {
        match self.record(format!("comment:{guest_id}:{comment}")) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn submit_confirmation(
        &self,
        token: &str,
        draft: &ConfirmationDraft,
    ) -> Result<ConfirmationRecord, RepositoryError> {
        let call = format!(
            "confirmation:{token}:{}:{}",
            draft.attending,
            draft.plus_ones.len()
        );
        if let Some(err) = self.record(call) {
            return Err(err);
        }
        let at = timestamp(1_700_000_000);
        Ok(ConfirmationRecord {
            id: 1,
            guest_id: 1,
            attending: draft.attending,
            dietary_restrictions: draft.dietary_restrictions.clone(),
            special_requests: draft.special_requests.clone(),
            created_at: at,
            updated_at: at,
            plus_ones: draft
                .plus_ones
                .iter()
                .enumerate()
                .map(|(index, plus_one)| PlusOneRecord {
                    id: index as i64 + 1,
                    confirmation_id: 1,
                    name: plus_one.name.clone(),
                    dietary_restrictions: plus_one.dietary_restrictions.clone(),
                })
                .collect(),
        })
    }

    async fn current_confirmation(
        &self,
        token: &str,
    ) -> Result<Option<ConfirmationRecord>, RepositoryError> {
        if let Some(err) = self.record(format!("current_confirmation:{token}")) {
            return Err(err);
        }
        Ok(self.state.lock().expect("fake lock").confirmation.clone())
    }

    async fn admin_login(&self, password: &str) -> Result<AdminGrant, RepositoryError> {
        let mut state = self.state.lock().expect("fake lock");
        state.calls.push("admin_login".to_string());
        match (&state.admin_password, &state.grant) {
            (Some(expected), Some(grant)) if expected == password => Ok(grant.clone()),
            _ => Err(RepositoryError::Status(401)),
        }
    }

    async fn admin_logout(&self, bearer: &str) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("fake lock");
        state.calls.push(format!("admin_logout:{bearer}"));
        Ok(())
    }

    async fn list_guests(&self, bearer: &str) -> Result<Vec<GuestRecord>, RepositoryError> {
        let mut state = self.state.lock().expect("fake lock");
        state.calls.push(format!("list_guests:{bearer}"));
        match &state.grant {
            Some(grant) if grant.token == bearer => Ok(state.guests.clone()),
            _ => Err(RepositoryError::Status(401)),
        }
    }
}

pub(crate) fn timestamp(seconds: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn payload(id: i64, nombre: &str, max_boletos: i64) -> GuestPayload {
    GuestPayload {
        id: Some(id),
        nombre: Some(nombre.to_string()),
        max_boletos: Some(max_boletos),
        ..GuestPayload::default()
    }
}

pub(crate) fn session(max_tickets: i64) -> GuestSession {
    GuestSession {
        id: 1,
        token: Some("12345678".to_string()),
        full_name: "Ana García".to_string(),
        max_tickets,
        email: None,
        phone: None,
        table: None,
        confirmed_tickets: None,
        meal: None,
        notes: None,
    }
}

pub(crate) fn sessions_with(session: GuestSession) -> SessionStore<MemoryStorage> {
    let mut sessions = SessionStore::hydrate(MemoryStorage::default());
    sessions.set(session);
    sessions
}

// Guest record with a stable creation time derived from the id.
pub(crate) fn guest_record(id: i64, first_name: &str, last_name: &str) -> GuestRecord {
    GuestRecord {
        id,
        token: format!("{:08}", 10_000_000 + id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: Some(format!("{}@example.com", first_name.to_lowercase())),
        phone: None,
        max_tickets: 3,
        tickets_confirmed: None,
        meal: None,
        notes: None,
        created_at: timestamp(1_700_000_000 + id),
        confirmations: Vec::new(),
    }
}

pub(crate) fn confirmation_record(
    id: i64,
    guest_id: i64,
    attending: bool,
    plus_ones: &[&str],
) -> ConfirmationRecord {
    let at = timestamp(1_700_100_000 + id);
    ConfirmationRecord {
        id,
        guest_id,
        attending,
        dietary_restrictions: None,
        special_requests: None,
        created_at: at,
        updated_at: at,
        plus_ones: plus_ones
            .iter()
            .enumerate()
            .map(|(index, name)| PlusOneRecord {
                id: id * 10 + index as i64,
                confirmation_id: id,
                name: name.to_string(),
                dietary_restrictions: None,
            })
            .collect(),
    }
}
