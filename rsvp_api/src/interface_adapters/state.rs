use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::{
    AdminSession, Confirmation, ConfirmationDraft, Guest, GuestWithConfirmations, Meal, PlusOne,
};
use crate::domain::ports::{AdminSessionStore, Clock, GuestStore};

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    // Either the PostgreSQL store or the in-memory one.
    pub guests: Arc<dyn GuestStore>,
    pub admin_sessions: Arc<Mutex<HashMap<String, AdminSession>>>,
    pub admin: AdminSettings,
}

impl AppState {
    pub fn new(guests: Arc<dyn GuestStore>, admin: AdminSettings) -> Self {
        Self {
            guests,
            admin_sessions: Arc::new(Mutex::new(HashMap::new())),
            admin,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AdminSettings {
    // Hex SHA-256 of the admin password; `None` disables admin login.
    pub password_sha256: Option<String>,
    pub session_ttl_seconds: u64,
}

// In-memory admin session store adapter.
#[derive(Clone)]
pub struct InMemoryAdminSessionStore {
    pub sessions: Arc<Mutex<HashMap<String, AdminSession>>>,
}

#[async_trait]
impl AdminSessionStore for InMemoryAdminSessionStore {
    async fn insert(&self, token: String, session: AdminSession) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<AdminSession>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }

    async fn remove_expired(&self, now: u64) -> Result<usize, String> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        Ok(before - sessions.len())
    }
}

// System clock adapter used by admin use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[derive(Default)]
struct GuestTables {
    guests: Vec<Guest>,
    confirmations: Vec<Confirmation>,
    next_confirmation_id: i64,
    next_plus_one_id: i64,
}

impl GuestTables {
    fn guest_mut(&mut self, guest_id: i64) -> Result<&mut Guest, String> {
        self.guests
            .iter_mut()
            .find(|guest| guest.id == guest_id)
            .ok_or_else(|| format!("guest {guest_id} not found"))
    }

    // Newest confirmation wins; ids break timestamp ties.
    fn latest_confirmation_index(&self, guest_id: i64) -> Option<usize> {
        self.confirmations
            .iter()
            .enumerate()
            .filter(|(_, confirmation)| confirmation.guest_id == guest_id)
            .max_by_key(|(_, confirmation)| (confirmation.created_at, confirmation.id))
            .map(|(index, _)| index)
    }

    fn new_confirmation(&mut self, guest_id: i64, attending: bool) -> usize {
        self.next_confirmation_id += 1;
        let now = Utc::now();
        self.confirmations.push(Confirmation {
            id: self.next_confirmation_id,
            guest_id,
            attending,
            dietary_restrictions: None,
            special_requests: None,
            created_at: now,
            updated_at: now,
            plus_ones: Vec::new(),
        });
        self.confirmations.len() - 1
    }
}

// In-memory guest store used for local runs and tests.
#[derive(Clone, Default)]
pub struct InMemoryGuestStore {
    tables: Arc<Mutex<GuestTables>>,
}

impl InMemoryGuestStore {
    pub fn with_guests(guests: Vec<Guest>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(GuestTables {
                guests,
                ..GuestTables::default()
            })),
        }
    }
}

#[async_trait]
impl GuestStore for InMemoryGuestStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .guests
            .iter()
            .find(|guest| guest.token == token)
            .cloned())
    }

    async fn find_by_id(&self, guest_id: i64) -> Result<Option<Guest>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .guests
            .iter()
            .find(|guest| guest.id == guest_id)
            .cloned())
    }

    // Both writes happen under one lock, after the guest is known to exist.
    async fn confirm_tickets(&self, guest_id: i64, tickets: i32) -> Result<(), String> {
        let mut tables = self.tables.lock().await;
        tables.guest_mut(guest_id)?.tickets_confirmed = Some(tickets);
        match tables.latest_confirmation_index(guest_id) {
            Some(index) => {
                let confirmation = &mut tables.confirmations[index];
                confirmation.attending = true;
                confirmation.updated_at = Utc::now();
            }
            None => {
                tables.new_confirmation(guest_id, true);
            }
        }
        Ok(())
    }

    async fn set_meal(&self, guest_id: i64, meal: Meal) -> Result<(), String> {
        let mut tables = self.tables.lock().await;
        tables.guest_mut(guest_id)?.meal = Some(meal);
        Ok(())
    }

    async fn set_notes(&self, guest_id: i64, notes: &str) -> Result<(), String> {
        let mut tables = self.tables.lock().await;
        tables.guest_mut(guest_id)?.notes = Some(notes.to_string());
        Ok(())
    }

    async fn latest_confirmation(&self, guest_id: i64) -> Result<Option<Confirmation>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .latest_confirmation_index(guest_id)
            .map(|index| tables.confirmations[index].clone()))
    }

    async fn save_confirmation(
        &self,
        guest_id: i64,
        draft: ConfirmationDraft,
    ) -> Result<Confirmation, String> {
        let mut tables = self.tables.lock().await;
        tables.guest_mut(guest_id)?;
        let index = match tables.latest_confirmation_index(guest_id) {
            Some(index) => index,
            None => tables.new_confirmation(guest_id, draft.attending),
        };

        let mut plus_ones = Vec::with_capacity(draft.plus_ones.len());
        let confirmation_id = tables.confirmations[index].id;
        for plus_one in draft.plus_ones {
            tables.next_plus_one_id += 1;
            plus_ones.push(PlusOne {
                id: tables.next_plus_one_id,
                confirmation_id,
                name: plus_one.name,
                dietary_restrictions: plus_one.dietary_restrictions,
            });
        }

        let confirmation = &mut tables.confirmations[index];
        confirmation.attending = draft.attending;
        confirmation.dietary_restrictions = draft.dietary_restrictions;
        confirmation.special_requests = draft.special_requests;
        confirmation.plus_ones = plus_ones;
        confirmation.updated_at = Utc::now();
        Ok(confirmation.clone())
    }

    async fn list_with_confirmations(&self) -> Result<Vec<GuestWithConfirmations>, String> {
        let tables = self.tables.lock().await;
        let mut guests: Vec<GuestWithConfirmations> = tables
            .guests
            .iter()
            .map(|guest| {
                let mut confirmations: Vec<Confirmation> = tables
                    .confirmations
                    .iter()
                    .filter(|confirmation| confirmation.guest_id == guest.id)
                    .cloned()
                    .collect();
                confirmations.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
                GuestWithConfirmations {
                    guest: guest.clone(),
                    confirmations,
                }
            })
            .collect();
        guests.sort_by(|a, b| {
            (b.guest.created_at, b.guest.id).cmp(&(a.guest.created_at, a.guest.id))
        });
        Ok(guests)
    }
}

#[derive(FromRow)]
struct GuestRow {
    id: i64,
    token: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    max_tickets: i32,
    tickets_confirmed: Option<i32>,
    meal: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        Guest {
            id: row.id,
            token: row.token,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            max_tickets: row.max_tickets,
            tickets_confirmed: row.tickets_confirmed,
            // The column has a CHECK constraint; unknown values read as unset.
            meal: row.meal.as_deref().and_then(Meal::parse),
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ConfirmationRow {
    id: i64,
    guest_id: i64,
    attending: bool,
    dietary_restrictions: Option<String>,
    special_requests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConfirmationRow {
    fn into_confirmation(self, plus_ones: Vec<PlusOne>) -> Confirmation {
        Confirmation {
            id: self.id,
            guest_id: self.guest_id,
            attending: self.attending,
            dietary_restrictions: self.dietary_restrictions,
            special_requests: self.special_requests,
            created_at: self.created_at,
            updated_at: self.updated_at,
            plus_ones,
        }
    }
}

#[derive(FromRow)]
struct PlusOneRow {
    id: i64,
    confirmation_id: i64,
    name: String,
    dietary_restrictions: Option<String>,
}

impl From<PlusOneRow> for PlusOne {
    fn from(row: PlusOneRow) -> Self {
        PlusOne {
            id: row.id,
            confirmation_id: row.confirmation_id,
            name: row.name,
            dietary_restrictions: row.dietary_restrictions,
        }
    }
}

const GUEST_COLUMNS: &str = "id, token, first_name, last_name, email, phone, max_tickets, \
     tickets_confirmed, meal, notes, created_at";

const CONFIRMATION_COLUMNS: &str =
    "id, guest_id, attending, dietary_restrictions, special_requests, created_at, updated_at";

// PostgreSQL-backed guest store.
#[derive(Clone)]
pub struct PostgresGuestStore {
    pub db: PgPool,
}

// Maps a zero-row UPDATE to a missing guest.
fn ensure_updated(
    result: Result<sqlx::postgres::PgQueryResult, sqlx::Error>,
    guest_id: i64,
) -> Result<(), String> {
    let result = result.map_err(|err| err.to_string())?;
    if result.rows_affected() == 0 {
        return Err(format!("guest {guest_id} not found"));
    }
    Ok(())
}

#[async_trait]
impl GuestStore for PostgresGuestStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, String> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE token = $1");
        let row = sqlx::query_as::<_, GuestRow>(&sql)
            .bind(token)
            .fetch_optional(&self.db)
            .await
            .map_err(|err| err.to_string())?;
        Ok(row.map(Guest::from))
    }

    async fn find_by_id(&self, guest_id: i64) -> Result<Option<Guest>, String> {
        let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1");
        let row = sqlx::query_as::<_, GuestRow>(&sql)
            .bind(guest_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|err| err.to_string())?;
        Ok(row.map(Guest::from))
    }


    async fn set_meal(&self, guest_id: i64, meal: Meal) -> Result<(), String> {
        let result = sqlx::query("UPDATE guests SET meal = $2, updated_at = now() WHERE id = $1")
            .bind(guest_id)
            .bind(meal.as_str())
            .execute(&self.db)
            .await;
        ensure_updated(result, guest_id)
    }

    async fn set_notes(&self, guest_id: i64, notes: &str) -> Result<(), String> {
        let result = sqlx::query("UPDATE guests SET notes = $2, updated_at = now() WHERE id = $1")
            .bind(guest_id)
            .bind(notes)
            .execute(&self.db)
            .await;
        ensure_updated(result, guest_id)
    }

    async fn confirm_tickets(&self, guest_id: i64, tickets: i32) -> Result<(), String> {
        let mut tx = self.db.begin().await.map_err(|err| err.to_string())?;

        let result =
            sqlx::query("UPDATE guests SET tickets_confirmed = $2, updated_at = now() WHERE id = $1")
                .bind(guest_id)
                .bind(tickets)
                .execute(&mut *tx)
                .await;
        // Returning early drops `tx`, which rolls the update back.
        ensure_updated(result, guest_id)?;

        let latest: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM confirmations
            WHERE guest_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(guest_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| err.to_string())?;

        match latest {
            Some((confirmation_id,)) => {
                sqlx::query(
                    "UPDATE confirmations SET attending = TRUE, updated_at = now() WHERE id = $1",
                )
                .bind(confirmation_id)
                .execute(&mut *tx)
                .await
                .map_err(|err| err.to_string())?;
            }
            None => {
                sqlx::query("INSERT INTO confirmations (guest_id, attending) VALUES ($1, TRUE)")
                    .bind(guest_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| err.to_string())?;
            }
        }

        tx.commit().await.map_err(|err| err.to_string())
    }

    async fn latest_confirmation(&self, guest_id: i64) -> Result<Option<Confirmation>, String> {
        let sql = format!(
            "SELECT {CONFIRMATION_COLUMNS} FROM confirmations WHERE guest_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let Some(row) = sqlx::query_as::<_, ConfirmationRow>(&sql)
            .bind(guest_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|err| err.to_string())?
        else {
            return Ok(None);
        };

        let plus_ones = sqlx::query_as::<_, PlusOneRow>(
            "SELECT id, confirmation_id, name, dietary_restrictions FROM plus_ones \
             WHERE confirmation_id = $1 ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        Ok(Some(
            row.into_confirmation(plus_ones.into_iter().map(PlusOne::from).collect()),
        ))
    }

    async fn save_confirmation(
        &self,
        guest_id: i64,
        draft: ConfirmationDraft,
    ) -> Result<Confirmation, String> {
        let mut tx = self.db.begin().await.map_err(|err| err.to_string())?;

        let latest: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM confirmations
            WHERE guest_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(guest_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| err.to_string())?;

        let row = match latest {
            Some((confirmation_id,)) => {
                let sql = format!(
                    "UPDATE confirmations SET attending = $2, dietary_restrictions = $3, \
                     special_requests = $4, updated_at = now() WHERE id = $1 \
                     RETURNING {CONFIRMATION_COLUMNS}"
                );
                sqlx::query_as::<_, ConfirmationRow>(&sql)
                    .bind(confirmation_id)
                    .bind(draft.attending)
                    .bind(&draft.dietary_restrictions)
                    .bind(&draft.special_requests)
                    .fetch_one(&mut *tx)
                    .await
            }
            None => {
                let sql = format!(
                    "INSERT INTO confirmations \
                     (guest_id, attending, dietary_restrictions, special_requests) \
                     VALUES ($1, $2, $3, $4) RETURNING {CONFIRMATION_COLUMNS}"
                );
                sqlx::query_as::<_, ConfirmationRow>(&sql)
                    .bind(guest_id)
                    .bind(draft.attending)
                    .bind(&draft.dietary_restrictions)
                    .bind(&draft.special_requests)
                    .fetch_one(&mut *tx)
                    .await
            }
        }
        .map_err(|err| err.to_string())?;

        // Plus-ones are replaced wholesale: delete, then reinsert.
        sqlx::query("DELETE FROM plus_ones WHERE confirmation_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await
            .map_err(|err| err.to_string())?;

        let mut plus_ones = Vec::with_capacity(draft.plus_ones.len());
        for plus_one in draft.plus_ones {
            let inserted = sqlx::query_as::<_, PlusOneRow>(
                r#"
                INSERT INTO plus_ones (confirmation_id, name, dietary_restrictions)
                VALUES ($1, $2, $3)
                RETURNING id, confirmation_id, name, dietary_restrictions
                "#,
            )
            .bind(row.id)
            .bind(plus_one.name)
            .bind(plus_one.dietary_restrictions)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| err.to_string())?;
            plus_ones.push(PlusOne::from(inserted));
        }

        tx.commit().await.map_err(|err| err.to_string())?;
        Ok(row.into_confirmation(plus_ones))
    }

    async fn list_with_confirmations(&self) -> Result<Vec<GuestWithConfirmations>, String> {
        let guests = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let confirmations = sqlx::query_as::<_, ConfirmationRow>(&format!(
            "SELECT {CONFIRMATION_COLUMNS} FROM confirmations ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let plus_one_rows = sqlx::query_as::<_, PlusOneRow>(
            "SELECT id, confirmation_id, name, dietary_restrictions FROM plus_ones ORDER BY id",
        )
        .fetch_all(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let mut plus_ones: HashMap<i64, Vec<PlusOne>> = HashMap::new();
        for row in plus_one_rows {
            plus_ones
                .entry(row.confirmation_id)
                .or_default()
                .push(PlusOne::from(row));
        }

        let mut by_guest: HashMap<i64, Vec<Confirmation>> = HashMap::new();
        for row in confirmations {
            let nested = plus_ones.remove(&row.id).unwrap_or_default();
            by_guest
                .entry(row.guest_id)
                .or_default()
                .push(row.into_confirmation(nested));
        }

        Ok(guests
            .into_iter()
            .map(|row| {
                let confirmations = by_guest.remove(&row.id).unwrap_or_default();
                GuestWithConfirmations {
                    guest: Guest::from(row),
                    confirmations,
                }
            })
            .collect())
    }
}
