use tracing::warn;

use crate::domain::{GuestSession, LocalStorage};

pub const PAYLOAD_KEY: &str = "inv:payload";
pub const TOKEN_KEY: &str = "inv:token";
pub const TICKETS_KEY: &str = "inv:boletos";
pub const MEAL_KEY: &str = "inv:comida";

/// The identified guest for this device, mirrored into local storage.
///
/// Storage write failures are logged and otherwise ignored: the in-memory
/// session stays authoritative for the running process.
pub struct SessionStore<S> {
    storage: S,
    current: Option<GuestSession>,
}

impl<S: LocalStorage> SessionStore<S> {
    // Restore the persisted session. A corrupt payload is dropped, never fatal.
    pub fn hydrate(storage: S) -> Self {
        let current = match storage.get_item(PAYLOAD_KEY) {
            None => None,
            Some(raw) => match serde_json::from_str::<GuestSession>(&raw) {
                Ok(session) => Some(session),
                Err(err) => {
                    warn!(error = %err, "discarding corrupt stored session");
                    remove(&storage, PAYLOAD_KEY);
                    None
                }
            },
        };

        Self { storage, current }
    }

    pub fn get(&self) -> Option<&GuestSession> {
        self.current.as_ref()
    }

    pub fn set(&mut self, session: GuestSession) {
        let switched_guest = self
            .current
            .as_ref()
            .is_some_and(|previous| previous.id != session.id);
        if switched_guest {
            // Selections made for another guest must not leak into this one.
            remove(&self.storage, TICKETS_KEY);
            remove(&self.storage, MEAL_KEY);
        }

        match serde_json::to_string(&session) {
            Ok(raw) => write(&self.storage, PAYLOAD_KEY, &raw),
            Err(err) => warn!(error = %err, "failed to serialize session"),
        }
        self.current = Some(session);
    }

    pub fn clear(&mut self) {
        self.current = None;
        for key in [PAYLOAD_KEY, TOKEN_KEY, TICKETS_KEY, MEAL_KEY] {
            remove(&self.storage, key);
        }
    }

    // Token for API calls: the session's own, else the separately stored one.
    pub fn token(&self) -> Option<String> {
        self.current
            .as_ref()
            .and_then(|session| session.token.clone())
            .filter(|token| !token.is_empty())
            .or_else(|| self.storage.get_item(TOKEN_KEY))
            .filter(|token| !token.is_empty())
    }

    pub fn remember_token(&self, token: &str) {
        write(&self.storage, TOKEN_KEY, token);
    }

    pub fn cached_tickets(&self) -> Option<i64> {
        self.storage
            .get_item(TICKETS_KEY)
            .and_then(|raw| raw.trim().parse().ok())
    }

    pub fn cache_tickets(&self, tickets: u32) {
        write(&self.storage, TICKETS_KEY, &tickets.to_string());
    }

    pub fn cached_meal(&self) -> Option<String> {
        self.storage.get_item(MEAL_KEY)
    }

    pub fn cache_meal(&self, meal: &str) {
        write(&self.storage, MEAL_KEY, meal);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn write<S: LocalStorage>(storage: &S, key: &str, value: &str) {
    if let Err(err) = storage.set_item(key, value) {
        warn!(key, error = %err, "failed to persist local value");
    }
}

fn remove<S: LocalStorage>(storage: &S, key: &str) {
    if let Err(err) = storage.remove_item(key) {
        warn!(key, error = %err, "failed to remove local value");
    }
}
