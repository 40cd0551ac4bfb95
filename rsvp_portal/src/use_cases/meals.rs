use tracing::{info, warn};

use crate::domain::{FlowError, FlowMessages, GuestRepository, LocalStorage, Meal};
use crate::use_cases::session_store::SessionStore;

const MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Solicitud inválida.",
    not_found: "Invitación no encontrada.",
    unauthorized: "Solicitud inválida.",
    transport: "No se pudo guardar la comida.",
};
const MISSING_TOKEN: &str = "No hay token válido para guardar la comida.";
pub const SAVED: &str = "¡Registro de comida guardado!";

// First valid candidate wins; anything else falls back to the default meal.
pub fn resolve_meal(cached: Option<&str>, stored: Option<&str>) -> Meal {
    cached
        .and_then(Meal::parse)
        .or_else(|| stored.and_then(Meal::parse))
        .unwrap_or_default()
}

pub struct MealSelection<R> {
    repository: R,
    selected: Meal,
    success: Option<&'static str>,
    error: Option<FlowError>,
}

impl<R: GuestRepository> MealSelection<R> {
    pub fn open<S: LocalStorage>(repository: R, sessions: &SessionStore<S>) -> Option<Self> {
        let session = sessions.get()?;
        let cached = sessions.cached_meal();
        let selected = resolve_meal(cached.as_deref(), session.meal.as_deref());

        Some(Self {
            repository,
            selected,
            success: None,
            error: None,
        })
    }

    pub fn options(&self) -> [Meal; 3] {
        Meal::ALL
    }

    pub fn selected(&self) -> Meal {
        self.selected
    }

    pub fn success(&self) -> Option<&str> {
        self.success
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    // Unknown input selects the default meal; the choice is cached right away.
    pub fn choose<S: LocalStorage>(&mut self, sessions: &SessionStore<S>, input: &str) -> Meal {
        self.selected = Meal::parse(input).unwrap_or_default();
        sessions.cache_meal(self.selected.as_str());
        self.selected
    }

    pub async fn save<S: LocalStorage>(
        &mut self,
        sessions: &SessionStore<S>,
    ) -> Result<&'static str, FlowError> {
        self.success = None;
        self.error = None;

        let result = match sessions.token() {
            None => Err(FlowError::Validation(MISSING_TOKEN)),
            Some(token) => self
                .repository
                .save_meal(&token, self.selected)
                .await
                .map_err(|err| {
                    warn!(error = %err, meal = self.selected.as_str(), "meal save failed");
                    MESSAGES.map(err)
                }),
        };

        match result {
            Ok(()) => {
                info!(meal = self.selected.as_str(), "meal saved");
                self.success = Some(SAVED);
                Ok(SAVED)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}
