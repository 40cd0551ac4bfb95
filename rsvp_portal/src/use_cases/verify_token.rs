use std::time::Duration;

use tracing::{info, warn};

use crate::domain::{
    FlowError, FlowMessages, GuestPayload, GuestRepository, GuestSession, LocalStorage,
    is_valid_token,
};
use crate::use_cases::session_store::SessionStore;

const MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Token inválido.",
    not_found: "Token no encontrado.",
    unauthorized: "Token inválido.",
    transport: "Error al validar token.",
};

// Where the guest goes after the token screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Registration,
    Home,
}

pub struct VerifyTokenFlow<R> {
    repository: R,
    timeout: Duration,
    error: Option<FlowError>,
}

impl<R: GuestRepository> VerifyTokenFlow<R> {
    pub fn new(repository: R, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
            error: None,
        }
    }

    // Last failure, kept for display until the next attempt.
    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    pub async fn submit<S: LocalStorage>(
        &mut self,
        sessions: &mut SessionStore<S>,
        input: &str,
    ) -> Result<Navigation, FlowError> {
        self.error = None;
        let result = self.verify(sessions, input).await;
        if let Err(err) = &result {
            self.error = Some(err.clone());
        }
        result
    }

    async fn verify<S: LocalStorage>(
        &self,
        sessions: &mut SessionStore<S>,
        input: &str,
    ) -> Result<Navigation, FlowError> {
        if sessions.get().is_some() {
            return Ok(Navigation::Home);
        }

        let token = input;
        if !is_valid_token(token) {
            return Err(FlowError::Validation(
                "El token debe tener exactamente 8 dígitos.",
            ));
        }

        // Dropping the lookup future on expiry cancels the request.
        let payload = match tokio::time::timeout(self.timeout, self.repository.lookup_guest(token))
            .await
        {
            Ok(Ok(payload)) => payload,
            Ok(Err(err)) => {
                warn!(error = %err, "token lookup failed");
                return Err(MESSAGES.map(err));
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "token lookup timed out");
                return Err(FlowError::Timeout);
            }
        };

        let session = session_from_payload(payload, token).ok_or(FlowError::UnexpectedResponse)?;
        info!(guest_id = session.id, "guest identified by token");
        sessions.set(session);
        sessions.remember_token(token);
        Ok(Navigation::Registration)
    }
}

// Requires a non-zero id, a non-empty name and a non-zero allowance.
fn session_from_payload(payload: GuestPayload, token: &str) -> Option<GuestSession> {
    let id = payload.id.filter(|id| *id != 0)?;
    let full_name = payload.nombre.filter(|name| !name.trim().is_empty())?;
    let max_tickets = payload.max_boletos.filter(|max| *max != 0)?;

    Some(GuestSession {
        id,
        token: Some(
            payload
                .token
                .filter(|stored| !stored.is_empty())
                .unwrap_or_else(|| token.to_string()),
        ),
        full_name,
        max_tickets,
        email: None,
        phone: payload.telefono,
        table: None,
        confirmed_tickets: payload.boletos,
        meal: payload.comida,
        notes: payload.comentarios,
    })
}
