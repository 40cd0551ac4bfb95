use tracing::{info, warn};

use crate::domain::{AdminGrant, Clock, FlowError, FlowMessages, GuestRepository, LocalStorage};
use crate::use_cases::admin_report::AdminReport;

pub const ADMIN_KEY: &str = "admin_authenticated";

const LOGIN_MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Contraseña incorrecta",
    not_found: "Error de autenticación",
    unauthorized: "Contraseña incorrecta",
    transport: "Error de autenticación",
};
const REPORT_MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Error al cargar datos administrativos",
    not_found: "Error al cargar datos administrativos",
    unauthorized: SESSION_EXPIRED,
    transport: "Error al cargar datos administrativos",
};
const EMPTY_PASSWORD: &str = "Ingresa la contraseña";
const SESSION_EXPIRED: &str = "Sesión de administrador expirada";
const GRANT_NOT_SAVED: &str = "No se pudo guardar la sesión de administrador.";

/// Admin access gate backed by an expiring bearer grant kept in local storage.
pub struct AdminGate<R, S, C> {
    repository: R,
    storage: S,
    clock: C,
}

impl<R, S, C> AdminGate<R, S, C>
where
    R: GuestRepository,
    S: LocalStorage,
    C: Clock,
{
    pub fn new(repository: R, storage: S, clock: C) -> Self {
        Self {
            repository,
            storage,
            clock,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_grant().is_some()
    }

    // Expired or unreadable grants are removed and count as logged out.
    pub fn current_grant(&self) -> Option<AdminGrant> {
        let raw = self.storage.get_item(ADMIN_KEY)?;
        match serde_json::from_str::<AdminGrant>(&raw) {
            Ok(grant) if grant.expires_at > self.clock.now_epoch_seconds() => Some(grant),
            Ok(_) => {
                info!("admin grant expired");
                self.forget();
                None
            }
            Err(err) => {
                warn!(error = %err, "discarding corrupt admin grant");
                self.forget();
                None
            }
        }
    }

    pub async fn login(&self, password: &str) -> Result<(), FlowError> {
        if password.is_empty() {
            return Err(FlowError::Validation(EMPTY_PASSWORD));
        }

        let grant = self.repository.admin_login(password).await.map_err(|err| {
            warn!(error = %err, "admin login failed");
            LOGIN_MESSAGES.map(err)
        })?;
        let raw = serde_json::to_string(&grant).map_err(|err| {
            warn!(error = %err, "failed to serialize admin grant");
            FlowError::UnexpectedResponse
        })?;
        if let Err(err) = self.storage.set_item(ADMIN_KEY, &raw) {
            warn!(error = %err, "failed to persist admin grant");
            // An unsaved grant can never be presented again, so give it back.
            if let Err(err) = self.repository.admin_logout(&grant.token).await {
                warn!(error = %err, "admin logout request failed");
            }
            return Err(FlowError::Transport(GRANT_NOT_SAVED));
        }
        info!(expires_at = grant.expires_at, "admin logged in");
        Ok(())
    }

    // Revocation is best-effort; the local grant is always dropped.
    pub async fn logout(&self) {
        if let Some(grant) = self.current_grant() {
            if let Err(err) = self.repository.admin_logout(&grant.token).await {
                warn!(error = %err, "admin logout request failed");
            }
        }
        self.forget();
    }

    pub async fn load_report(&self) -> Result<AdminReport, FlowError> {
        let Some(grant) = self.current_grant() else {
            return Err(FlowError::Unauthorized(SESSION_EXPIRED));
        };

        match self.repository.list_guests(&grant.token).await {
            Ok(guests) => {
                info!(guests = guests.len(), "admin report loaded");
                Ok(AdminReport::new(guests))
            }
            Err(err) => {
                warn!(error = %err, "admin report load failed");
                let flow_err = REPORT_MESSAGES.map(err);
                if matches!(flow_err, FlowError::Unauthorized(_)) {
                    self.forget();
                }
                Err(flow_err)
            }
        }
    }

    fn forget(&self) {
        if let Err(err) = self.storage.remove_item(ADMIN_KEY) {
            warn!(error = %err, "failed to remove admin grant");
        }
    }
}
