use std::sync::Arc;

use tracing::info;

use crate::frameworks::config::PortalConfig;
use crate::interface_adapters::clients::RestGuestRepository;
use crate::interface_adapters::clock::SystemClock;
use crate::interface_adapters::storage::FileStorage;
use crate::use_cases::admin_gate::AdminGate;
use crate::use_cases::meals::MealSelection;
use crate::use_cases::registration::RegistrationFlow;
use crate::use_cases::session_store::SessionStore;
use crate::use_cases::tickets::TicketSelection;
use crate::use_cases::verify_token::VerifyTokenFlow;

pub type Repository = Arc<RestGuestRepository>;
pub type Storage = Arc<FileStorage>;

/// Wires the REST repository and file storage into ready-to-use flows.
pub struct Portal {
    config: PortalConfig,
    repository: Repository,
    storage: Storage,
    sessions: SessionStore<Storage>,
}

impl Portal {
    // Loads `.env` when present, then reads the portal settings.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let _ = dotenvy::dotenv();
        Self::new(PortalConfig::from_env())
    }

    pub fn new(config: PortalConfig) -> Result<Self, url::ParseError> {
        let repository = Arc::new(RestGuestRepository::new(&config.api_url)?);
        let storage = Arc::new(FileStorage::open(config.storage_path.clone()));
        let sessions = SessionStore::hydrate(storage.clone());
        info!(
            api_url = %config.api_url,
            storage = %config.storage_path.display(),
            identified = sessions.get().is_some(),
            "portal ready"
        );

        Ok(Self {
            config,
            repository,
            storage,
            sessions,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore<Storage> {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionStore<Storage> {
        &mut self.sessions
    }

    pub fn token_flow(&self) -> VerifyTokenFlow<Repository> {
        VerifyTokenFlow::new(self.repository.clone(), self.config.token_lookup_timeout)
    }

    pub fn ticket_selection(&self) -> Option<TicketSelection<Repository>> {
        TicketSelection::open(self.repository.clone(), &self.sessions)
    }

    pub fn meal_selection(&self) -> Option<MealSelection<Repository>> {
        MealSelection::open(self.repository.clone(), &self.sessions)
    }

    pub fn registration(&self) -> RegistrationFlow<Repository> {
        RegistrationFlow::new(self.repository.clone())
    }

    pub fn admin_gate(&self) -> AdminGate<Repository, Storage, SystemClock> {
        AdminGate::new(self.repository.clone(), self.storage.clone(), SystemClock)
    }
}
