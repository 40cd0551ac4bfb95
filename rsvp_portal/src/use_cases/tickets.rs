use std::ops::RangeInclusive;

use tracing::{info, warn};

use crate::domain::{FlowError, FlowMessages, GuestRepository, LocalStorage, clamp_tickets};
use crate::use_cases::session_store::SessionStore;

const MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Solicitud inválida.",
    not_found: "Invitación no encontrada.",
    unauthorized: "Solicitud inválida.",
    transport: "No se pudo confirmar la asistencia.",
};
const MISSING_TOKEN: &str = "No hay token válido para confirmar.";
pub const CONFIRMED: &str = "¡Asistencia confirmada! Gracias por tu respuesta ♥";

/// Ticket count picker for the identified guest.
pub struct TicketSelection<R> {
    repository: R,
    maximum: u32,
    selected: u32,
    success: Option<&'static str>,
    error: Option<FlowError>,
}

impl<R: GuestRepository> TicketSelection<R> {
    // None when nobody is identified; the caller sends the guest back home.
    pub fn open<S: LocalStorage>(repository: R, sessions: &SessionStore<S>) -> Option<Self> {
        let session = sessions.get()?;
        let maximum = session.ticket_limit();
        let selected = sessions
            .cached_tickets()
            .or(session.confirmed_tickets)
            .map(|value| clamp_tickets(value, maximum))
            .unwrap_or(1);
        sessions.cache_tickets(selected);

        Some(Self {
            repository,
            maximum,
            selected,
            success: None,
            error: None,
        })
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn selected(&self) -> u32 {
        self.selected
    }

    pub fn options(&self) -> RangeInclusive<u32> {
        1..=self.maximum
    }

    pub fn success(&self) -> Option<&str> {
        self.success
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    pub fn select<S: LocalStorage>(&mut self, sessions: &SessionStore<S>, value: i64) -> u32 {
        self.selected = clamp_tickets(value, self.maximum);
        self.success = None;
        self.error = None;
        sessions.cache_tickets(self.selected);
        self.selected
    }

    pub async fn submit<S: LocalStorage>(
        &mut self,
        sessions: &SessionStore<S>,
    ) -> Result<&'static str, FlowError> {
        self.success = None;
        self.error = None;

        let result = match sessions.token() {
            None => Err(FlowError::Validation(MISSING_TOKEN)),
            Some(token) => self
                .repository
                .request_tickets(&token, self.selected)
                .await
                .map_err(|err| {
                    warn!(error = %err, tickets = self.selected, "ticket confirmation failed");
                    MESSAGES.map(err)
                }),
        };

        match result {
            Ok(()) => {
                info!(tickets = self.selected, "tickets confirmed");
                self.success = Some(CONFIRMED);
                Ok(CONFIRMED)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryError;
    use crate::interface_adapters::storage::MemoryStorage;
    use crate::use_cases::test_support::{FakeRepository, session, sessions_with};

    #[test]
    fn when_nobody_is_identified_then_selection_does_not_open() {
        let sessions = SessionStore::hydrate(MemoryStorage::default());

        assert!(TicketSelection::open(FakeRepository::default(), &sessions).is_none());
    }

    #[test]
    fn when_opened_then_cached_choice_beats_confirmed_count() {
        let mut guest = session(4);
        guest.confirmed_tickets = Some(2);
        let sessions = sessions_with(guest);
        sessions.cache_tickets(3);

        let selection = TicketSelection::open(FakeRepository::default(), &sessions)
            .expect("session present");

        assert_eq!(selection.selected(), 3);
        assert_eq!(selection.options(), 1..=4);
    }

    #[test]
    fn when_no_cache_then_confirmed_count_is_clamped_into_allowance() {
        let mut guest = session(2);
        guest.confirmed_tickets = Some(7);
        let sessions = sessions_with(guest);

        let selection = TicketSelection::open(FakeRepository::default(), &sessions)
            .expect("session present");

        assert_eq!(selection.selected(), 2);
        assert_eq!(sessions.cached_tickets(), Some(2));
    }

    #[test]
    fn when_nothing_is_known_then_selection_starts_at_one() {
        let sessions = sessions_with(session(0));

        let selection = TicketSelection::open(FakeRepository::default(), &sessions)
            .expect("session present");

        assert_eq!(selection.maximum(), 1);
        assert_eq!(selection.selected(), 1);
    }

    #[test]
    fn when_value_is_selected_then_it_is_clamped_and_cached() {
        let sessions = sessions_with(session(3));
        let mut selection = TicketSelection::open(FakeRepository::default(), &sessions)
            .expect("session present");

        assert_eq!(selection.select(&sessions, 9), 3);
        assert_eq!(selection.select(&sessions, -2), 1);
        assert_eq!(selection.select(&sessions, 2), 2);
        assert_eq!(sessions.cached_tickets(), Some(2));
    }

    #[tokio::test]
    async fn when_submitted_then_selected_count_is_posted_for_session_token() {
        let repo = FakeRepository::default();
        let sessions = sessions_with(session(3));
        let mut selection =
            TicketSelection::open(repo.clone(), &sessions).expect("session present");
        selection.select(&sessions, 2);

        let message = selection.submit(&sessions).await.expect("confirmed");

        assert_eq!(message, CONFIRMED);
        assert_eq!(selection.success(), Some(CONFIRMED));
        assert_eq!(repo.calls(), vec!["tickets:12345678:2".to_string()]);
        assert_eq!(sessions.get().and_then(|s| s.confirmed_tickets), None);
    }

    #[tokio::test]
    async fn when_session_has_no_token_then_submit_fails_without_request() {
        let repo = FakeRepository::default();
        let mut tokenless = session(3);
        tokenless.token = None;
        let sessions = sessions_with(tokenless);
        let mut selection =
            TicketSelection::open(repo.clone(), &sessions).expect("session present");

        let err = selection.submit(&sessions).await.expect_err("no token");

        assert_eq!(err.to_string(), MISSING_TOKEN);
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn when_api_rejects_then_error_is_kept_until_next_selection() {
        let cases = [
            (RepositoryError::Status(400), "Solicitud inválida."),
            (RepositoryError::Status(404), "Invitación no encontrada."),
            (RepositoryError::Status(502), "Error del servidor (502)."),
            (
                RepositoryError::Transport("reset".to_string()),
                "No se pudo confirmar la asistencia.",
            ),
        ];

        for (failure, expected) in cases {
            let sessions = sessions_with(session(3));
            let repo = FakeRepository::default().failing_with(failure);
            let mut selection = TicketSelection::open(repo, &sessions).expect("session present");

            let err = selection.submit(&sessions).await.expect_err("rejected");
            assert_eq!(err.to_string(), expected);
            assert!(selection.error().is_some());

            selection.select(&sessions, 1);
            assert!(selection.error().is_none());
        }
    }
}
