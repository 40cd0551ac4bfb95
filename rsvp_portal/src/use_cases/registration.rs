use tracing::{info, warn};

use crate::domain::{
    ConfirmationDraft, ConfirmationRecord, FlowError, FlowMessages, GuestRepository, LocalStorage,
    PlusOneDraft,
};
use crate::use_cases::session_store::SessionStore;

const CONFIRMATION_MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Solicitud inválida.",
    not_found: "Invitación no encontrada.",
    unauthorized: "Solicitud inválida.",
    transport: "Error al enviar confirmación",
};
const COMMENT_MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Solicitud inválida.",
    not_found: "Invitación no encontrada.",
    unauthorized: "Solicitud inválida.",
    transport: "No se pudo enviar el comentario.",
};
const CURRENT_MESSAGES: FlowMessages = FlowMessages {
    bad_request: "Solicitud inválida.",
    not_found: "Invitación no encontrada.",
    unauthorized: "Solicitud inválida.",
    transport: "No se pudo cargar la confirmación.",
};
const MISSING_TOKEN: &str = "No hay token válido para confirmar.";
const MISSING_GUEST: &str = "No hay invitado identificado.";
const MISSING_NAME: &str = "El nombre es requerido";
const TOO_MANY_PLUS_ONES: &str = "Demasiados acompañantes.";
const EMPTY_COMMENT: &str = "Escribe un comentario.";
pub const SUBMITTED: &str = "¡Confirmación Enviada!";
pub const COMMENT_SENT: &str = "¡Gracias por tu mensaje!";

/// Full RSVP and comment submission for the identified guest.
pub struct RegistrationFlow<R> {
    repository: R,
}

impl<R: GuestRepository> RegistrationFlow<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Form contents to show on arrival: the guest's last answer when there
    /// is one, otherwise an empty "attending" form.
    pub async fn existing<S: LocalStorage>(
        &self,
        sessions: &SessionStore<S>,
    ) -> Result<ConfirmationDraft, FlowError> {
        let Some(token) = sessions.token() else {
            return Err(FlowError::Validation(MISSING_TOKEN));
        };

        let current = self
            .repository
            .current_confirmation(&token)
            .await
            .map_err(|err| {
                warn!(error = %err, "confirmation load failed");
                CURRENT_MESSAGES.map(err)
            })?;

        Ok(current.map(draft_from_record).unwrap_or_else(empty_draft))
    }

    pub async fn submit<S: LocalStorage>(
        &mut self,
        sessions: &SessionStore<S>,
        draft: ConfirmationDraft,
    ) -> Result<ConfirmationRecord, FlowError> {
        let Some(token) = sessions.token() else {
            return Err(FlowError::Validation(MISSING_TOKEN));
        };
        let max_plus_ones = sessions
            .get()
            .map(|session| session.ticket_limit().saturating_sub(1) as usize)
            .unwrap_or(0);
        let draft = normalize(draft, max_plus_ones)?;

        let confirmation = self
            .repository
            .submit_confirmation(&token, &draft)
            .await
            .map_err(|err| {
                warn!(error = %err, "confirmation submit failed");
                CONFIRMATION_MESSAGES.map(err)
            })?;
        info!(
            attending = confirmation.attending,
            plus_ones = confirmation.plus_ones.len(),
            "confirmation submitted"
        );
        Ok(confirmation)
    }

    pub async fn leave_comment<S: LocalStorage>(
        &mut self,
        sessions: &mut SessionStore<S>,
        text: &str,
    ) -> Result<&'static str, FlowError> {
        let comment = text.trim();
        if comment.is_empty() {
            return Err(FlowError::Validation(EMPTY_COMMENT));
        }
        let Some(mut session) = sessions.get().cloned() else {
            return Err(FlowError::Validation(MISSING_GUEST));
        };

        self.repository
            .leave_comment(session.id, comment)
            .await
            .map_err(|err| {
                warn!(error = %err, guest_id = session.id, "comment submit failed");
                COMMENT_MESSAGES.map(err)
            })?;

        session.notes = Some(comment.to_string());
        sessions.set(session);
        Ok(COMMENT_SENT)
    }
}

fn draft_from_record(record: ConfirmationRecord) -> ConfirmationDraft {
    ConfirmationDraft {
        attending: record.attending,
        dietary_restrictions: record.dietary_restrictions,
        special_requests: record.special_requests,
        plus_ones: record
            .plus_ones
            .into_iter()
            .map(|plus_one| PlusOneDraft {
                name: plus_one.name,
                dietary_restrictions: plus_one.dietary_restrictions,
            })
            .collect(),
    }
}

fn empty_draft() -> ConfirmationDraft {
    ConfirmationDraft {
        attending: true,
        dietary_restrictions: None,
        special_requests: None,
        plus_ones: Vec::new(),
    }
}

fn normalize(draft: ConfirmationDraft, max_plus_ones: usize) -> Result<ConfirmationDraft, FlowError> {
    let plus_ones = if draft.attending {
        draft
            .plus_ones
            .into_iter()
            .map(|plus_one| {
                let name = plus_one.name.trim().to_string();
                if name.is_empty() {
                    return Err(FlowError::Validation(MISSING_NAME));
                }
                Ok(PlusOneDraft {
                    name,
                    dietary_restrictions: non_blank(plus_one.dietary_restrictions),
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    if plus_ones.len() > max_plus_ones {
        return Err(FlowError::Validation(TOO_MANY_PLUS_ONES));
    }

    Ok(ConfirmationDraft {
        attending: draft.attending,
        dietary_restrictions: non_blank(draft.dietary_restrictions),
        special_requests: non_blank(draft.special_requests),
        plus_ones,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
