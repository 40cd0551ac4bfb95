use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{
    AdminGrant, ConfirmationDraft, ConfirmationRecord, GuestPayload, GuestRecord,
    GuestRepository, Meal, RepositoryError,
};

// Thin wrapper around reqwest for RSVP API calls.
#[derive(Clone)]
pub struct RestGuestRepository {
    http: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct TicketsRequest {
    boletos_solicitados: u32,
}

#[derive(Serialize)]
struct MealRequest<'a> {
    comida: &'a str,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    comentario: &'a str,
    invitado: i64,
}

#[derive(Serialize)]
struct AdminLoginRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct AdminLoginResponse {
    token: String,
    expires_at: u64,
}

impl RestGuestRepository {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn transport(err: reqwest::Error) -> RepositoryError {
    if err.is_timeout() {
        RepositoryError::Timeout
    } else {
        RepositoryError::Transport(err.to_string())
    }
}

fn decode(err: reqwest::Error) -> RepositoryError {
    RepositoryError::Decode(err.to_string())
}

// Non-success statuses surface as `Status` so flows can word them.
fn check_status(res: Response) -> Result<Response, RepositoryError> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        Err(RepositoryError::Status(status.as_u16()))
    }
}

#[async_trait]
impl GuestRepository for RestGuestRepository {
    async fn lookup_guest(&self, token: &str) -> Result<GuestPayload, RepositoryError> {
        let url = self.endpoint(&["api", "invitados", token]);
        let res = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        check_status(res)?.json::<GuestPayload>().await.map_err(decode)
    }

    async fn request_tickets(&self, token: &str, tickets: u32) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["api", "invitados", token, "boletos"]);
        let res = self
            .http
            .post(url)
            .json(&TicketsRequest {
                boletos_solicitados: tickets,
            })
            .send()
            .await
            .map_err(transport)?;

        check_status(res).map(|_| ())
    }

    async fn save_meal(&self, token: &str, meal: Meal) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["api", "invitados", token, "comida"]);
        let res = self
            .http
            .post(url)
            .json(&MealRequest {
                comida: meal.as_str(),
            })
            .send()
            .await
            .map_err(transport)?;

        check_status(res).map(|_| ())
    }

    async fn leave_comment(&self, guest_id: i64, comment: &str) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["api", "comentarios"]);
        let res = self
            .http
            .post(url)
            .json(&CommentRequest {
                comentario: comment,
                invitado: guest_id,
            })
            .send()
            .await
            .map_err(transport)?;

        check_status(res).map(|_| ())
    }

    async fn submit_confirmation(
        &self,
        token: &str,
        draft: &ConfirmationDraft,
    ) -> Result<ConfirmationRecord, RepositoryError> {
        let url = self.endpoint(&["api", "invitados", token, "confirmacion"]);
        let res = self
            .http
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(transport)?;

        check_status(res)?
            .json::<ConfirmationRecord>()
            .await
            .map_err(decode)
    }

    // The API answers `null` until the guest has sent an RSVP.
    async fn current_confirmation(
        &self,
        token: &str,
    ) -> Result<Option<ConfirmationRecord>, RepositoryError> {
        let url = self.endpoint(&["api", "invitados", token, "confirmacion"]);
        let res = self.http.get(url).send().await.map_err(transport)?;

        check_status(res)?
            .json::<Option<ConfirmationRecord>>()
            .await
            .map_err(decode)
    }

    async fn admin_login(&self, password: &str) -> Result<AdminGrant, RepositoryError> {
        let url = self.endpoint(&["api", "admin", "login"]);
        let res = self
            .http
            .post(url)
            .json(&AdminLoginRequest { password })
            .send()
            .await
            .map_err(transport)?;

        let body = check_status(res)?
            .json::<AdminLoginResponse>()
            .await
            .map_err(decode)?;
        Ok(AdminGrant {
            token: body.token,
            expires_at: body.expires_at,
        })
    }

    async fn admin_logout(&self, bearer: &str) -> Result<(), RepositoryError> {
        let url = self.endpoint(&["api", "admin", "logout"]);
        let res = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(transport)?;

        check_status(res).map(|_| ())
    }

    async fn list_guests(&self, bearer: &str) -> Result<Vec<GuestRecord>, RepositoryError> {
        let url = self.endpoint(&["api", "admin", "invitados"]);
        let res = self
            .http
            .get(url)
            .bearer_auth(bearer)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        check_status(res)?
            .json::<Vec<GuestRecord>>()
            .await
            .map_err(decode)
    }
}
