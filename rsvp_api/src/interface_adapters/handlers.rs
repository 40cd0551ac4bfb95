use crate::domain::entities::{
    Confirmation, ConfirmationDraft, GuestWithConfirmations, PlusOneDraft,
};
use crate::domain::errors::RsvpError;
use crate::interface_adapters::protocol::{
    AdminLoginRequest, AdminLoginResponse, AdminLogoutResponse, CommentRequest, CommentResponse,
    ConfirmationRequest, ErrorResponse, GuestResponse, MealRequest, MealResponse, TicketsRequest,
    TicketsResponse,
};
use crate::interface_adapters::state::{AppState, InMemoryAdminSessionStore, SystemClock};
use crate::use_cases::admin_login::AdminLoginUseCase;
use crate::use_cases::admin_session::{AdminLogoutUseCase, VerifyAdminUseCase};
use crate::use_cases::choose_meal::ChooseMealUseCase;
use crate::use_cases::current_confirmation::CurrentConfirmationUseCase;
use crate::use_cases::leave_comment::LeaveCommentUseCase;
use crate::use_cases::list_guests::ListGuestsUseCase;
use crate::use_cases::lookup_guest::LookupGuestUseCase;
use crate::use_cases::request_tickets::RequestTicketsUseCase;
use crate::use_cases::submit_confirmation::SubmitConfirmationUseCase;
use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use tracing::{error, info, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

// Handler for resolving an invitation token.
#[tracing::instrument(name = "lookup_guest", skip_all)]
pub async fn lookup_guest(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<GuestResponse>, ApiError> {
    let use_case = LookupGuestUseCase {
        store: state.guests.clone(),
    };

    let guest = use_case
        .execute(&token)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Lookup))?;

    Ok(Json(GuestResponse::from(guest)))
}

// Handler for the ticket confirmation.
#[tracing::instrument(name = "request_tickets", skip_all, fields(requested = body.boletos_solicitados))]
pub async fn request_tickets(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<TicketsRequest>,
) -> Result<Json<TicketsResponse>, ApiError> {
    let use_case = RequestTicketsUseCase {
        store: state.guests.clone(),
    };

    let result = use_case
        .execute(&token, body.boletos_solicitados)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Tickets))?;

    info!(guest_id = result.guest_id, tickets = result.tickets, "tickets confirmed");

    Ok(Json(TicketsResponse {
        id: result.guest_id,
        boletos: result.tickets,
    }))
}

// Handler for the meal choice.
#[tracing::instrument(name = "choose_meal", skip_all)]
pub async fn choose_meal(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<MealRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    let use_case = ChooseMealUseCase {
        store: state.guests.clone(),
    };

    let result = use_case
        .execute(&token, &body.comida)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Meal))?;

    info!(guest_id = result.guest_id, meal = result.meal.as_str(), "meal saved");

    Ok(Json(MealResponse {
        id: result.guest_id,
        comida: result.meal.as_str().to_string(),
    }))
}

// Handler for guest comments.
#[tracing::instrument(name = "leave_comment", skip_all, fields(guest_id = body.invitado))]
pub async fn leave_comment(
    State(state): State<AppState>,
    Json(body): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let use_case = LeaveCommentUseCase {
        store: state.guests.clone(),
    };

    let guest_id = use_case
        .execute(body.invitado, &body.comentario)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Comment))?;

    Ok((StatusCode::CREATED, Json(CommentResponse { invitado: guest_id })))
}

// Handler for the full RSVP form.
#[tracing::instrument(name = "submit_confirmation", skip_all, fields(attending = body.asiste))]
pub async fn submit_confirmation(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<ConfirmationRequest>,
) -> Result<Json<Confirmation>, ApiError> {
    let draft = ConfirmationDraft {
        attending: body.asiste,
        dietary_restrictions: body.restricciones,
        special_requests: body.solicitudes,
        plus_ones: body
            .acompanantes
            .into_iter()
            .map(|plus_one| PlusOneDraft {
                name: plus_one.nombre,
                dietary_restrictions: plus_one.restricciones,
            })
            .collect(),
    };
    let use_case = SubmitConfirmationUseCase {
        store: state.guests.clone(),
    };

    let confirmation = use_case
        .execute(&token, draft)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Confirmation))?;

    info!(
        guest_id = confirmation.guest_id,
        plus_ones = confirmation.plus_ones.len(),
        "confirmation saved"
    );

    Ok(Json(confirmation))
}

// Handler for reading back the latest RSVP; `null` when the guest has not answered.
#[tracing::instrument(name = "current_confirmation", skip_all)]
pub async fn current_confirmation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Option<Confirmation>>, ApiError> {
    let use_case = CurrentConfirmationUseCase {
        store: state.guests.clone(),
    };

    let confirmation = use_case
        .execute(&token)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Confirmation))?;

    Ok(Json(confirmation))
}

// Handler for the admin password gate.
#[tracing::instrument(name = "admin_login", skip_all)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let use_case = AdminLoginUseCase {
        clock: SystemClock,
        store: InMemoryAdminSessionStore {
            sessions: state.admin_sessions.clone(),
        },
        ttl_seconds: state.admin.session_ttl_seconds,
        password_sha256: state.admin.password_sha256.clone(),
    };

    let grant = use_case.execute(&body.password).await.map_err(|err| {
        warn!("admin login rejected");
        map_rsvp_error(err, RsvpErrorContext::Admin)
    })?;

    Ok(Json(AdminLoginResponse {
        token: grant.token,
        expires_at: grant.expires_at,
    }))
}

// Handler for revoking an admin bearer token.
pub async fn admin_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdminLogoutResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let use_case = AdminLogoutUseCase {
        store: InMemoryAdminSessionStore {
            sessions: state.admin_sessions.clone(),
        },
    };

    let revoked = use_case
        .execute(token)
        .await
        .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Admin))?;

    Ok(Json(AdminLogoutResponse { revoked }))
}

// Handler for the admin guest listing.
#[tracing::instrument(name = "admin_guests", skip_all)]
pub async fn admin_guests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<GuestWithConfirmations>>, ApiError> {
    let token = bearer_token(&headers)?;
    VerifyAdminUseCase {
        clock: SystemClock,
        store: InMemoryAdminSessionStore {
            sessions: state.admin_sessions.clone(),
        },
    }
    .execute(token)
    .await
    .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Admin))?;

    let guests = ListGuestsUseCase {
        store: state.guests.clone(),
    }
    .execute()
    .await
    .map_err(|err| map_rsvp_error(err, RsvpErrorContext::Admin))?;

    Ok(Json(guests))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

// Maps domain errors to HTTP responses by endpoint context.
enum RsvpErrorContext {
    Lookup,
    Tickets,
    Meal,
    Comment,
    Confirmation,
    Admin,
}

fn map_rsvp_error(err: RsvpError, context: RsvpErrorContext) -> ApiError {
    match err {
        RsvpError::InvalidToken => error_response(StatusCode::BAD_REQUEST, "invalid token"),
        RsvpError::GuestNotFound => match context {
            RsvpErrorContext::Lookup => error_response(StatusCode::NOT_FOUND, "token not found"),
            _ => error_response(StatusCode::NOT_FOUND, "invitation not found"),
        },
        RsvpError::InvalidTicketCount => {
            error_response(StatusCode::BAD_REQUEST, "ticket count outside allowance")
        }
        RsvpError::InvalidMeal => error_response(StatusCode::BAD_REQUEST, "unknown meal option"),
        RsvpError::InvalidComment => {
            error_response(StatusCode::BAD_REQUEST, "comentario is required")
        }
        RsvpError::InvalidPlusOne => {
            error_response(StatusCode::BAD_REQUEST, "plus-one name is required")
        }
        RsvpError::TooManyPlusOnes => {
            error_response(StatusCode::BAD_REQUEST, "too many plus-ones")
        }
        RsvpError::InvalidPassword => error_response(StatusCode::UNAUTHORIZED, "invalid password"),
        RsvpError::InvalidSession => {
            error_response(StatusCode::UNAUTHORIZED, "invalid admin session")
        }
        RsvpError::SessionExpired => error_response(StatusCode::UNAUTHORIZED, "session expired"),
        RsvpError::StorageFailure => {
            let endpoint = match context {
                RsvpErrorContext::Lookup => "lookup",
                RsvpErrorContext::Tickets => "tickets",
                RsvpErrorContext::Meal => "meal",
                RsvpErrorContext::Comment => "comment",
                RsvpErrorContext::Confirmation => "confirmation",
                RsvpErrorContext::Admin => "admin",
            };
            error!(endpoint, "storage failure");
            error_response(StatusCode::BAD_GATEWAY, "storage error")
        }
    }
}
