use serde::{Deserialize, Serialize};

use crate::domain::entities::Guest;

// Guest payload returned by the token lookup.
#[derive(Debug, Serialize)]
pub struct GuestResponse {
    pub id: i64,
    pub token: String,
    pub nombre: String,
    pub max_boletos: i32,
    pub telefono: Option<String>,
    pub boletos: Option<i32>,
    pub comida: Option<String>,
    pub comentarios: Option<String>,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        GuestResponse {
            id: guest.id,
            nombre: guest.full_name(),
            token: guest.token,
            max_boletos: guest.max_tickets,
            telefono: guest.phone,
            boletos: guest.tickets_confirmed,
            comida: guest.meal.map(|meal| meal.as_str().to_string()),
            comentarios: guest.notes,
        }
    }
}

// Request payload for the ticket confirmation.
#[derive(Debug, Deserialize)]
pub struct TicketsRequest {
    pub boletos_solicitados: i64,
}

#[derive(Debug, Serialize)]
pub struct TicketsResponse {
    pub id: i64,
    pub boletos: i32,
}

// Request payload for the meal choice.
#[derive(Debug, Deserialize)]
pub struct MealRequest {
    pub comida: String,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: i64,
    pub comida: String,
}

// Request payload for a guest comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comentario: String,
    pub invitado: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub invitado: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlusOneRequest {
    pub nombre: String,
    #[serde(default)]
    pub restricciones: Option<String>,
}

// Request payload for the full RSVP form.
#[derive(Debug, Deserialize)]
pub struct ConfirmationRequest {
    pub asiste: bool,
    #[serde(default)]
    pub restricciones: Option<String>,
    #[serde(default)]
    pub solicitudes: Option<String>,
    #[serde(default)]
    pub acompanantes: Vec<PlusOneRequest>,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_at: u64,
}

#[derive(Debug, Serialize)]
pub struct AdminLogoutResponse {
    pub revoked: bool,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
