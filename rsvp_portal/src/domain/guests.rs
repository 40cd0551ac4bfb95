use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// The serialization within this layer is a dependency leak, but its a pragmatic approach.

/// Lookup payload as returned by `GET /api/invitados/{token}`. Every field is
/// optional so the flow can reject incomplete responses itself.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GuestPayload {
    pub id: Option<i64>,
    pub token: Option<String>,
    pub nombre: Option<String>,
    pub max_boletos: Option<i64>,
    pub telefono: Option<String>,
    pub boletos: Option<i64>,
    pub comida: Option<String>,
    pub comentarios: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlusOneRecord {
    pub id: i64,
    pub confirmation_id: i64,
    pub name: String,
    pub dietary_restrictions: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    pub id: i64,
    pub guest_id: i64,
    pub attending: bool,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub plus_ones: Vec<PlusOneRecord>,
}

/// Guest row from the admin listing, with nested confirmations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: i64,
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub max_tickets: i64,
    pub tickets_confirmed: Option<i64>,
    pub meal: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub confirmations: Vec<ConfirmationRecord>,
}

impl GuestRecord {
    /// The confirmation that counts for reporting: the most recently created
    /// one, with the higher id winning a timestamp tie. Fetch order is
    /// irrelevant.
    pub fn latest_confirmation(&self) -> Option<&ConfirmationRecord> {
        self.confirmations
            .iter()
            .max_by_key(|confirmation| (confirmation.created_at, confirmation.id))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlusOneDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "restricciones")]
    pub dietary_restrictions: Option<String>,
}

// RSVP form as sent to `/api/invitados/{token}/confirmacion`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfirmationDraft {
    #[serde(rename = "asiste")]
    pub attending: bool,
    #[serde(rename = "restricciones")]
    pub dietary_restrictions: Option<String>,
    #[serde(rename = "solicitudes")]
    pub special_requests: Option<String>,
    #[serde(rename = "acompanantes")]
    pub plus_ones: Vec<PlusOneDraft>,
}

// Admin bearer grant, persisted under `admin_authenticated`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdminGrant {
    pub token: String,
    pub expires_at: u64,
}
