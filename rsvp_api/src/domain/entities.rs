use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Length of the numeric access token printed on each invitation.
pub const TOKEN_LEN: usize = 8;

// True when the token is exactly eight ASCII digits.
pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_digit())
}

// Meal options offered on the invitation, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Vegano,
    Salmon,
    Carne,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Vegano, Meal::Salmon, Meal::Carne];

    pub fn as_str(&self) -> &'static str {
        match self {
            Meal::Vegano => "vegano",
            Meal::Salmon => "salmon",
            Meal::Carne => "carne",
        }
    }

    // Accepts surrounding whitespace and any letter case.
    pub fn parse(value: &str) -> Option<Meal> {
        let normalized = value.trim().to_lowercase();
        Meal::ALL
            .into_iter()
            .find(|meal| meal.as_str() == normalized)
    }
}

// Guest record. Created out of band; only tickets, meal and notes change at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub max_tickets: i32,
    pub tickets_confirmed: Option<i32>,
    pub meal: Option<Meal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    // Every ticket beyond the guest's own seat can carry a plus-one.
    pub fn max_plus_ones(&self) -> usize {
        usize::try_from(self.max_tickets.saturating_sub(1)).unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlusOne {
    pub id: i64,
    pub confirmation_id: i64,
    pub name: String,
    pub dietary_restrictions: Option<String>,
}

// Attendance decision for a guest. Plus-ones are replaced wholesale on update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Confirmation {
    pub id: i64,
    pub guest_id: i64,
    pub attending: bool,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub plus_ones: Vec<PlusOne>,
}

// Guest joined with every confirmation it has, newest first.
#[derive(Clone, Debug, Serialize)]
pub struct GuestWithConfirmations {
    #[serde(flatten)]
    pub guest: Guest,
    pub confirmations: Vec<Confirmation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlusOneDraft {
    pub name: String,
    pub dietary_restrictions: Option<String>,
}

// Input for creating or updating a guest's confirmation.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmationDraft {
    pub attending: bool,
    pub dietary_restrictions: Option<String>,
    pub special_requests: Option<String>,
    pub plus_ones: Vec<PlusOneDraft>,
}

// Admin session held in memory behind an opaque bearer token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminSession {
    pub expires_at: u64,
}
