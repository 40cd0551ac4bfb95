use serde::{Deserialize, Serialize};

// Length of the numeric access token printed on each invitation.
pub const TOKEN_LEN: usize = 8;

// True when the token is exactly eight ASCII digits.
pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_digit())
}

// Clamp a requested ticket count into `[1, maximum]`.
pub fn clamp_tickets(value: i64, maximum: u32) -> u32 {
    let maximum = maximum.max(1);
    // The clamp bounds fit in u32, so the cast cannot truncate.
    value.clamp(1, i64::from(maximum)) as u32
}

/// Meal options offered on the invitation. Order matters: the first one is
/// the default whenever no valid choice is known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    #[default]
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

    // Trims and lowercases before matching.
    pub fn parse(value: &str) -> Option<Meal> {
        let normalized = value.trim().to_lowercase();
        Meal::ALL
            .into_iter()
            .find(|meal| meal.as_str() == normalized)
    }
}

/// The guest identified on this device, plus their in-progress selections.
///
/// Serialized field names match the payload persisted under `inv:payload`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuestSession {
    pub id: i64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "nombre_completo")]
    pub full_name: String,
    #[serde(rename = "boletos_maximos")]
    pub max_tickets: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "mesa", default)]
    pub table: Option<String>,
    #[serde(rename = "confirmados", default)]
    pub confirmed_tickets: Option<i64>,
    #[serde(rename = "comida", default)]
    pub meal: Option<String>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
}

impl GuestSession {
    // Never below one, even if the record says otherwise.
    pub fn ticket_limit(&self) -> u32 {
        u32::try_from(self.max_tickets.max(1)).unwrap_or(u32::MAX)
    }
}
