use serde::{Deserialize, Serialize};

/// Payload minted at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String, // user UUID, hyphenated
    pub email: String,
    pub exp: i64, // expires at (unix timestamp)
}
