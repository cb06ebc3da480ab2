use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login never echoes a credential: tokens only travel in cookies.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct LoginResponse {
    pub message: String,
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct SignupResponse {
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct RefreshResponse {
    pub success: bool,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct CheckResponse {
    pub authenticated: bool,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct ProfileResponse {
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
