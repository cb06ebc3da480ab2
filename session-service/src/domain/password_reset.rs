use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
pub struct PasswordResetRequestBody {
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PasswordResetBody {
    pub token: String,
    #[serde(
        rename(serialize = "newPassword", deserialize = "newPassword"),
        alias = "new_password"
    )]
    pub new_password: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct PasswordResetResponse {
    pub message: String,
}
