use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordResetError {
    #[error("invalid or expired reset token")]
    InvalidToken,

    #[error("{0}")]
    InvalidPassword(String),

    #[error("Something went wrong, please try again later.")]
    InternalServerError,
}

impl IntoResponse for PasswordResetError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            PasswordResetError::InvalidToken => StatusCode::BAD_REQUEST,
            PasswordResetError::InvalidPassword(_) => StatusCode::BAD_REQUEST,
            PasswordResetError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
