use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignupError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("{0}")]
    InvalidPassword(String),

    #[error("User with email {0} already exists.")]
    UserAlreadyExists(String),

    #[error("Something went wrong, please try again later.")]
    InternalServerError,
}

impl IntoResponse for SignupError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            SignupError::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
            SignupError::InvalidPassword(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SignupError::UserAlreadyExists(_) => StatusCode::BAD_REQUEST,
            SignupError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
