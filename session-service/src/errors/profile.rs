use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("account not found")]
    NotFound,

    #[error("Something went wrong, please try again later.")]
    InternalServerError,
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ProfileError::NotFound => StatusCode::NOT_FOUND,
            ProfileError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
