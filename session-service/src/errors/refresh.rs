use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

/// Absent, unknown, replayed, forged and expired refresh credentials all
/// collapse into `InvalidSession`.
#[derive(Error, Debug, PartialEq)]
pub enum RefreshError {
    #[error("invalid or expired session")]
    InvalidSession,

    #[error("Something went wrong, please try again later.")]
    InternalServerError,
}

impl IntoResponse for RefreshError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RefreshError::InvalidSession => StatusCode::UNAUTHORIZED,
            RefreshError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
