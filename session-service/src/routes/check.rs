use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::domain::{CheckResponse, Principal};

// The route guard has already rejected anything that is not authenticated.
pub async fn check(principal: Principal) -> impl IntoResponse {
    tracing::trace!(account_id = %principal.account_id, "session check");
    (StatusCode::OK, Json(CheckResponse { authenticated: true }))
}
