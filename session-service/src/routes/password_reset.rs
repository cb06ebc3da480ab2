use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::app_state::AppState;
use crate::domain::{PasswordResetBody, PasswordResetRequestBody, PasswordResetResponse};
use crate::errors::PasswordResetError;
use crate::services::AuthService;

pub async fn password_reset_request(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequestBody>,
) -> Result<impl IntoResponse, PasswordResetError> {
    AuthService::request_password_reset(&state, &request.email).await?;

    Ok((
        StatusCode::OK,
        Json(PasswordResetResponse {
            message: "If an account exists for that email, a reset link has been sent."
                .to_string(),
        }),
    ))
}

pub async fn password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetBody>,
) -> Result<impl IntoResponse, PasswordResetError> {
    AuthService::reset_password(&state, &request.token, request.new_password).await?;

    Ok((
        StatusCode::OK,
        Json(PasswordResetResponse {
            message: "Password has been reset.".to_string(),
        }),
    ))
}
