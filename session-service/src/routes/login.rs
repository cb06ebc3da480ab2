use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::CookieJar;

use crate::app_state::AppState;
use crate::domain::{LoginRequestBody, LoginResponse};
use crate::errors::LoginError;
use crate::services::AuthService;
use crate::utils::cookie_helpers::{access_cookie, refresh_cookie};

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<(CookieJar, impl IntoResponse), LoginError> {
    // A malformed or partial body is indistinguishable from bad credentials.
    let Json(request) = request.map_err(|_| LoginError::InvalidCredentials)?;
    let (account, issued) = AuthService::login(&state, &request.email, &request.password).await?;

    let jar = jar
        .add(access_cookie(&issued.access_token, &state.config))
        .add(refresh_cookie(&issued.refresh_token, &state.config));

    Ok((
        jar,
        (
            StatusCode::OK,
            Json(LoginResponse {
                message: "Logged in successfully".to_string(),
                email: account.email.as_ref().to_string(),
            }),
        ),
    ))
}
