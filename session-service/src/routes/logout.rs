use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;

use crate::app_state::AppState;
use crate::domain::LogoutResponse;
use crate::services::AuthService;
use crate::utils::cookie_helpers::{clear_access_cookie, clear_refresh_cookie};

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let presented = jar
        .get(state.config.refresh_cookie_name())
        .map(|c| c.value().to_owned());

    AuthService::logout(&state, presented.as_deref()).await;

    let jar = jar
        .add(clear_access_cookie(&state.config))
        .add(clear_refresh_cookie(&state.config));

    (
        jar,
        (
            StatusCode::OK,
            Json(LogoutResponse {
                message: "Logged out successfully".to_string(),
            }),
        ),
    )
}
