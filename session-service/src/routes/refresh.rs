use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::CookieJar;

use crate::app_state::AppState;
use crate::domain::RefreshResponse;
use crate::errors::RefreshError;
use crate::services::AuthService;
use crate::utils::cookie_helpers::{access_cookie, refresh_cookie};

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, impl IntoResponse), RefreshError> {
    let presented = jar
        .get(state.config.refresh_cookie_name())
        .map(|c| c.value().to_owned());

    let issued = AuthService::refresh(&state, presented.as_deref()).await?;

    let jar = jar
        .add(access_cookie(&issued.access_token, &state.config))
        .add(refresh_cookie(&issued.refresh_token, &state.config));

    Ok((jar, (StatusCode::OK, Json(RefreshResponse { success: true }))))
}
