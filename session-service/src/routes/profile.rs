use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::app_state::AppState;
use crate::domain::{AccountStoreError, Principal, ProfileResponse};
use crate::errors::ProfileError;

pub async fn profile(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse, ProfileError> {
    let account = state
        .account_store
        .read()
        .await
        .get_by_id(principal.account_id)
        .await
        .map_err(|e| match e {
            AccountStoreError::AccountNotFound => ProfileError::NotFound,
            _ => ProfileError::InternalServerError,
        })?;

    Ok((
        StatusCode::OK,
        Json(ProfileResponse {
            email: account.email.as_ref().to_string(),
            created_at: account.created_at,
        }),
    ))
}
