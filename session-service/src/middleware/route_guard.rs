use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::domain::Principal;
use crate::errors::AuthError;
use crate::services::TokenService;

/// Guard for protected routes. Only the access cookie is inspected; the
/// session store is never consulted, so an access credential stays usable
/// until it expires even after logout.
pub async fn require_access(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(state.config.access_cookie_name())
        .map(|cookie| cookie.value());

    let principal = authenticate(&state.token_service, token).inspect_err(|e| {
        tracing::debug!(path = %request.uri().path(), reason = %e, "request rejected by route guard");
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub fn authenticate(
    token_service: &TokenService,
    token: Option<&str>,
) -> Result<Principal, AuthError> {
    let token = token.filter(|t| !t.is_empty()).ok_or(AuthError::Missing)?;
    let claims = token_service
        .validate_access(token)
        .map_err(|_| AuthError::Invalid)?;
    let account_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::Invalid)?;

    Ok(Principal {
        account_id,
        email: claims.email,
    })
}

/// Handlers behind `require_access` take the principal as an extractor.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::Missing)
    }
}
