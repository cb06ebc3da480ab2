use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::domain::{Account, AccountStoreError, Email, IssuedTokens, Password, ResetTicket};
use crate::errors::{LoginError, PasswordResetError, RefreshError, SignupError};
use crate::services::password_hashing::{hash_password, verify_password};

/// Orchestrates the credential issuer, the account store and the session
/// store for each protocol operation. Route handlers only add cookie
/// transport on top.
pub struct AuthService;

impl AuthService {
    pub async fn signup(
        state: &AppState,
        email: Email,
        password: Password,
    ) -> Result<Account, SignupError> {
        let hash = hash_password(password.as_ref()).await.map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            SignupError::InternalServerError
        })?;
        let account = Account::new(email.clone(), hash);

        state
            .account_store
            .write()
            .await
            .add_account(account.clone())
            .await
            .map_err(|e| match e {
                AccountStoreError::AccountAlreadyExists => {
                    SignupError::UserAlreadyExists(email.as_ref().to_string())
                }
                _ => SignupError::InternalServerError,
            })?;

        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    pub async fn login(
        state: &AppState,
        email: &str,
        password: &str,
    ) -> Result<(Account, IssuedTokens), LoginError> {
        let email = Email::parse(email.to_owned()).or(Err(LoginError::InvalidCredentials))?;

        let account = match state.account_store.read().await.get_by_email(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => return Err(LoginError::InvalidCredentials),
            Err(e) => {
                tracing::error!(error = %e, "account lookup failed");
                return Err(LoginError::InternalServerError);
            }
        };

        let verified = verify_password(password, &account.password_hash)
            .await
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "password verification failed");
                LoginError::InternalServerError
            })?;
        if !verified {
            tracing::debug!(account_id = %account.id, "login rejected");
            return Err(LoginError::InvalidCredentials);
        }

        let issued = state.token_service.issue_pair(&account).map_err(|e| {
            tracing::error!(account_id = %account.id, error = %e, "credential issuance failed");
            LoginError::InternalServerError
        })?;

        state
            .session_store
            .write()
            .await
            .commit(
                account.id,
                state.token_service.refresh_digest(&issued.refresh_token),
                issued.refresh_expires_at,
            )
            .await
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "session commit failed");
                LoginError::InternalServerError
            })?;

        tracing::info!(account_id = %account.id, "login succeeded");
        Ok((account, issued))
    }

    /// Rotate the presented refresh credential. Lookup and commit run under
    /// one write guard on the session store, so two concurrent rotations of
    /// the same value serialize and the second one misses.
    pub async fn refresh(
        state: &AppState,
        presented: Option<&str>,
    ) -> Result<IssuedTokens, RefreshError> {
        let presented = presented
            .filter(|v| !v.is_empty())
            .ok_or(RefreshError::InvalidSession)?;
        let digest = state.token_service.refresh_digest(presented);

        let mut sessions = state.session_store.write().await;

        let account_id = sessions
            .lookup(&digest)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                RefreshError::InternalServerError
            })?
            .ok_or_else(|| {
                tracing::debug!("refresh credential not current");
                RefreshError::InvalidSession
            })?;

        let claims = state
            .token_service
            .validate_refresh(presented)
            .map_err(|_| RefreshError::InvalidSession)?;
        if Uuid::parse_str(&claims.sub).ok() != Some(account_id) {
            tracing::warn!(%account_id, "refresh subject does not match session owner");
            return Err(RefreshError::InvalidSession);
        }

        let account = match state.account_store.read().await.get_by_id(account_id).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => return Err(RefreshError::InvalidSession),
            Err(e) => {
                tracing::error!(%account_id, error = %e, "account lookup failed");
                return Err(RefreshError::InternalServerError);
            }
        };

        let issued = state.token_service.issue_pair(&account).map_err(|e| {
            tracing::error!(%account_id, error = %e, "credential issuance failed");
            RefreshError::InternalServerError
        })?;

        sessions
            .commit(
                account_id,
                state.token_service.refresh_digest(&issued.refresh_token),
                issued.refresh_expires_at,
            )
            .await
            .map_err(|e| {
                tracing::error!(%account_id, error = %e, "session commit failed");
                RefreshError::InternalServerError
            })?;

        tracing::info!(%account_id, "session rotated");
        Ok(issued)
    }

    /// Never fails: a missing or stale credential is a no-op and store errors
    /// are only logged.
    pub async fn logout(state: &AppState, presented: Option<&str>) {
        let Some(presented) = presented.filter(|v| !v.is_empty()) else {
            return;
        };
        let digest = state.token_service.refresh_digest(presented);

        let mut sessions = state.session_store.write().await;
        match sessions.lookup(&digest).await {
            Ok(Some(account_id)) => {
                if let Err(e) = sessions.invalidate(account_id).await {
                    tracing::warn!(%account_id, error = %e, "session invalidation failed");
                } else {
                    tracing::info!(%account_id, "logged out");
                }
            }
            Ok(None) => tracing::debug!("logout without a current session"),
            Err(e) => tracing::warn!(error = %e, "session lookup failed during logout"),
        }
    }

    /// Unknown or malformed addresses succeed silently so the endpoint does
    /// not reveal which accounts exist.
    pub async fn request_password_reset(
        state: &AppState,
        email: &str,
    ) -> Result<(), PasswordResetError> {
        let Ok(email) = Email::parse(email.to_owned()) else {
            return Ok(());
        };

        let account = match state.account_store.read().await.get_by_email(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::AccountNotFound) => {
                tracing::debug!("password reset requested for unknown account");
                return Ok(());
            }
            Err(e) => {
                tracing::error!(error = %e, "account lookup failed");
                return Err(PasswordResetError::InternalServerError);
            }
        };

        let token = URL_SAFE_NO_PAD.encode(rand::random::<[u8; 32]>());
        let ticket = ResetTicket {
            digest: reset_digest(&token),
            expires_at: Utc::now() + Duration::seconds(state.config.reset_token_ttl_seconds()),
        };

        state
            .account_store
            .write()
            .await
            .set_reset_ticket(account.id, ticket)
            .await
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "storing reset ticket failed");
                PasswordResetError::InternalServerError
            })?;

        let link = format!(
            "{}/password-reset?token={}",
            state.config.frontend_url().trim_end_matches('/'),
            token
        );
        let content = format!(
            "A password reset was requested for your account. Use this link within {} minutes: {}",
            state.config.reset_token_ttl_seconds() / 60,
            link
        );

        state
            .email_client
            .send_email(&account.email, "Reset your password", &content)
            .await
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "reset email failed");
                PasswordResetError::InternalServerError
            })?;

        tracing::info!(account_id = %account.id, "password reset requested");
        Ok(())
    }

    /// Consumes the ticket, stores the new hash and ends the account's session.
    pub async fn reset_password(
        state: &AppState,
        token: &str,
        new_password: String,
    ) -> Result<(), PasswordResetError> {
        let password = Password::parse(new_password).map_err(PasswordResetError::InvalidPassword)?;
        let hash = hash_password(password.as_ref()).await.map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            PasswordResetError::InternalServerError
        })?;

        let account_id = {
            let mut accounts = state.account_store.write().await;
            let account = accounts
                .take_reset_ticket(&reset_digest(token), Utc::now())
                .await
                .map_err(|e| match e {
                    AccountStoreError::InvalidResetToken => PasswordResetError::InvalidToken,
                    _ => PasswordResetError::InternalServerError,
                })?;
            accounts
                .update_password(account.id, hash)
                .await
                .map_err(|_| PasswordResetError::InternalServerError)?;
            account.id
        };

        if let Err(e) = state.session_store.write().await.invalidate(account_id).await {
            tracing::error!(%account_id, error = %e, "session invalidation after reset failed");
            return Err(PasswordResetError::InternalServerError);
        }

        tracing::info!(%account_id, "password reset completed");
        Ok(())
    }
}

fn reset_digest(token: &str) -> [u8; 32] {
    *blake3::hash(token.as_bytes()).as_bytes()
}
