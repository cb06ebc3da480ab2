/// Credential issuance and verification.
///
/// `TokenService` mints two kinds of HS256 JWT:
/// - access credentials: short-lived, carry `{sub, email}`, verified by
///   signature + expiry only (the route guard never touches storage)
/// - refresh credentials: long-lived, carry `{sub}`, additionally checked by
///   the caller against the digest held in the `SessionStore`
///
/// Each kind is signed with its own `JwtKeyStore`, so a leaked access key
/// cannot forge a refresh credential and vice versa. Lifetimes, issuer,
/// audience and leeway come from `Config`; nothing here is request-supplied.
///
/// Every credential carries a fresh `jti`, so two credentials minted for the
/// same account within the same second still differ. Rotation relies on that.
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::data_stores::JwtKeyStore;
use crate::domain::{hash_refresh, AccessClaims, Account, IssuedTokens, RefreshClaims, RefreshDigest};
use crate::utils::config::Config;

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("cannot issue a credential without an account id")]
    MissingIdentity,
    #[error("credential expiry is out of range")]
    ExpiryOutOfRange,
    #[error("signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("signing keys are not configured")]
    KeysUnavailable,
}

#[derive(Debug, PartialEq)]
pub enum AccessError {
    InvalidToken,
    BadKey,
}

#[derive(Clone)]
pub struct TokenService {
    cfg: Arc<Config>,
    access_keys: Arc<JwtKeyStore>,
    refresh_keys: Arc<JwtKeyStore>,
}

impl TokenService {
    pub fn new(cfg: Arc<Config>) -> Result<Self, IssuanceError> {
        let access_keys = JwtKeyStore::new(cfg.access_keys(), cfg.access_active_kid())
            .ok_or(IssuanceError::KeysUnavailable)?;
        let refresh_keys = JwtKeyStore::new(cfg.refresh_keys(), cfg.refresh_active_kid())
            .ok_or(IssuanceError::KeysUnavailable)?;

        Ok(Self {
            cfg,
            access_keys: Arc::new(access_keys),
            refresh_keys: Arc::new(refresh_keys),
        })
    }

    pub fn issue_access(&self, account: &Account) -> Result<String, IssuanceError> {
        let expires_at = Utc::now() + Duration::seconds(self.cfg.access_ttl_seconds());
        self.issue_access_until(account, expires_at)
    }

    /// Mint an access credential with an explicit expiry.
    pub fn issue_access_until(
        &self,
        account: &Account,
        expires_at: DateTime<Utc>,
    ) -> Result<String, IssuanceError> {
        let sub = subject(account)?;
        let claims = AccessClaims {
            sub,
            email: account.email.as_ref().to_owned(),
            iss: self.cfg.jwt_issuer().to_owned(),
            aud: self.cfg.jwt_audience().to_owned(),
            exp: timestamp(expires_at)?,
            iat: timestamp(Utc::now())?,
            jti: Uuid::new_v4().to_string(),
        };

        sign(&claims, &self.access_keys)
    }

    pub fn issue_refresh(&self, account: &Account) -> Result<String, IssuanceError> {
        let expires_at = Utc::now() + Duration::seconds(self.cfg.refresh_ttl_seconds());
        self.issue_refresh_until(account, expires_at)
    }

    fn issue_refresh_until(
        &self,
        account: &Account,
        expires_at: DateTime<Utc>,
    ) -> Result<String, IssuanceError> {
        let sub = subject(account)?;
        let claims = RefreshClaims {
            sub,
            iss: self.cfg.jwt_issuer().to_owned(),
            aud: self.cfg.jwt_audience().to_owned(),
            exp: timestamp(expires_at)?,
            iat: timestamp(Utc::now())?,
            jti: Uuid::new_v4().to_string(),
        };

        sign(&claims, &self.refresh_keys)
    }

    /// Mint a fresh access + refresh pair. Nothing is persisted here; the
    /// caller commits the refresh digest before handing out any cookie.
    pub fn issue_pair(&self, account: &Account) -> Result<IssuedTokens, IssuanceError> {
        let refresh_expires_at = Utc::now() + Duration::seconds(self.cfg.refresh_ttl_seconds());
        let access_token = self.issue_access(account)?;
        let refresh_token = self.issue_refresh_until(account, refresh_expires_at)?;

        Ok(IssuedTokens {
            account_id: account.id,
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Validate an access credential: key by `kid`, signature, issuer,
    /// audience, and `exp` (with the configured leeway).
    pub fn validate_access(&self, token: &str) -> Result<AccessClaims, AccessError> {
        self.verify(token, &self.access_keys)
    }

    /// Signature and expiry only. Whether this is still the account's current
    /// refresh credential is a `SessionStore` question.
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, AccessError> {
        self.verify(token, &self.refresh_keys)
    }

    pub fn refresh_digest(&self, token: &str) -> RefreshDigest {
        hash_refresh(self.cfg.refresh_hash_key(), token)
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, keys: &JwtKeyStore) -> Result<T, AccessError> {
        let header = decode_header(token).map_err(|_| AccessError::InvalidToken)?;

        let key = keys
            .decoding_key_for_kid(header.kid.as_deref())
            .ok_or(AccessError::BadKey)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.cfg.jwt_issuer()]);
        validation.set_audience(&[self.cfg.jwt_audience()]);
        validation.leeway = self.cfg.leeway_seconds();

        decode::<T>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AccessError::InvalidToken)
    }
}

fn subject(account: &Account) -> Result<String, IssuanceError> {
    if account.id.is_nil() {
        return Err(IssuanceError::MissingIdentity);
    }
    Ok(account.id.to_string())
}

fn timestamp(at: DateTime<Utc>) -> Result<usize, IssuanceError> {
    at.timestamp()
        .try_into()
        .map_err(|_| IssuanceError::ExpiryOutOfRange)
}

fn sign<T: serde::Serialize>(claims: &T, keys: &JwtKeyStore) -> Result<String, IssuanceError> {
    let (enc_key, kid) = keys.encoding_key_and_kid();
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());

    Ok(encode(&header, claims, &enc_key)?)
}
