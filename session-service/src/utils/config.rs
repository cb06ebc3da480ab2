use std::collections::HashSet;
use std::env;

use axum_extra::extract::cookie::SameSite;
use base64::engine::general_purpose::{STANDARD as B64_STD, URL_SAFE_NO_PAD as B64_URL};
use base64::Engine;
use dotenvy::dotenv;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::JwtKeyStore;

pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 14 * 24 * 60 * 60;
pub const DEFAULT_RESET_TOKEN_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_LEEWAY_SECONDS: u64 = 30;
const MIN_SECRET_LEN: usize = 32;
const PROGRAMMATIC_KID: &str = "primary";

#[derive(Clone)]
pub struct Config {
    address: String,
    issuer: String,
    audience: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    leeway_seconds: u64,
    refresh_hash_key_32: [u8; 32],
    access_keys: Vec<(String, Vec<u8>)>, // (kid, secret)
    access_active_kid: String,
    refresh_keys: Vec<(String, Vec<u8>)>,
    refresh_active_kid: String,
    access_cookie_name: String,
    refresh_cookie_name: String,
    refresh_cookie_path: String,
    cookie_secure: bool,
    cookie_same_site: SameSite,
    reset_token_ttl_seconds: i64,
    frontend_url: String,
    allowed_origins: Vec<String>,
    redis_host: Option<String>,
    log_format: String,
}

impl Config {
    pub fn address(&self) -> &str {
        &self.address
    }
    pub fn jwt_issuer(&self) -> &str {
        &self.issuer
    }
    pub fn jwt_audience(&self) -> &str {
        &self.audience
    }
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }
    pub fn leeway_seconds(&self) -> u64 {
        self.leeway_seconds
    }
    pub fn refresh_hash_key(&self) -> &[u8; 32] {
        &self.refresh_hash_key_32
    }
    pub fn access_keys(&self) -> &[(String, Vec<u8>)] {
        &self.access_keys
    }
    pub fn access_active_kid(&self) -> &str {
        &self.access_active_kid
    }
    pub fn refresh_keys(&self) -> &[(String, Vec<u8>)] {
        &self.refresh_keys
    }
    pub fn refresh_active_kid(&self) -> &str {
        &self.refresh_active_kid
    }
    pub fn access_cookie_name(&self) -> &str {
        &self.access_cookie_name
    }
    pub fn refresh_cookie_name(&self) -> &str {
        &self.refresh_cookie_name
    }
    pub fn refresh_cookie_path(&self) -> &str {
        &self.refresh_cookie_path
    }
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
    pub fn cookie_same_site(&self) -> SameSite {
        self.cookie_same_site
    }
    pub fn reset_token_ttl_seconds(&self) -> i64 {
        self.reset_token_ttl_seconds
    }
    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }
    /// The frontend plus any extra origins, deduplicated.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(self.frontend_url.clone())
            .chain(self.allowed_origins.iter().cloned())
            .filter(|o| seen.insert(o.clone()))
            .collect()
    }
    pub fn redis_host(&self) -> Option<&str> {
        self.redis_host.as_deref()
    }
    pub fn log_format(&self) -> &str {
        &self.log_format
    }

    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env in dev; no-op in prod if not present.
        let _ = dotenv();

        let refresh_hash_key_b64 = req_var("REFRESH_HASH_KEY_B64")?;
        let refresh_hash_key_vec = decode_b64_any(&refresh_hash_key_b64)
            .map_err(|_| ConfigError::Decode("REFRESH_HASH_KEY_B64"))?;
        let refresh_hash_key_32: [u8; 32] = refresh_hash_key_vec
            .try_into()
            .map_err(|_| ConfigError::WrongLen("REFRESH_HASH_KEY_B64 must decode to 32 bytes"))?;

        let config = Self {
            address: opt_var("APP_ADDRESS").unwrap_or_else(|| "0.0.0.0:5000".into()),
            issuer: opt_var("JWT_ISSUER").unwrap_or_else(|| "notes-session".into()),
            audience: opt_var("JWT_AUDIENCE").unwrap_or_else(|| "notes-web".into()),
            access_ttl_seconds: parse_or("ACCESS_TTL_SECONDS", DEFAULT_ACCESS_TTL_SECONDS)?,
            refresh_ttl_seconds: parse_or("REFRESH_TTL_SECONDS", DEFAULT_REFRESH_TTL_SECONDS)?,
            leeway_seconds: parse_or("JWT_LEEWAY_SECONDS", DEFAULT_LEEWAY_SECONDS)?,
            refresh_hash_key_32,
            access_keys: parse_hs256_keys_json("ACCESS_JWT_KEYS_JSON")?,
            access_active_kid: req_var("ACCESS_JWT_ACTIVE_KID")?,
            refresh_keys: parse_hs256_keys_json("REFRESH_JWT_KEYS_JSON")?,
            refresh_active_kid: req_var("REFRESH_JWT_ACTIVE_KID")?,
            access_cookie_name: opt_var("ACCESS_COOKIE_NAME")
                .unwrap_or_else(|| "accessToken".into()),
            refresh_cookie_name: opt_var("REFRESH_COOKIE_NAME")
                .unwrap_or_else(|| "refreshToken".into()),
            refresh_cookie_path: opt_var("REFRESH_COOKIE_PATH").unwrap_or_else(|| "/".into()),
            cookie_secure: parse_or("COOKIE_SECURE", true)?,
            cookie_same_site: match opt_var("COOKIE_SAME_SITE") {
                Some(v) => parse_same_site(&v)?,
                None => SameSite::Lax,
            },
            reset_token_ttl_seconds: parse_or(
                "RESET_TOKEN_TTL_SECONDS",
                DEFAULT_RESET_TOKEN_TTL_SECONDS,
            )?,
            frontend_url: opt_var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            allowed_origins: opt_var("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            redis_host: opt_var("REDIS_HOST").filter(|h| !h.is_empty()),
            log_format: opt_var("LOG_FORMAT").unwrap_or_else(|| "compact".into()),
        };

        config.validate()
    }

    /// Build a config in code with one signing key per credential kind and
    /// defaults everywhere else. Adjust with the `with_*` methods.
    pub fn with_secrets(
        access_secret: &[u8],
        refresh_secret: &[u8],
        refresh_hash_key: [u8; 32],
    ) -> Result<Self, ConfigError> {
        Self {
            address: "127.0.0.1:5000".into(),
            issuer: "notes-session".into(),
            audience: "notes-web".into(),
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
            refresh_hash_key_32: refresh_hash_key,
            access_keys: vec![(PROGRAMMATIC_KID.into(), access_secret.to_vec())],
            access_active_kid: PROGRAMMATIC_KID.into(),
            refresh_keys: vec![(PROGRAMMATIC_KID.into(), refresh_secret.to_vec())],
            refresh_active_kid: PROGRAMMATIC_KID.into(),
            access_cookie_name: "accessToken".into(),
            refresh_cookie_name: "refreshToken".into(),
            refresh_cookie_path: "/".into(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            reset_token_ttl_seconds: DEFAULT_RESET_TOKEN_TTL_SECONDS,
            frontend_url: "http://localhost:3000".into(),
            allowed_origins: Vec::new(),
            redis_host: None,
            log_format: "compact".into(),
        }
        .validate()
    }

    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Result<Self, ConfigError> {
        self.access_ttl_seconds = seconds;
        self.validate()
    }

    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Result<Self, ConfigError> {
        self.refresh_ttl_seconds = seconds;
        self.validate()
    }

    pub fn with_refresh_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_cookie_path = path.into();
        self
    }

    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self
    }

    /// `SameSite=None` is only accepted together with `Secure`.
    pub fn with_cookie_policy(mut self, secure: bool, same_site: SameSite) -> Result<Self, ConfigError> {
        self.cookie_secure = secure;
        self.cookie_same_site = same_site;
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.access_ttl_seconds <= 0 || self.refresh_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid("token TTLs must be positive"));
        }
        if self.access_ttl_seconds >= self.refresh_ttl_seconds {
            return Err(ConfigError::Invalid(
                "access TTL must be shorter than refresh TTL",
            ));
        }
        if self.cookie_same_site == SameSite::None && !self.cookie_secure {
            return Err(ConfigError::Invalid(
                "COOKIE_SAME_SITE=none requires COOKIE_SECURE=true",
            ));
        }

        for (_, secret) in self.access_keys.iter().chain(self.refresh_keys.iter()) {
            // Strongly recommend >= 32 bytes for HS256
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::WrongLen(
                    "HS256 secret must be at least 32 bytes",
                ));
            }
        }

        let access = JwtKeyStore::new(&self.access_keys, &self.access_active_kid).ok_or(
            ConfigError::Invalid("ACCESS_JWT_ACTIVE_KID not found in ACCESS_JWT_KEYS_JSON"),
        )?;
        let refresh = JwtKeyStore::new(&self.refresh_keys, &self.refresh_active_kid).ok_or(
            ConfigError::Invalid("REFRESH_JWT_ACTIVE_KID not found in REFRESH_JWT_KEYS_JSON"),
        )?;
        if access.shares_secret_with(&refresh) {
            return Err(ConfigError::Invalid(
                "access and refresh credentials must use independent secrets",
            ));
        }

        Ok(self)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing env var {0}")]
    Missing(&'static str),
    #[error("invalid env var {0}")]
    Invalid(&'static str),
    #[error("decode error in {0}")]
    Decode(&'static str),
    #[error("{0}")]
    WrongLen(&'static str),
}

fn req_var(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn opt_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match opt_var(key) {
        Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_same_site(value: &str) -> Result<SameSite, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" => Ok(SameSite::None),
        _ => Err(ConfigError::Invalid("COOKIE_SAME_SITE")),
    }
}

fn decode_b64_any(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // Try URL-safe (no padding) first, then standard.
    B64_URL.decode(s).or_else(|_| B64_STD.decode(s))
}

#[derive(Deserialize)]
struct HsKey {
    kid: String,
    secret_b64: String,
}

fn parse_hs256_keys_json(key_name: &'static str) -> Result<Vec<(String, Vec<u8>)>, ConfigError> {
    let raw = req_var(key_name)?;
    let parsed: Vec<HsKey> =
        serde_json::from_str(&raw).map_err(|_| ConfigError::Invalid(key_name))?;
    if parsed.is_empty() {
        return Err(ConfigError::Invalid(key_name));
    }

    let mut out = Vec::with_capacity(parsed.len());
    let mut seen = HashSet::new();
    for k in parsed {
        if !seen.insert(k.kid.clone()) {
            return Err(ConfigError::Invalid("duplicate kid in keys JSON"));
        }
        let secret = decode_b64_any(&k.secret_b64).map_err(|_| ConfigError::Decode(key_name))?;
        out.push((k.kid, secret));
    }
    Ok(out)
}
