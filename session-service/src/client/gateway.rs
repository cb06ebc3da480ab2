//! Client-side request gateway.
//!
//! Every call from the UI goes through `Gateway::request`. A 401 hands
//! control to the shared `RefreshCoordinator`; after a successful refresh the
//! original request is replayed once with the same method, headers and body.
//! Anything else that ends the session tears down local state and tells the
//! `SessionObserver` (the UI's "go to login").
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use thiserror::Error;

use super::coordinator::{Epoch, RefreshCoordinator, RefreshOutcome};
use crate::domain::{LoginRequestBody, LoginResponse};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("session expired")]
    SessionExpired,
    #[error("network failure: {0}")]
    Network(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

fn network(e: reqwest::Error) -> GatewayError {
    GatewayError::Network(e.to_string())
}

/// Receives the terminal "session is gone" signal.
pub trait SessionObserver: Send + Sync {
    fn session_expired(&self, error: &GatewayError);
}

/// Observer that only logs. Useful for headless callers.
pub struct LogOnlyObserver;

impl SessionObserver for LogOnlyObserver {
    fn session_expired(&self, error: &GatewayError) {
        tracing::warn!(%error, "session ended");
    }
}

/// Non-secret session data cached on the client after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHint {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub refresh_path: String,
    pub login_path: String,
    pub logout_path: String,
    pub check_path: String,
    pub request_timeout: Duration,
    pub refresh_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        // relative endpoints are joined under the base path
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| GatewayError::InvalidEndpoint(format!("{base_url}: {e}")))?;

        Ok(Self {
            base_url,
            refresh_path: "refresh".into(),
            login_path: "login".into(),
            logout_path: "logout".into(),
            check_path: "check".into(),
            request_timeout: Duration::from_secs(30),
            refresh_timeout: Duration::from_secs(10),
        })
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// Return a 401 as-is instead of refreshing. Used by the session
    /// endpoints themselves.
    pub skip_refresh: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            skip_refresh: false,
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, GatewayError> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn skip_refresh(mut self) -> Self {
        self.skip_refresh = true;
        self
    }
}

pub struct Gateway {
    client: Client,
    jar: Arc<Jar>,
    config: GatewayConfig,
    coordinator: Arc<RefreshCoordinator>,
    observer: Arc<dyn SessionObserver>,
    hint: RwLock<Option<SessionHint>>,
    // highest epoch already reported to the observer
    torn_down: AtomicU64,
}

impl Gateway {
    /// The coordinator is injected so gateways can share it or stay isolated.
    pub fn new(
        config: GatewayConfig,
        coordinator: Arc<RefreshCoordinator>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, GatewayError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(network)?;

        Ok(Self {
            client,
            jar,
            config,
            coordinator,
            observer,
            hint: RwLock::new(None),
            torn_down: AtomicU64::new(0),
        })
    }

    /// Build a gateway with its own coordinator using the configured refresh timeout.
    pub fn standalone(
        config: GatewayConfig,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self, GatewayError> {
        let coordinator = Arc::new(RefreshCoordinator::new(config.refresh_timeout));
        Self::new(config, coordinator, observer)
    }

    pub fn cookie_jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    pub fn session_hint(&self) -> Option<SessionHint> {
        self.hint.read().clone()
    }

    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response, GatewayError> {
        let url = self.resolve(endpoint)?;
        let observed = self.coordinator.epoch();

        let response = self.send(&url, &options).await?;
        if response.status() != StatusCode::UNAUTHORIZED || options.skip_refresh {
            return Ok(response);
        }

        tracing::debug!(path = url.path(), "unauthorized, waiting for refresh");
        let settled = self
            .coordinator
            .refresh(observed, || self.perform_refresh())
            .await;

        match settled.outcome {
            RefreshOutcome::Refreshed => {
                let replay = self.send(&url, &options).await?;
                if replay.status() == StatusCode::UNAUTHORIZED {
                    let error = GatewayError::SessionExpired;
                    self.teardown(settled.epoch, &error);
                    return Err(error);
                }
                Ok(replay)
            }
            RefreshOutcome::Rejected => {
                let error = GatewayError::SessionExpired;
                self.teardown(settled.epoch, &error);
                Err(error)
            }
            RefreshOutcome::Failed(reason) => {
                let error = GatewayError::Network(reason);
                self.teardown(settled.epoch, &error);
                Err(error)
            }
        }
    }

    /// `Ok(None)` when the server rejects the credentials.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionHint>, GatewayError> {
        let body = LoginRequestBody {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let options = RequestOptions::new(Method::POST).json(&body)?.skip_refresh();
        let response = self.request(&self.config.login_path, options).await?;

        match response.status() {
            StatusCode::OK => {
                let body: LoginResponse = response.json().await.map_err(network)?;
                let hint = SessionHint { email: body.email };
                *self.hint.write() = Some(hint.clone());
                Ok(Some(hint))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(GatewayError::Network(format!("login returned {status}"))),
        }
    }

    pub async fn logout(&self) -> Result<(), GatewayError> {
        let options = RequestOptions::new(Method::POST).skip_refresh();
        let result = self.request(&self.config.logout_path, options).await;
        self.hint.write().take();

        let response = result?;
        if !response.status().is_success() {
            return Err(GatewayError::Network(format!(
                "logout returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Whether the current access credential is accepted. Does not refresh.
    pub async fn check(&self) -> Result<bool, GatewayError> {
        let options = RequestOptions::new(Method::GET).skip_refresh();
        let response = self.request(&self.config.check_path, options).await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            status => Err(GatewayError::Network(format!("check returned {status}"))),
        }
    }

    fn resolve(&self, endpoint: &str) -> Result<Url, GatewayError> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Url::parse(endpoint)
                .map_err(|e| GatewayError::InvalidEndpoint(format!("{endpoint}: {e}")));
        }
        self.config
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| GatewayError::InvalidEndpoint(format!("{endpoint}: {e}")))
    }

    async fn send(&self, url: &Url, options: &RequestOptions) -> Result<Response, GatewayError> {
        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(options.headers.clone());
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }
        request.send().await.map_err(network)
    }

    async fn perform_refresh(&self) -> RefreshOutcome {
        let url = match self.resolve(&self.config.refresh_path) {
            Ok(url) => url,
            Err(e) => return RefreshOutcome::Failed(e.to_string()),
        };

        match self.client.post(url).send().await {
            Ok(response) => match response.status() {
                StatusCode::OK => RefreshOutcome::Refreshed,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RefreshOutcome::Rejected,
                status => RefreshOutcome::Failed(format!("refresh returned {status}")),
            },
            Err(e) => RefreshOutcome::Failed(e.to_string()),
        }
    }

    // One observer notification per settled refresh, however many requests
    // were waiting on it. A late failure from an already reported refresh
    // leaves a newer login alone.
    fn teardown(&self, epoch: Epoch, error: &GatewayError) {
        if self.torn_down.fetch_max(epoch.0, Ordering::SeqCst) < epoch.0 {
            self.hint.write().take();
            tracing::info!(%error, "tearing down client session");
            self.observer.session_expired(error);
        }
    }
}
