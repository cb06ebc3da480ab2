use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::routing::{any, get};
use axum_extra::extract::cookie::SameSite;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, Url};
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::sync::RwLock;
use uuid::Uuid;

use session_service::app_router;
use session_service::middleware::require_access;
use session_service::app_state::{AccountStoreType, AppState, SessionStoreType};
use session_service::client::{
    Gateway, GatewayConfig, GatewayError, RefreshCoordinator, SessionObserver,
};
use session_service::domain::{
    Account, Email, EmailClient, EmailClientError, LoginRequestBody, PasswordResetBody,
    PasswordResetRequestBody, SignupRequestBody,
};
use session_service::services::{HashmapAccountStore, HashmapSessionStore, TokenService};
use session_service::utils::Config;

pub const PASSWORD: &str = "Password123!";

/// Keeps every message so tests can read the reset link back.
#[derive(Default)]
pub struct RecordingEmailClient {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingEmailClient {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn last_content(&self) -> Option<String> {
        self.sent.lock().last().map(|(_, _, content)| content.clone())
    }

    pub fn last_reset_token(&self) -> Option<String> {
        self.last_content()
            .and_then(|content| content.split("token=").nth(1).map(|t| t.trim().to_owned()))
    }
}

#[async_trait::async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        self.sent.lock().push((
            recipient.as_ref().to_owned(),
            subject.to_owned(),
            content.to_owned(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    notifications: AtomicUsize,
    last: Mutex<Option<String>>,
}

impl RecordingObserver {
    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<String> {
        self.last.lock().clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn session_expired(&self, error: &GatewayError) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some(error.to_string());
    }
}

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub cookie_jar: Arc<Jar>,
    pub account_store: AccountStoreType,
    pub session_store: SessionStoreType,
    pub token_service: Arc<TokenService>,
    pub email_client: Arc<RecordingEmailClient>,
    pub config: Arc<Config>,
    // POST /refresh calls seen by the server
    pub refresh_calls: Arc<AtomicUsize>,
}

// Guarded test route that reports what it received.
async fn echo(method: Method, headers: HeaderMap, body: String) -> String {
    let note = headers
        .get("x-note")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    format!("{method} {note} {body}")
}

pub fn test_config() -> Config {
    Config::with_secrets(&[11u8; 32], &[22u8; 32], [33u8; 32])
        .and_then(|c| c.with_cookie_policy(false, SameSite::Lax))
        .expect("test config should be valid")
        .with_frontend_url("http://notes.test")
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let config = Arc::new(config);
        let account_store: AccountStoreType = Arc::new(RwLock::new(HashmapAccountStore::new()));
        let session_store: SessionStoreType = Arc::new(RwLock::new(HashmapSessionStore::new()));
        let token_service =
            Arc::new(TokenService::new(config.clone()).expect("token service should build"));
        let email_client = Arc::new(RecordingEmailClient::default());

        let app_state = AppState::new(
            account_store.clone(),
            session_store.clone(),
            token_service.clone(),
            email_client.clone(),
            config.clone(),
        );

        let refresh_calls = Arc::new(AtomicUsize::new(0));
        let counter = refresh_calls.clone();
        let echo_guard = from_fn_with_state(app_state.clone(), require_access);
        let router = app_router(app_state)
            .route(
                "/always-unauthorized",
                get(|| async { StatusCode::UNAUTHORIZED }),
            )
            .route("/echo", any(echo).route_layer(echo_guard))
            .layer(from_fn(move |request: Request, next: Next| {
                let counter = counter.clone();
                async move {
                    if request.uri().path() == "/refresh" {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    next.run(request).await
                }
            }));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed binding to an ephemeral port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Test server error: {}", e);
            }
        });

        let cookie_jar = Arc::new(Jar::default());
        let http_client = Client::builder()
            .cookie_provider(cookie_jar.clone())
            .build()
            .unwrap();

        TestApp {
            address,
            http_client,
            cookie_jar,
            account_store,
            session_store,
            token_service,
            email_client,
            config,
            refresh_calls,
        }
    }

    pub fn url(&self) -> Url {
        Url::parse(&self.address).unwrap()
    }

    pub fn refresh_call_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Response {
        let body = SignupRequestBody {
            email: email.to_owned(),
            password: password.to_owned(),
        };

        self.http_client
            .post(format!("{}/signup", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute signup request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        let body = LoginRequestBody {
            email: email.to_owned(),
            password: password.to_owned(),
        };

        self.http_client
            .post(format!("{}/login", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute login request.")
    }

    pub async fn login_with_body(&self, body: &serde_json::Value) -> Response {
        self.http_client
            .post(format!("{}/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute login request.")
    }

    /// Sign up a fresh account and log in with it. Returns the email.
    pub async fn signup_and_login(&self) -> String {
        let email = get_random_email();
        assert_eq!(self.signup(&email, PASSWORD).await.status().as_u16(), 201);
        assert_eq!(self.login(&email, PASSWORD).await.status().as_u16(), 200);
        email
    }

    pub async fn refresh(&self) -> Response {
        self.http_client
            .post(format!("{}/refresh", &self.address))
            .send()
            .await
            .expect("Failed to execute refresh request.")
    }

    /// POST /refresh with exactly this refresh cookie and nothing else,
    /// bypassing the shared jar.
    pub async fn refresh_with(&self, refresh_token: &str) -> Response {
        Client::new()
            .post(format!("{}/refresh", &self.address))
            .header(
                "Cookie",
                format!("{}={}", self.config.refresh_cookie_name(), refresh_token),
            )
            .send()
            .await
            .expect("Failed to execute refresh request.")
    }

    pub async fn logout(&self) -> Response {
        self.http_client
            .post(format!("{}/logout", &self.address))
            .send()
            .await
            .expect("Failed to execute logout request.")
    }

    pub async fn check(&self) -> Response {
        self.http_client
            .get(format!("{}/check", &self.address))
            .send()
            .await
            .expect("Failed to execute check request.")
    }

    pub async fn profile(&self) -> Response {
        self.http_client
            .get(format!("{}/users/profile", &self.address))
            .send()
            .await
            .expect("Failed to execute profile request.")
    }

    pub async fn password_reset_request(&self, email: &str) -> Response {
        let body = PasswordResetRequestBody {
            email: email.to_owned(),
        };

        self.http_client
            .post(format!("{}/password-reset-request", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute password reset request.")
    }

    pub async fn password_reset(&self, token: &str, new_password: &str) -> Response {
        let body = PasswordResetBody {
            token: token.to_owned(),
            new_password: new_password.to_owned(),
        };

        self.http_client
            .post(format!("{}/password-reset", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute password reset.")
    }

    /// Current value of a cookie in the shared jar.
    pub fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(&self.cookie_jar, &self.url(), name)
    }

    pub async fn account(&self, email: &str) -> Account {
        let email = Email::parse(email.to_owned()).unwrap();
        self.account_store
            .read()
            .await
            .get_by_email(&email)
            .await
            .expect("account should exist")
    }

    /// Put an already-expired access credential for `email` into `jar`,
    /// as if the access TTL had elapsed.
    pub async fn expire_access_in(&self, jar: &Jar, email: &str) {
        let account = self.account(email).await;
        let expired = self
            .token_service
            .issue_access_until(&account, Utc::now() - Duration::hours(1))
            .unwrap();
        jar.add_cookie_str(
            &format!("{}={}; Path=/", self.config.access_cookie_name(), expired),
            &self.url(),
        );
    }

    pub async fn expire_access(&self, email: &str) {
        self.expire_access_in(&self.cookie_jar, email).await;
    }

    pub fn gateway(&self, observer: Arc<RecordingObserver>) -> Gateway {
        let config = GatewayConfig::new(&self.address).unwrap();
        let coordinator = Arc::new(RefreshCoordinator::new(config.refresh_timeout));
        Gateway::new(config, coordinator, observer).unwrap()
    }
}

pub fn cookie_value(jar: &Jar, url: &Url, name: &str) -> Option<String> {
    let header = jar.cookies(url)?;
    let header = header.to_str().ok()?.to_owned();
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

pub fn get_random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

pub struct TestContext {
    pub test_app: TestApp,
}

impl AsyncTestContext for TestContext {
    async fn setup() -> Self {
        TestContext {
            test_app: TestApp::new().await,
        }
    }
}
