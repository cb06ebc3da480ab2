use std::{error::Error, future::Future, pin::Pin};

use app_state::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use axum_server::from_tcp;
use routes::{check, login, logout, password_reset, profile, refresh, signup};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod app_state;
pub mod client;
pub mod domain;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;
pub mod validation;

type ServerFuture = Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>;

pub fn app_router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/check", get(check::check))
        .route("/users/profile", get(profile::profile))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_access,
        ));

    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route("/refresh", post(refresh::refresh))
        .route("/logout", post(logout::logout))
        .route(
            "/password-reset-request",
            post(password_reset::password_reset_request),
        )
        .route("/password-reset", post(password_reset::password_reset))
        .merge(protected)
        .layer(cors_layer(&app_state.config.allowed_origins()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

// Credentialed CORS needs explicit origins; a wildcard is not allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(%origin, "ignoring unparsable CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

// This struct encapsulates our application-related logic.
pub struct Application {
    http_future: ServerFuture,
    // address is exposed as a public field,
    // so we have access to it in tests.
    pub address: String,
}

impl Application {
    /// Bind `address` (port 0 picks an ephemeral port) and prepare the server.
    pub async fn build(app_state: AppState, address: &str) -> Result<Self, Box<dyn Error>> {
        let router = app_router(app_state);

        let listener = std::net::TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let http_future = from_tcp(listener).serve(router.into_make_service());

        Ok(Self {
            http_future: Box::pin(http_future),
            address: format!("http://{}", local_addr),
        })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!(address = %self.address, "listening");
        self.http_future.await
    }
}
