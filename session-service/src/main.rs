use std::sync::Arc;

use session_service::app_state::{AppState, SessionStoreType};
use session_service::services::{
    HashmapAccountStore, HashmapSessionStore, MockEmailClient, RedisService, RedisSessionStore,
    TokenService,
};
use session_service::telemetry::init_tracing;
use session_service::utils::Config;
use session_service::Application;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(Config::from_env()?);
    init_tracing(config.log_format());

    let token_service = Arc::new(TokenService::new(config.clone())?);

    let session_store: SessionStoreType = match config.redis_host() {
        Some(host) => {
            tracing::info!(%host, "using redis session store");
            let redis = Arc::new(RedisService::new(host)?);
            Arc::new(RwLock::new(RedisSessionStore::new(redis)))
        }
        None => {
            tracing::info!("using in-memory session store");
            Arc::new(RwLock::new(HashmapSessionStore::new()))
        }
    };

    let app_state = AppState::new(
        Arc::new(RwLock::new(HashmapAccountStore::new())),
        session_store,
        token_service,
        Arc::new(MockEmailClient),
        config.clone(),
    );

    let app = Application::build(app_state, config.address()).await?;
    app.run().await?;
    Ok(())
}
