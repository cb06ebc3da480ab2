use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{AccountStore, EmailClient, SessionStore};
use crate::services::TokenService;
use crate::utils::Config;

// Using type aliases to improve readability!
pub type AccountStoreType = Arc<RwLock<dyn AccountStore>>;
pub type SessionStoreType = Arc<RwLock<dyn SessionStore>>;
pub type EmailClientType = Arc<dyn EmailClient>;

#[derive(Clone)]
pub struct AppState {
    pub account_store: AccountStoreType,
    pub session_store: SessionStoreType,
    pub token_service: Arc<TokenService>,
    pub email_client: EmailClientType,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        account_store: AccountStoreType,
        session_store: SessionStoreType,
        token_service: Arc<TokenService>,
        email_client: EmailClientType,
        config: Arc<Config>,
    ) -> Self {
        Self {
            account_store,
            session_store,
            token_service,
            email_client,
            config,
        }
    }
}
