pub mod auth;
pub mod data_stores;
pub mod mock_email_client;
pub mod password_hashing;
pub mod token_service;

pub use auth::*;
pub use data_stores::*;
pub use mock_email_client::*;
pub use token_service::*;
