use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Account, Email, ResetTicket};

#[derive(Debug, Error, PartialEq)]
pub enum AccountStoreError {
    #[error("account already exists")]
    AccountAlreadyExists,
    #[error("account not found")]
    AccountNotFound,
    #[error("reset token is invalid or expired")]
    InvalidResetToken,
    #[error("unexpected account store error")]
    UnexpectedError,
}

// Account persistence. Note storage and everything else about the notes
// themselves live behind other collaborators.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    async fn add_account(&mut self, account: Account) -> Result<(), AccountStoreError>;
    async fn get_by_email(&self, email: &Email) -> Result<Account, AccountStoreError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Account, AccountStoreError>;
    async fn update_password(
        &mut self,
        id: Uuid,
        password_hash: String,
    ) -> Result<(), AccountStoreError>;
    async fn set_reset_ticket(
        &mut self,
        id: Uuid,
        ticket: ResetTicket,
    ) -> Result<(), AccountStoreError>;
    /// Consume the ticket matching `digest`. Expired tickets are removed and
    /// reported as `InvalidResetToken`.
    async fn take_reset_ticket(
        &mut self,
        digest: &[u8; 32],
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError>;
}
