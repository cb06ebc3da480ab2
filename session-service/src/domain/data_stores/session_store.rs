use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Keyed BLAKE3 digest of a refresh credential as issued.
pub type RefreshDigest = [u8; 32];

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt session record: {0}")]
    Corrupt(String),
}

/// One refresh slot per account.
///
/// `commit` overwrites the slot unconditionally, so a previously issued
/// refresh credential stops matching in `lookup` the moment a newer one is
/// committed. That overwrite is the whole rotation mechanism.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn commit(
        &mut self,
        account_id: Uuid,
        digest: RefreshDigest,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionStoreError>;

    /// The account whose current refresh credential has this digest, if any.
    async fn lookup(&self, digest: &RefreshDigest) -> Result<Option<Uuid>, SessionStoreError>;

    /// Clear the account's slot. Clearing an empty slot is not an error.
    async fn invalidate(&mut self, account_id: Uuid) -> Result<(), SessionStoreError>;
}

pub fn hash_refresh(key32: &[u8; 32], token: &str) -> RefreshDigest {
    let out = blake3::keyed_hash(key32, token.as_bytes());
    *out.as_bytes()
}
