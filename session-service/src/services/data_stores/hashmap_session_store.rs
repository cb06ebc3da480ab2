use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{RefreshDigest, SessionStore, SessionStoreError};

#[derive(Default)]
pub struct HashmapSessionStore {
    // account -> (current digest, expiry)
    by_account: HashMap<Uuid, (RefreshDigest, DateTime<Utc>)>,
    // digest -> account
    by_digest: HashMap<RefreshDigest, Uuid>,
}

impl HashmapSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_sessions(&self) -> usize {
        self.by_account.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for HashmapSessionStore {
    async fn commit(
        &mut self,
        account_id: Uuid,
        digest: RefreshDigest,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionStoreError> {
        if let Some((previous, _)) = self.by_account.insert(account_id, (digest, expires_at)) {
            self.by_digest.remove(&previous);
        }
        self.by_digest.insert(digest, account_id);
        Ok(())
    }

    async fn lookup(&self, digest: &RefreshDigest) -> Result<Option<Uuid>, SessionStoreError> {
        let Some(account_id) = self.by_digest.get(digest) else {
            return Ok(None);
        };
        match self.by_account.get(account_id) {
            Some((current, expires_at)) if current == digest && *expires_at > Utc::now() => {
                Ok(Some(*account_id))
            }
            _ => Ok(None),
        }
    }

    async fn invalidate(&mut self, account_id: Uuid) -> Result<(), SessionStoreError> {
        if let Some((digest, _)) = self.by_account.remove(&account_id) {
            self.by_digest.remove(&digest);
        }
        Ok(())
    }
}
