use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{RedisService, RedisServiceErr};
use crate::domain::{RefreshDigest, SessionStore, SessionStoreError};

const ACCOUNT_PREFIX: &str = "session:account:";
const DIGEST_PREFIX: &str = "session:token:";

/// Two keys per session, both expiring with the refresh credential:
/// `session:account:{id}` holds the encoded digest and
/// `session:token:{digest}` points back at the account.
pub struct RedisSessionStore {
    redis_service: Arc<RedisService>,
}

impl RedisSessionStore {
    pub fn new(redis_service: Arc<RedisService>) -> Self {
        Self { redis_service }
    }
}

fn account_key(account_id: Uuid) -> String {
    format!("{ACCOUNT_PREFIX}{account_id}")
}

fn digest_key(encoded: &str) -> String {
    format!("{DIGEST_PREFIX}{encoded}")
}

fn unavailable(e: RedisServiceErr) -> SessionStoreError {
    SessionStoreError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn commit(
        &mut self,
        account_id: Uuid,
        digest: RefreshDigest,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionStoreError> {
        let encoded = URL_SAFE_NO_PAD.encode(digest);
        let ttl = (expires_at - Utc::now()).num_seconds().max(1) as u64;
        let slot = account_key(account_id);

        if let Some(previous) = self.redis_service.get(&slot).await.map_err(unavailable)? {
            self.redis_service
                .delete_key(&digest_key(&previous))
                .await
                .map_err(unavailable)?;
        }

        self.redis_service
            .set_ex(&slot, &encoded, ttl)
            .await
            .map_err(unavailable)?;
        self.redis_service
            .set_ex(&digest_key(&encoded), &account_id.to_string(), ttl)
            .await
            .map_err(unavailable)
    }

    async fn lookup(&self, digest: &RefreshDigest) -> Result<Option<Uuid>, SessionStoreError> {
        let encoded = URL_SAFE_NO_PAD.encode(digest);
        let Some(raw_id) = self
            .redis_service
            .get(&digest_key(&encoded))
            .await
            .map_err(unavailable)?
        else {
            return Ok(None);
        };
        let account_id = Uuid::parse_str(&raw_id)
            .map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;

        // the reverse key can outlive a failed delete; the slot is authoritative
        let current = self
            .redis_service
            .get(&account_key(account_id))
            .await
            .map_err(unavailable)?;
        Ok((current.as_deref() == Some(encoded.as_str())).then_some(account_id))
    }

    async fn invalidate(&mut self, account_id: Uuid) -> Result<(), SessionStoreError> {
        let slot = account_key(account_id);
        if let Some(previous) = self.redis_service.get(&slot).await.map_err(unavailable)? {
            self.redis_service
                .delete_key(&digest_key(&previous))
                .await
                .map_err(unavailable)?;
        }
        self.redis_service
            .delete_key(&slot)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
