use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Email;

/// A one-shot password reset ticket. Only the digest of the emailed token is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetTicket {
    pub digest: [u8; 32],
    pub expires_at: DateTime<Utc>,
}

impl ResetTicket {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A registered account.
///
/// The account's current refresh credential is not a field here: it lives in
/// the `SessionStore`, keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub reset_ticket: Option<ResetTicket>,
}

impl Account {
    pub fn new(email: Email, password_hash: String) -> Self {
        Account {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
            reset_ticket: None,
        }
    }
}
