use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Account, AccountStore, AccountStoreError, Email, ResetTicket};

#[derive(Default)]
pub struct HashmapAccountStore {
    accounts: HashMap<Uuid, Account>,
    // email -> id
    by_email: HashMap<Email, Uuid>,
}

impl HashmapAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut Account, AccountStoreError> {
        self.accounts
            .get_mut(&id)
            .ok_or(AccountStoreError::AccountNotFound)
    }
}

#[async_trait::async_trait]
impl AccountStore for HashmapAccountStore {
    async fn add_account(&mut self, account: Account) -> Result<(), AccountStoreError> {
        if self.by_email.contains_key(&account.email) || self.accounts.contains_key(&account.id) {
            return Err(AccountStoreError::AccountAlreadyExists);
        }
        self.by_email.insert(account.email.clone(), account.id);
        self.accounts.insert(account.id, account);
        Ok(())
    }

    async fn get_by_email(&self, email: &Email) -> Result<Account, AccountStoreError> {
        self.by_email
            .get(email)
            .and_then(|id| self.accounts.get(id))
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account, AccountStoreError> {
        self.accounts
            .get(&id)
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }

    async fn update_password(
        &mut self,
        id: Uuid,
        password_hash: String,
    ) -> Result<(), AccountStoreError> {
        self.get_mut(id)?.password_hash = password_hash;
        Ok(())
    }

    async fn set_reset_ticket(
        &mut self,
        id: Uuid,
        ticket: ResetTicket,
    ) -> Result<(), AccountStoreError> {
        // a newer request replaces any outstanding ticket
        self.get_mut(id)?.reset_ticket = Some(ticket);
        Ok(())
    }

    async fn take_reset_ticket(
        &mut self,
        digest: &[u8; 32],
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        let account = self
            .accounts
            .values_mut()
            .find(|a| a.reset_ticket.as_ref().is_some_and(|t| &t.digest == digest))
            .ok_or(AccountStoreError::InvalidResetToken)?;

        let ticket = account.reset_ticket.take();
        match ticket {
            Some(t) if !t.is_expired(now) => Ok(account.clone()),
            _ => Err(AccountStoreError::InvalidResetToken),
        }
    }
}
