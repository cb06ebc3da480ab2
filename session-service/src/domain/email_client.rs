use thiserror::Error;

use super::Email;

#[derive(Debug, Error)]
pub enum EmailClientError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

// Outbound mail is a collaborator; the service only needs to hand off a message.
#[async_trait::async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError>;
}
