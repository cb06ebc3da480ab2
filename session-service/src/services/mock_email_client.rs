use crate::domain::{Email, EmailClient, EmailClientError};

/// Writes outgoing mail to the log instead of delivering it.
#[derive(Default, Clone)]
pub struct MockEmailClient;

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        tracing::info!(
            recipient = recipient.as_ref(),
            subject,
            content_len = content.len(),
            "mock email sent"
        );
        Ok(())
    }
}
