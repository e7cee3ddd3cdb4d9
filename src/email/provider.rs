//! Email provider trait and error types

use crate::domain::{EmailMessage, EmailSendResult};
use async_trait::async_trait;
use thiserror::Error;

/// Email provider error types
#[derive(Error, Debug)]
pub enum EmailProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Trait for email transports
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email message
    async fn send(&self, message: &EmailMessage) -> Result<EmailSendResult, EmailProviderError>;

    /// Test connection to the email provider
    async fn test_connection(&self) -> Result<(), EmailProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;

    #[tokio::test]
    async fn test_mock_email_provider() {
        let mut mock = MockEmailProvider::new();

        mock.expect_provider_name().returning(|| "mock");
        mock.expect_test_connection().returning(|| Ok(()));
        mock.expect_send()
            .withf(|message| message.to[0].email == "test@example.com")
            .returning(|_| Ok(EmailSendResult::new(Some("msg-123".to_string()))));

        assert_eq!(mock.provider_name(), "mock");
        assert!(mock.test_connection().await.is_ok());

        let message = EmailMessage::new(
            EmailAddress::new("noreply@example.com"),
            EmailAddress::new("test@example.com"),
            "Test",
            "<p>Hello</p>",
        );
        let result = mock.send(&message).await.unwrap();
        assert_eq!(result.message_id.as_deref(), Some("msg-123"));
    }

    #[test]
    fn test_email_provider_error_display() {
        assert_eq!(
            EmailProviderError::ConnectionError("Connection refused".to_string()).to_string(),
            "Connection error: Connection refused"
        );
        assert_eq!(
            EmailProviderError::InvalidAddress("not-an-email".to_string()).to_string(),
            "Invalid address: not-an-email"
        );
        assert_eq!(
            EmailProviderError::SendFailed("554 rejected".to_string()).to_string(),
            "Send failed: 554 rejected"
        );
    }
}
