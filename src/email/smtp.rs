//! SMTP email provider implementation using lettre

use super::provider::{EmailProvider, EmailProviderError};
use crate::config::SmtpConfig;
use crate::domain::{EmailAddress, EmailMessage, EmailSendResult};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;

/// SMTP-based email provider
pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailProvider {
    /// Create a new SMTP provider from configuration
    pub fn from_config(config: &SmtpConfig) -> Result<Self, EmailProviderError> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| EmailProviderError::InvalidConfiguration(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            let credentials = Credentials::new(username.clone(), password.clone());
            builder = builder.credentials(credentials);
        }

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Some(Duration::from_secs(secs)));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(address: &EmailAddress) -> Result<Mailbox, EmailProviderError> {
    address
        .to_mailbox_string()
        .parse()
        .map_err(|e| EmailProviderError::InvalidAddress(format!("{}: {}", address.email, e)))
}

fn parse_mailboxes(addresses: &[EmailAddress]) -> Result<Vec<Mailbox>, EmailProviderError> {
    addresses.iter().map(parse_mailbox).collect()
}

/// Assemble a lettre [`Message`] with an HTML body
pub(crate) fn build_message(message: &EmailMessage) -> Result<Message, EmailProviderError> {
    let from = parse_mailbox(&message.from)?;
    let to_list = parse_mailboxes(&message.to)?;

    if to_list.is_empty() {
        return Err(EmailProviderError::InvalidAddress(
            "No recipients specified".to_string(),
        ));
    }

    let mut builder = Message::builder().from(from).subject(&message.subject);

    for to in to_list {
        builder = builder.to(to);
    }
    for cc in parse_mailboxes(&message.cc)? {
        builder = builder.cc(cc);
    }
    for bcc in parse_mailboxes(&message.bcc)? {
        builder = builder.bcc(bcc);
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(message.html_body.clone())
        .map_err(|e| EmailProviderError::SendFailed(e.to_string()))
}

fn classify_transport_error(error: lettre::transport::smtp::Error) -> EmailProviderError {
    let error_msg = error.to_string();
    if error_msg.contains("authentication") || error_msg.contains("AUTH") {
        EmailProviderError::AuthenticationFailed(error_msg)
    } else if error.is_timeout() || error_msg.contains("connection") {
        EmailProviderError::ConnectionError(error_msg)
    } else {
        EmailProviderError::SendFailed(error_msg)
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<EmailSendResult, EmailProviderError> {
        let email = build_message(message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(classify_transport_error)?;

        let message_id = response.message().next().map(|s| s.to_string());
        Ok(EmailSendResult::new(message_id))
    }

    async fn test_connection(&self) -> Result<(), EmailProviderError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(EmailProviderError::ConnectionError(
                "SMTP server did not accept the connection".to_string(),
            )),
            Err(e) => Err(classify_transport_error(e)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}
