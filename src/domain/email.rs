//! Outbound email domain types

use serde::{Deserialize, Serialize};

/// Email address with optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Render as an RFC 5322 mailbox (`Name <addr>` or bare `addr`)
    pub fn to_mailbox_string(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// Primary recipient plus carbon-copy lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    pub to: String,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

impl Recipient {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_cc<I, S>(mut self, cc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cc = cc.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bcc<I, S>(mut self, bcc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bcc = bcc.into_iter().map(Into::into).collect();
        self
    }
}

/// Subject and HTML body produced from a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub html_body: String,
}

/// Email message handed to a transport
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub cc: Vec<EmailAddress>,
    pub bcc: Vec<EmailAddress>,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    pub fn new(
        from: EmailAddress,
        to: EmailAddress,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to: vec![to],
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }

    /// Build a message for a [`Recipient`], copying its cc/bcc lists
    pub fn for_recipient(
        from: EmailAddress,
        recipient: &Recipient,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        let mut message = Self::new(from, EmailAddress::new(&recipient.to), subject, html_body);
        message.cc = recipient.cc.iter().map(EmailAddress::new).collect();
        message.bcc = recipient.bcc.iter().map(EmailAddress::new).collect();
        message
    }
}

/// Result of an accepted send
#[derive(Debug)]
pub struct EmailSendResult {
    /// Transport-assigned id, when the server reports one
    pub message_id: Option<String>,
}

impl EmailSendResult {
    pub fn new(message_id: Option<String>) -> Self {
        Self { message_id }
    }
}
