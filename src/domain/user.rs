//! User record as seen by the mailer

use serde::{Deserialize, Serialize};

/// Account awaiting email verification.
///
/// Serialized as-is under the `user` key of the template context, so every
/// field here is reachable from a template (`{{user.first_name}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// One-time token embedded in the verification link
    pub verify_token: String,
}

impl User {
    pub fn new(email: impl Into<String>, verify_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            verify_token: verify_token.into(),
            ..Default::default()
        }
    }

    /// Full name when known, otherwise the email address
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}
