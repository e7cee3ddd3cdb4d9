//! Mailer: template lookup, rendering and best-effort delivery

use crate::config::MailConfig;
use crate::domain::{EmailAddress, EmailMessage, Locale, Recipient, RenderedMessage, User};
use crate::email::{EmailProvider, TemplateContext, TemplateRenderer};
use crate::error::Result;
use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Template used for account verification emails
pub const VALIDATION_TEMPLATE: &str = "verify.html";

/// Renders localized templates and hands the result to an [`EmailProvider`].
///
/// Cloning is cheap; clones share the provider, the renderer and the
/// configuration captured at construction.
#[derive(Clone)]
pub struct Mailer {
    config: Arc<MailConfig>,
    provider: Arc<dyn EmailProvider>,
    templates: Arc<dyn TemplateRenderer>,
}

impl Mailer {
    pub fn new(
        config: MailConfig,
        provider: Arc<dyn EmailProvider>,
        templates: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            templates,
        }
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// `mails/<language>/<template_name>`, with no existence check
    pub fn resolve_template_path(template_name: &str, locale: &Locale) -> String {
        format!("mails/{}/{}", locale.language(), template_name)
    }

    /// Copy of `parameters` with the global keys overlaid.
    ///
    /// `hostname` always carries the configured value, replacing any value
    /// the caller supplied.
    pub fn template_context(&self, parameters: &TemplateContext) -> TemplateContext {
        let mut context = parameters.clone();
        context.insert(
            "hostname".to_string(),
            Value::String(self.config.hostname.clone()),
        );
        context
    }

    /// Render the template at `path`. The caller's map is left untouched.
    pub fn render_template(&self, path: &str, parameters: &TemplateContext) -> Result<String> {
        let context = self.template_context(parameters);
        Ok(self.templates.render(path, &context)?)
    }

    /// Render `template_name` for `locale` and send it to `to`.
    ///
    /// The subject comes from the `subject` parameter; a missing or non-string
    /// value gives an empty subject. Template errors are returned, delivery
    /// errors are not (see [`Mailer::send_email`]).
    pub async fn create_and_send_email(
        &self,
        template_name: &str,
        to: &str,
        parameters: &TemplateContext,
        locale: &Locale,
    ) -> Result<()> {
        let path = Self::resolve_template_path(template_name, locale);
        let rendered = RenderedMessage {
            subject: parameters
                .get("subject")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            html_body: self.render_template(&path, parameters)?,
        };

        self.send_email(&Recipient::new(to), &rendered.subject, &rendered.html_body)
            .await;
        Ok(())
    }

    /// Send an HTML email.
    ///
    /// Does nothing when delivery is disabled. Transport and address failures
    /// are logged at warn level and never returned.
    pub async fn send_email(&self, recipient: &Recipient, subject: &str, body: &str) {
        if !self.config.send {
            debug!(to = %recipient.to, "E-mail delivery disabled, skipping");
            return;
        }

        let from = match &self.config.sender_name {
            Some(name) => EmailAddress::with_name(&self.config.email_sender, name),
            None => EmailAddress::new(&self.config.email_sender),
        };
        let message = EmailMessage::for_recipient(from, recipient, subject, body);

        match self.provider.send(&message).await {
            Ok(result) => {
                debug!(
                    to = %recipient.to,
                    provider = self.provider.provider_name(),
                    message_id = ?result.message_id,
                    "Sent e-mail"
                );
            }
            Err(e) => {
                warn!(
                    to = %recipient.to,
                    error = %e,
                    "E-mail could not be sent to '{}'",
                    recipient.to
                );
            }
        }
    }

    /// Queue the verification email for `user` and return immediately.
    ///
    /// The work runs on a detached tokio task: the caller gets no completion
    /// signal and no error. Template failures are logged at error level.
    /// Outside a tokio runtime nothing is sent and the drop is logged.
    pub fn send_validation_email(&self, user: &User, locale: &Locale) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(
                    to = %user.email,
                    error = %e,
                    "No async runtime, validation e-mail dropped"
                );
                return;
            }
        };

        let mailer = self.clone();
        let user = user.clone();
        let locale = locale.clone();

        handle.spawn(async move {
            if let Err(e) = mailer.deliver_validation_email(&user, &locale).await {
                error!(
                    to = %user.email,
                    error = %e,
                    "Validation e-mail could not be prepared"
                );
            }
        });
    }

    /// Body of [`Mailer::send_validation_email`], awaited in place
    pub async fn deliver_validation_email(&self, user: &User, locale: &Locale) -> Result<()> {
        debug!(to = %user.email, locale = %locale, "Sending e-mail validation e-mail");

        let mut parameters = TemplateContext::new();
        parameters.insert(
            "user".to_string(),
            serde_json::to_value(user).context("Failed to serialize user")?,
        );

        self.create_and_send_email(VALIDATION_TEMPLATE, &user.email, &parameters, locale)
            .await
    }
}
