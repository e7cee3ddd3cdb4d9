//! Configuration management for the mailer

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Mailer behaviour
    pub mail: MailConfig,
    /// SMTP transport configuration
    pub smtp: SmtpConfig,
    /// Directory containing `mails/<lang>/<template>` files
    pub templates_dir: PathBuf,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

/// Values read once at startup and shared by every send
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MailConfig {
    /// Public hostname, injected into every template as `hostname`
    #[validate(length(min = 1, max = 255))]
    pub hostname: String,
    /// From address
    #[validate(email)]
    pub email_sender: String,
    /// Display name paired with the from address (optional)
    pub sender_name: Option<String>,
    /// When false, nothing is handed to the transport
    pub send: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    /// SMTP server port (typically 587 for STARTTLS, 25 for unencrypted)
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upgrade the connection with STARTTLS
    pub use_tls: bool,
    /// Per-command network timeout; lettre's default applies when unset
    pub timeout_secs: Option<u64>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            use_tls: false,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// "plain" or "json"
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "plain".to_string(),
            service_name: "mail-dispatch".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mail = MailConfig {
            hostname: lookup("APP_HOSTNAME").context("APP_HOSTNAME is required")?,
            email_sender: lookup("EMAIL_SENDER").context("EMAIL_SENDER is required")?,
            sender_name: lookup("EMAIL_SENDER_NAME").filter(|name| !name.trim().is_empty()),
            send: match lookup("EMAIL_SEND") {
                Some(value) => parse_bool(&value).context("Invalid EMAIL_SEND")?,
                None => false,
            },
        };
        mail.validate().context("Invalid mail configuration")?;

        let smtp = SmtpConfig {
            host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: lookup("SMTP_PORT")
                .unwrap_or_else(|| "25".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            username: lookup("SMTP_USERNAME"),
            password: lookup("SMTP_PASSWORD"),
            use_tls: match lookup("SMTP_USE_TLS") {
                Some(value) => parse_bool(&value).context("Invalid SMTP_USE_TLS")?,
                None => false,
            },
            timeout_secs: lookup("SMTP_TIMEOUT_SECS")
                .map(|value| value.parse::<u64>())
                .transpose()
                .context("Invalid SMTP_TIMEOUT_SECS")?,
        };

        Ok(Self {
            mail,
            smtp,
            templates_dir: lookup("MAIL_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("resources")),
            telemetry: TelemetryConfig {
                log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "plain".to_string()),
                service_name: lookup("SERVICE_NAME")
                    .unwrap_or_else(|| "mail-dispatch".to_string()),
            },
        })
    }
}

/// Parse the usual spellings of a boolean flag
fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}
