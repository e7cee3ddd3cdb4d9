//! Mail Dispatch - localized account emails over SMTP
//!
//! Resolves a template under `mails/<lang>/`, renders it with Handlebars
//! against the caller's parameters plus the configured hostname, and hands the
//! result to an SMTP transport. Delivery is best-effort: transport failures are
//! logged, never returned, and a global switch can turn delivery off entirely.

pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use service::Mailer;
