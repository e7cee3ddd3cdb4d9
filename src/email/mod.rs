//! Email sending functionality
//!
//! - SMTP transport (using lettre)
//! - Handlebars templates loaded from a `mails/<lang>/` directory tree

pub mod provider;
pub mod smtp;
pub mod templates;

pub use provider::{EmailProvider, EmailProviderError};
pub use smtp::SmtpEmailProvider;
pub use templates::{HandlebarsTemplateEngine, TemplateContext, TemplateError, TemplateRenderer};
