//! Unified error handling for the mailer

use crate::email::TemplateError;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True when the error means a template is missing from the bundle
    pub fn is_template_not_found(&self) -> bool {
        matches!(self, AppError::Template(TemplateError::NotFound(_)))
    }
}
