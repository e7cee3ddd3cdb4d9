//! Business logic layer

pub mod mailer;

pub use mailer::{Mailer, VALIDATION_TEMPLATE};
