//! Domain models for the mailer

pub mod email;
pub mod locale;
pub mod user;

pub use email::*;
pub use locale::*;
pub use user::*;
