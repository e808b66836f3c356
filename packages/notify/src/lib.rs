// ABOUTME: Best-effort email delivery through an HTTP mail API
// ABOUTME: Unconfigured deployments log the message instead of sending

pub mod mailer;
pub mod templates;

pub use mailer::{Mailer, MailerConfig};
