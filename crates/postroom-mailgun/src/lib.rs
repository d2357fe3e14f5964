//! Mailgun dispatch for Postroom
//!
//! This crate sends transactional email through the Mailgun HTTP API.
//!
//! Features:
//! - Sending domain resolution (fixed working domain or derived from the sender)
//! - Email sending with test mode, tracking and tagging options
//! - Domain listing across pages
//! - API key and settings validation

pub mod domain;
pub mod errors;
pub mod messenger;
pub mod providers;
pub mod services;
pub mod settings;

// Re-export main types
pub use domain::{resolve_domain, SENDER_DOMAIN};
pub use errors::MailgunError;
pub use messenger::{LogMessenger, Messenger, NoticeLevel};
pub use providers::{
    Attachment, DomainPage, MailProvider, MailgunClient, MailgunClientFactory, OutboundMessage,
    ProviderFactory, SendResponse,
};
pub use services::DispatchService;
pub use settings::{MailgunSettings, DEFAULT_API_ENDPOINT};
