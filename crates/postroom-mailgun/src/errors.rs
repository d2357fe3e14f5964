//! Error types for Mailgun dispatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailgunError {
    #[error("Configuration invalid: {0}")]
    ConfigurationInvalid(String),

    #[error("Could not retrieve domain from sender info: {0}")]
    DomainUnresolvable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Mailgun error: {0}")]
    Provider(String),
}
