//! Error types for email overrides

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("Email definition not found: {0}")]
    DefinitionNotFound(String),

    #[error("Template type not found: {0}")]
    TemplateTypeNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for OverrideError {
    fn from(err: serde_yaml::Error) -> Self {
        OverrideError::Serialization(err.to_string())
    }
}
