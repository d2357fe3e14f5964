//! Mail provider trait definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::MailgunError;

/// File attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    /// MIME type, e.g. `application/pdf`
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A message to send through the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Sender, either `user@domain` or `Name <user@domain>`
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    /// Extra MIME headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Provider-side tags for analytics
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    pub fn new(from: impl Into<String>, to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// Recipients joined for log output
    pub fn recipients(&self) -> String {
        self.to.join(", ")
    }
}

/// Provider reply to an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Provider-assigned message id
    pub id: String,
    /// Provider status message
    pub message: String,
}

/// One page of the account's domains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainPage {
    /// Number of domains on the account, across all pages
    pub total_count: usize,
    pub domains: Vec<String>,
}

/// Transactional mail provider
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Send a message through the given sending domain
    async fn send(
        &self,
        domain: &str,
        message: &OutboundMessage,
    ) -> Result<SendResponse, MailgunError>;

    /// List up to `limit` domains, skipping the first `skip`
    async fn list_domains(&self, limit: usize, skip: usize) -> Result<DomainPage, MailgunError>;
}

/// Builds providers for a given API key
pub trait ProviderFactory: Send + Sync {
    fn create(&self, api_key: &str) -> Result<Arc<dyn MailProvider>, MailgunError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_has_single_recipient() {
        let message = OutboundMessage::new("site@example.com", "jane@example.org", "Hello");

        assert_eq!(message.to, vec!["jane@example.org"]);
        assert!(message.cc.is_empty());
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn test_recipients_joined() {
        let mut message = OutboundMessage::new("site@example.com", "jane@example.org", "Hello");
        message.to.push("john@example.org".to_string());

        assert_eq!(message.recipients(), "jane@example.org, john@example.org");
    }

    #[test]
    fn test_message_deserializes_with_defaults() {
        let message: OutboundMessage = serde_json::from_str(
            r#"{"from": "site@example.com", "to": ["jane@example.org"], "subject": "Hi"}"#,
        )
        .unwrap();

        assert!(message.text.is_none());
        assert!(message.headers.is_empty());
        assert!(message.tags.is_empty());
    }
}
