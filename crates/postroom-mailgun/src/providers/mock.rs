//! Mock mail provider for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::MailgunError;
use crate::providers::{DomainPage, MailProvider, OutboundMessage, ProviderFactory, SendResponse};

/// Mock mail provider for testing
#[derive(Debug, Clone)]
pub struct MockMailProvider {
    /// Counters for tracking calls
    pub send_count: Arc<AtomicUsize>,
    pub list_count: Arc<AtomicUsize>,
    /// Domains passed to `send`, in call order
    pub sent_domains: Arc<Mutex<Vec<String>>>,

    /// Configurable responses
    pub should_fail_send: bool,
    pub should_fail_list: bool,
    pub domains: Vec<String>,
    /// Reported total; defaults to the number of `domains`
    pub total_count: Option<usize>,
}

impl Default for MockMailProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailProvider {
    pub fn new() -> Self {
        Self {
            send_count: Arc::new(AtomicUsize::new(0)),
            list_count: Arc::new(AtomicUsize::new(0)),
            sent_domains: Arc::new(Mutex::new(Vec::new())),
            should_fail_send: false,
            should_fail_list: false,
            domains: Vec::new(),
            total_count: None,
        }
    }

    pub fn with_send_failure(mut self) -> Self {
        self.should_fail_send = true;
        self
    }

    pub fn with_list_failure(mut self) -> Self {
        self.should_fail_list = true;
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_total_count(mut self, total_count: usize) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn send_call_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn list_call_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn sent_domains(&self) -> Vec<String> {
        self.sent_domains.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailProvider for MockMailProvider {
    async fn send(
        &self,
        domain: &str,
        _message: &OutboundMessage,
    ) -> Result<SendResponse, MailgunError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        self.sent_domains.lock().unwrap().push(domain.to_string());

        if self.should_fail_send {
            return Err(MailgunError::Provider("Mock send failure".to_string()));
        }

        Ok(SendResponse {
            id: format!("<mock-{}@{}>", self.send_call_count(), domain),
            message: "Queued. Thank you.".to_string(),
        })
    }

    async fn list_domains(&self, limit: usize, skip: usize) -> Result<DomainPage, MailgunError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail_list {
            return Err(MailgunError::Provider("Mock list failure".to_string()));
        }

        Ok(DomainPage {
            total_count: self.total_count.unwrap_or(self.domains.len()),
            domains: self.domains.iter().skip(skip).take(limit).cloned().collect(),
        })
    }
}

/// Factory handing out the same mock, failing to list for unknown keys
#[derive(Debug, Clone)]
pub struct MockProviderFactory {
    pub provider: MockMailProvider,
    pub valid_keys: Vec<String>,
}

impl MockProviderFactory {
    pub fn new(provider: MockMailProvider, valid_keys: &[&str]) -> Self {
        Self {
            provider,
            valid_keys: valid_keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ProviderFactory for MockProviderFactory {
    fn create(&self, api_key: &str) -> Result<Arc<dyn MailProvider>, MailgunError> {
        if self.valid_keys.iter().any(|k| k == api_key) {
            Ok(Arc::new(self.provider.clone()))
        } else {
            Ok(Arc::new(self.provider.clone().with_list_failure()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_send() {
        let provider = MockMailProvider::new();
        let message = OutboundMessage::new("site@example.com", "jane@example.org", "Hi");

        let response = provider.send("example.com", &message).await.unwrap();

        assert_eq!(response.id, "<mock-1@example.com>");
        assert_eq!(provider.send_call_count(), 1);
        assert_eq!(provider.sent_domains(), vec!["example.com"]);
    }

    #[tokio::test]
    async fn test_mock_provider_pages_domains() {
        let provider = MockMailProvider::new().with_domains(["a.com", "b.com", "c.com"]);

        let page = provider.list_domains(2, 2).await.unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(page.domains, vec!["c.com"]);
    }

    #[tokio::test]
    async fn test_mock_factory_rejects_unknown_key() {
        let factory = MockProviderFactory::new(MockMailProvider::new(), &["good"]);

        assert!(factory.create("good").unwrap().list_domains(1, 0).await.is_ok());
        assert!(factory.create("bad").unwrap().list_domains(1, 0).await.is_err());
    }
}
