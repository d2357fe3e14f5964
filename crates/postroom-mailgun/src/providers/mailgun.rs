//! Mailgun HTTP API provider implementation

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use super::traits::{DomainPage, MailProvider, OutboundMessage, ProviderFactory, SendResponse};
use crate::errors::MailgunError;
use crate::settings::MailgunSettings;

/// Per-message options applied from the settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub test_mode: bool,
    pub tracking_opens: Option<bool>,
    pub tracking_clicks: Option<bool>,
}

impl From<&MailgunSettings> for DeliveryOptions {
    fn from(settings: &MailgunSettings) -> Self {
        Self {
            test_mode: settings.test_mode,
            tracking_opens: settings.tracking_opens,
            tracking_clicks: settings.tracking_clicks,
        }
    }
}

/// Mailgun provider talking to the v3 REST API
pub struct MailgunClient {
    client: Client,
    api_key: String,
    base_url: String,
    options: DeliveryOptions,
}

// Mailgun API response types
#[derive(Debug, Deserialize)]
struct MailgunSendResponse {
    id: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct MailgunDomainsResponse {
    total_count: usize,
    items: Vec<MailgunDomain>,
}

#[derive(Debug, Deserialize)]
struct MailgunDomain {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MailgunErrorResponse {
    message: String,
}

impl MailgunClient {
    /// Create a new Mailgun client for the given key and API base URL
    pub fn new(
        api_key: &str,
        base_url: &str,
        options: DeliveryOptions,
    ) -> Result<Self, MailgunError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailgunError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
        })
    }

    pub fn from_settings(settings: &MailgunSettings) -> Result<Self, MailgunError> {
        Self::new(
            &settings.api_key,
            &settings.api_endpoint,
            DeliveryOptions::from(settings),
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v3{}", self.base_url, path)
    }

    fn build_form(&self, message: &OutboundMessage) -> Result<Form, MailgunError> {
        let mut form = Form::new()
            .text("from", message.from.clone())
            .text("subject", message.subject.clone());

        for to in &message.to {
            form = form.text("to", to.clone());
        }
        for cc in &message.cc {
            form = form.text("cc", cc.clone());
        }
        for bcc in &message.bcc {
            form = form.text("bcc", bcc.clone());
        }
        if let Some(text) = &message.text {
            form = form.text("text", text.clone());
        }
        if let Some(html) = &message.html {
            form = form.text("html", html.clone());
        }
        if let Some(reply_to) = &message.reply_to {
            form = form.text("h:Reply-To", reply_to.clone());
        }
        for (name, value) in &message.headers {
            form = form.text(format!("h:{}", name), value.clone());
        }
        for tag in &message.tags {
            form = form.text("o:tag", tag.clone());
        }

        if self.options.test_mode {
            form = form.text("o:testmode", "yes");
        }
        if let Some(opens) = self.options.tracking_opens {
            form = form.text("o:tracking-opens", yes_no(opens));
        }
        if let Some(clicks) = self.options.tracking_clicks {
            form = form.text("o:tracking-clicks", yes_no(clicks));
        }

        for attachment in &message.attachments {
            let part = Part::bytes(attachment.content.clone())
                .file_name(attachment.filename.clone())
                .mime_str(&attachment.content_type)
                .map_err(|e| {
                    MailgunError::Validation(format!(
                        "Invalid content type for {}: {}",
                        attachment.filename, e
                    ))
                })?;
            form = form.part("attachment", part);
        }

        Ok(form)
    }

    /// Turn a non-success response into a provider error
    async fn error_from(response: Response, action: &str) -> MailgunError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let detail = serde_json::from_str::<MailgunErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        MailgunError::Provider(format!("Failed to {} ({}): {}", action, status, detail))
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[async_trait]
impl MailProvider for MailgunClient {
    async fn send(
        &self,
        domain: &str,
        message: &OutboundMessage,
    ) -> Result<SendResponse, MailgunError> {
        debug!("Sending email via Mailgun domain {} from: {}", domain, message.from);

        let form = self.build_form(message)?;

        let response = self
            .client
            .post(self.api_url(&format!("/{}/messages", domain)))
            .basic_auth("api", Some(&self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MailgunError::Provider(format!("Failed to send email: {}", e)))?;

        if !response.status().is_success() {
            let err = Self::error_from(response, "send email").await;
            error!("{}", err);
            return Err(err);
        }

        let send_response: MailgunSendResponse = response
            .json()
            .await
            .map_err(|e| MailgunError::Provider(format!("Failed to parse send response: {}", e)))?;

        debug!("Email accepted by Mailgun, id: {}", send_response.id);

        Ok(SendResponse {
            id: send_response.id,
            message: send_response.message,
        })
    }

    async fn list_domains(&self, limit: usize, skip: usize) -> Result<DomainPage, MailgunError> {
        debug!("Listing Mailgun domains (limit {}, skip {})", limit, skip);

        let response = self
            .client
            .get(self.api_url("/domains"))
            .basic_auth("api", Some(&self.api_key))
            .query(&[("limit", limit), ("skip", skip)])
            .send()
            .await
            .map_err(|e| MailgunError::Provider(format!("Failed to list domains: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "list domains").await);
        }

        let domains_response: MailgunDomainsResponse = response.json().await.map_err(|e| {
            MailgunError::Provider(format!("Failed to parse domains response: {}", e))
        })?;

        Ok(DomainPage {
            total_count: domains_response.total_count,
            domains: domains_response
                .items
                .into_iter()
                .map(|d| d.name)
                .collect(),
        })
    }
}

/// Builds [`MailgunClient`]s sharing one endpoint and delivery options
#[derive(Debug, Clone)]
pub struct MailgunClientFactory {
    base_url: String,
    options: DeliveryOptions,
}

impl MailgunClientFactory {
    pub fn new(settings: &MailgunSettings) -> Self {
        Self {
            base_url: settings.api_endpoint.clone(),
            options: DeliveryOptions::from(settings),
        }
    }
}

impl ProviderFactory for MailgunClientFactory {
    fn create(&self, api_key: &str) -> Result<Arc<dyn MailProvider>, MailgunError> {
        Ok(Arc::new(MailgunClient::new(
            api_key,
            &self.base_url,
            self.options,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Attachment;
    use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(mock_server: &MockServer, options: DeliveryOptions) -> MailgunClient {
        MailgunClient::new("key-test-123", &mock_server.uri(), options).unwrap()
    }

    fn message() -> OutboundMessage {
        let mut message =
            OutboundMessage::new("Site <site@mg.example.com>", "jane@example.org", "Welcome");
        message.text = Some("Hello Jane".to_string());
        message
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client =
            MailgunClient::new("key", "https://api.eu.mailgun.net/", DeliveryOptions::default())
                .unwrap();
        assert_eq!(
            client.api_url("/domains"),
            "https://api.eu.mailgun.net/v3/domains"
        );
    }

    #[test]
    fn test_delivery_options_from_settings() {
        let settings = MailgunSettings {
            test_mode: true,
            tracking_clicks: Some(false),
            ..Default::default()
        };
        let options = DeliveryOptions::from(&settings);
        assert!(options.test_mode);
        assert_eq!(options.tracking_opens, None);
        assert_eq!(options.tracking_clicks, Some(false));
    }

    #[tokio::test]
    async fn test_send() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mg.example.com/messages"))
            .and(basic_auth("api", "key-test-123"))
            .and(body_string_contains("jane@example.org"))
            .and(body_string_contains("Hello Jane"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "<20240101.1@mg.example.com>",
                "message": "Queued. Thank you."
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server, DeliveryOptions::default());
        let response = client.send("mg.example.com", &message()).await.unwrap();

        assert_eq!(response.id, "<20240101.1@mg.example.com>");
        assert_eq!(response.message, "Queued. Thank you.");
    }

    #[tokio::test]
    async fn test_send_includes_options_tags_and_attachments() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mg.example.com/messages"))
            .and(body_string_contains("o:testmode"))
            .and(body_string_contains("o:tracking-opens"))
            .and(body_string_contains("o:tag"))
            .and(body_string_contains("welcome"))
            .and(body_string_contains("invoice.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "<2@mg.example.com>",
                "message": "Queued. Thank you."
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(
            &mock_server,
            DeliveryOptions {
                test_mode: true,
                tracking_opens: Some(true),
                tracking_clicks: None,
            },
        );
        let mut message = message();
        message.tags.push("welcome".to_string());
        message.attachments.push(Attachment {
            filename: "invoice.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            content: b"%PDF-1.4".to_vec(),
        });

        client.send("mg.example.com", &message).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mg.example.com/messages"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "'from' parameter is not a valid address. please check documentation"
            })))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server, DeliveryOptions::default());
        let err = client.send("mg.example.com", &message()).await.unwrap_err();

        match err {
            MailgunError::Provider(detail) => {
                assert!(detail.contains("400"));
                assert!(detail.contains("not a valid address"));
            }
            other => panic!("Expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_attachment_content_type() {
        let mock_server = MockServer::start().await;
        let client = client(&mock_server, DeliveryOptions::default());
        let mut message = message();
        message.attachments.push(Attachment {
            filename: "broken.bin".to_string(),
            content_type: "not a mime type".to_string(),
            content: vec![0, 1, 2],
        });

        let result = client.send("mg.example.com", &message).await;

        assert!(matches!(result, Err(MailgunError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_domains() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/domains"))
            .and(basic_auth("api", "key-test-123"))
            .and(query_param("limit", "100"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 2,
                "items": [
                    {"name": "mg.example.com", "state": "active"},
                    {"name": "alerts.example.com", "state": "unverified"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server, DeliveryOptions::default());
        let page = client.list_domains(100, 0).await.unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.domains, vec!["mg.example.com", "alerts.example.com"]);
    }

    #[tokio::test]
    async fn test_list_domains_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/domains"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server, DeliveryOptions::default());
        let err = client.list_domains(1, 0).await.unwrap_err();

        assert!(err.to_string().contains("Forbidden"));
    }
}
