//! Mailgun settings

use serde::{Deserialize, Serialize};

use crate::domain::SENDER_DOMAIN;

/// Default Mailgun API endpoint (US region)
pub const DEFAULT_API_ENDPOINT: &str = "https://api.mailgun.net";

/// Read-only Mailgun configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailgunSettings {
    /// Private API key
    #[serde(default)]
    pub api_key: String,

    /// Domain to send through, or `_sender` to use the domain of the From address
    #[serde(default = "default_working_domain")]
    pub working_domain: String,

    /// API base URL (default: https://api.mailgun.net, EU accounts use https://api.eu.mailgun.net)
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Log every successfully sent message
    #[serde(default)]
    pub debug_mode: bool,

    /// Ask Mailgun to accept messages without delivering them
    #[serde(default)]
    pub test_mode: bool,

    /// Open tracking; left to the domain setting when unset
    #[serde(default)]
    pub tracking_opens: Option<bool>,

    /// Click tracking; left to the domain setting when unset
    #[serde(default)]
    pub tracking_clicks: Option<bool>,
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

fn default_working_domain() -> String {
    SENDER_DOMAIN.to_string()
}

impl Default for MailgunSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            working_domain: default_working_domain(),
            api_endpoint: default_api_endpoint(),
            debug_mode: false,
            test_mode: false,
            tracking_opens: None,
            tracking_clicks: None,
        }
    }
}

impl MailgunSettings {
    /// Both the API key and the working domain are filled in
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.working_domain.trim().is_empty()
    }
}
