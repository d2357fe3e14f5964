//! Service for dispatching mail through Mailgun

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::resolve_domain;
use crate::errors::MailgunError;
use crate::messenger::{Messenger, NoticeLevel};
use crate::providers::{MailProvider, OutboundMessage, ProviderFactory, SendResponse};
use crate::settings::MailgunSettings;

/// Page size used when listing domains
pub const DOMAIN_PAGE_SIZE: usize = 100;

/// Sends messages and checks the account behind the configured settings.
///
/// Failures never escape as panics: `send` returns an error value, the
/// other operations degrade to `false` or an empty set. Every failure is
/// logged.
pub struct DispatchService {
    settings: MailgunSettings,
    provider: Arc<dyn MailProvider>,
    factory: Arc<dyn ProviderFactory>,
    messenger: Arc<dyn Messenger>,
}

impl DispatchService {
    pub fn new(
        settings: MailgunSettings,
        factory: Arc<dyn ProviderFactory>,
        messenger: Arc<dyn Messenger>,
    ) -> Result<Self, MailgunError> {
        let provider = factory.create(&settings.api_key)?;

        Ok(Self {
            settings,
            provider,
            factory,
            messenger,
        })
    }

    pub fn settings(&self) -> &MailgunSettings {
        &self.settings
    }

    /// Sending domain for a sender address under the current settings
    pub fn domain_for(&self, from: &str) -> Result<String, MailgunError> {
        resolve_domain(&self.settings.working_domain, from)
    }

    /// Send one message.
    ///
    /// Nothing reaches the provider when the key or working domain is
    /// missing, the message has no recipient, or no sending domain can be
    /// derived from the sender.
    pub async fn send(&self, message: &OutboundMessage) -> Result<SendResponse, MailgunError> {
        debug!("Sending email from {} to {:?}", message.from, message.to);

        if !self.settings.is_configured() {
            error!(
                "Failed to send message from {} to {}. Please check the Mailgun settings.",
                message.from,
                message.recipients()
            );
            return Err(MailgunError::ConfigurationInvalid(
                "API key and working domain must not be empty".to_string(),
            ));
        }

        if message.to.is_empty() {
            error!(
                "Failed to send message from {}: no recipients given.",
                message.from
            );
            return Err(MailgunError::Validation(
                "At least one recipient is required".to_string(),
            ));
        }

        let domain = match self.domain_for(&message.from) {
            Ok(domain) => domain,
            Err(e) => {
                error!(
                    "Failed to send message from {} to {}. Could not retrieve domain from sender info.",
                    message.from,
                    message.recipients()
                );
                return Err(e);
            }
        };

        let response = match self.provider.send(&domain, message).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    "Exception occurred while trying to send email from {} to {}: {}",
                    message.from,
                    message.recipients(),
                    e
                );
                return Err(e);
            }
        };

        if self.settings.debug_mode {
            info!(
                "Successfully sent message from {} to {}. {} {}.",
                message.from,
                message.recipients(),
                response.id,
                response.message
            );
        }

        Ok(response)
    }

    /// Every domain on the account, sorted by name.
    ///
    /// Empty when the provider cannot be reached.
    pub async fn list_domains(&self) -> BTreeSet<String> {
        match fetch_all_domains(self.provider.as_ref()).await {
            Ok(domains) => domains,
            Err(e) => {
                error!("Could not retrieve domains from Mailgun API. {}", e);
                BTreeSet::new()
            }
        }
    }

    /// Whether a provider built with `key` can list domains
    pub async fn validate_api_key(&self, key: &str) -> bool {
        let provider = match self.factory.create(key) {
            Ok(provider) => provider,
            Err(e) => {
                debug!("Could not build a Mailgun client to validate the key: {}", e);
                return false;
            }
        };

        match provider.list_domains(1, 0).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Mailgun API key rejected: {}", e);
                false
            }
        }
    }

    /// Whether the configured settings are complete and accepted by Mailgun.
    ///
    /// With `show_message`, the reason for a failure is also shown as a
    /// warning notice.
    pub async fn settings_are_valid(&self, show_message: bool) -> bool {
        if !self.settings.is_configured() {
            if show_message {
                self.messenger.add_message(
                    "Please check your API settings. API key and domain shouldn't be empty.",
                    NoticeLevel::Warning,
                );
            }
            return false;
        }

        if !self.validate_api_key(&self.settings.api_key).await {
            if show_message {
                self.messenger.add_message(
                    "Couldn't connect to the Mailgun API. Please check your API settings.",
                    NoticeLevel::Warning,
                );
            }
            return false;
        }

        true
    }

    /// Overall readiness to send mail
    pub async fn module_status(&self, show_message: bool) -> bool {
        self.settings_are_valid(show_message).await
    }
}

/// Page through the provider's domains until the reported total is reached
async fn fetch_all_domains(provider: &dyn MailProvider) -> Result<BTreeSet<String>, MailgunError> {
    let mut domains = BTreeSet::new();
    let mut skip = 0;

    loop {
        let page = provider.list_domains(DOMAIN_PAGE_SIZE, skip).await?;
        let fetched = page.domains.len();
        domains.extend(page.domains);
        skip += fetched;

        if fetched == 0 || skip >= page.total_count {
            break;
        }
    }

    Ok(domains)
}
