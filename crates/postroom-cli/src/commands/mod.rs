pub mod check;
pub mod domains;
pub mod mappings;
pub mod send;

pub use check::CheckCommand;
pub use domains::DomainsCommand;
pub use mappings::MappingsCommand;
pub use send::SendCommand;

use colored::Colorize;
use postroom_mailgun::{
    DispatchService, MailgunClientFactory, MailgunSettings, Messenger, NoticeLevel,
};
use std::sync::Arc;

/// Output format shared by the listing commands
#[derive(Debug, Clone, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors and formatting
    #[default]
    Text,
    /// JSON output for automation and scripting
    Json,
}

/// Messenger printing notices to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMessenger;

impl Messenger for ConsoleMessenger {
    fn add_message(&self, message: &str, level: NoticeLevel) {
        match level {
            NoticeLevel::Status => println!("{} {}", "✓".green(), message),
            NoticeLevel::Warning => println!("{} {}", "⚠".yellow(), message.yellow()),
            NoticeLevel::Error => println!("{} {}", "✗".red(), message.red()),
        }
    }
}

/// Dispatch service for the Mailgun HTTP API
pub fn dispatch_service(settings: &MailgunSettings) -> anyhow::Result<DispatchService> {
    let factory = Arc::new(MailgunClientFactory::new(settings));
    let service = DispatchService::new(settings.clone(), factory, Arc::new(ConsoleMessenger))?;
    Ok(service)
}
