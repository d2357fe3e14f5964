//! Check that the Mailgun settings are complete and accepted

use clap::Args;
use colored::Colorize;

use super::dispatch_service;
use crate::config::PostroomConfig;

#[derive(Args)]
pub struct CheckCommand {
    /// Validate this API key instead of the configured one
    #[arg(long)]
    pub api_key: Option<String>,
}

impl CheckCommand {
    pub fn execute(self, config: &PostroomConfig) -> anyhow::Result<()> {
        let service = dispatch_service(&config.mailgun)?;
        let rt = tokio::runtime::Runtime::new()?;

        let valid = match &self.api_key {
            Some(key) => rt.block_on(service.validate_api_key(key)),
            None => rt.block_on(service.module_status(true)),
        };

        if !valid {
            anyhow::bail!("Mailgun settings are not valid");
        }

        println!("{} Mailgun settings are valid", "✓".green());
        Ok(())
    }
}
