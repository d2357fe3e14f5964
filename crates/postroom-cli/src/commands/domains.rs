//! List the Mailgun domains of the configured account

use clap::Args;
use colored::Colorize;
use tracing::debug;

use super::{dispatch_service, OutputFormat};
use crate::config::PostroomConfig;

#[derive(Args)]
pub struct DomainsCommand {
    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

impl DomainsCommand {
    pub fn execute(self, config: &PostroomConfig) -> anyhow::Result<()> {
        let service = dispatch_service(&config.mailgun)?;

        let rt = tokio::runtime::Runtime::new()?;
        let domains = rt.block_on(service.list_domains());
        debug!("Mailgun returned {} domains", domains.len());

        match self.output_format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&domains)?);
            }
            OutputFormat::Text => {
                if domains.is_empty() {
                    println!("{}", "No domains found.".yellow());
                }
                for domain in domains {
                    println!("{}", domain);
                }
            }
        }

        Ok(())
    }
}
