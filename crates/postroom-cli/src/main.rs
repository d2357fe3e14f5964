//! Postroom CLI - operator entrypoint
//!
//! Sends mail and checks the Mailgun account behind the configuration,
//! and previews parameter mappings for email overrides.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use commands::{CheckCommand, DomainsCommand, MappingsCommand, SendCommand};
use config::PostroomConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "POSTROOM_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "POSTROOM_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    /// Configuration file (default: ~/.postroom/config.toml)
    #[arg(long, env = "POSTROOM_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the domains of the Mailgun account
    Domains(DomainsCommand),
    /// Check the Mailgun settings and API key
    Check(CheckCommand),
    /// Send a message through Mailgun
    Send(SendCommand),
    /// Show possible parameter mappings for an email override
    Mappings(MappingsCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // If RUST_LOG is set, use it directly; otherwise use our default filter
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new(format!(
            "postroom={level},\
             postroom_mailgun={level},\
             postroom_overrides={level},\
             h2=warn,\
             hyper=warn,\
             reqwest=warn,\
             rustls=warn",
            level = cli.log_level
        )),
    };

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer() // "compact" or any other value
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Domains(cmd) => cmd.execute(&PostroomConfig::load(config)?),
        Commands::Check(cmd) => cmd.execute(&PostroomConfig::load(config)?),
        Commands::Send(cmd) => cmd.execute(&PostroomConfig::load(config)?),
        Commands::Mappings(cmd) => cmd.execute(),
    }
}
