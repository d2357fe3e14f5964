//! Send a single message through Mailgun

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use postroom_mailgun::{Attachment, OutboundMessage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::dispatch_service;
use crate::config::PostroomConfig;

#[derive(Args)]
pub struct SendCommand {
    /// Sender, e.g. "Site <noreply@mg.example.com>"
    #[arg(long)]
    pub from: String,

    /// Recipient address (repeatable)
    #[arg(long, required = true)]
    pub to: Vec<String>,

    /// CC recipient (repeatable)
    #[arg(long)]
    pub cc: Vec<String>,

    /// BCC recipient (repeatable)
    #[arg(long)]
    pub bcc: Vec<String>,

    #[arg(long)]
    pub reply_to: Option<String>,

    #[arg(long)]
    pub subject: String,

    /// Plain text body
    #[arg(long)]
    pub text: Option<String>,

    /// HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// Mailgun tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// File to attach (repeatable)
    #[arg(long)]
    pub attach: Vec<PathBuf>,
}

impl SendCommand {
    pub fn execute(self, config: &PostroomConfig) -> anyhow::Result<()> {
        if self.text.is_none() && self.html.is_none() {
            anyhow::bail!("Provide a body with --text or --html");
        }

        let attachments = self
            .attach
            .iter()
            .map(|path| read_attachment(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let message = OutboundMessage {
            from: self.from,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            reply_to: self.reply_to,
            subject: self.subject,
            text: self.text,
            html: self.html,
            tags: self.tag,
            attachments,
            ..Default::default()
        };

        let service = dispatch_service(&config.mailgun)?;
        let rt = tokio::runtime::Runtime::new()?;
        let response = rt
            .block_on(service.send(&message))
            .map_err(|e| anyhow::anyhow!("Failed to send email: {}", e))?;

        println!("{} {}", "✓".green(), response.message);
        println!("  {} {}", "Message ID:".bold(), response.id);
        Ok(())
    }
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let content =
        fs::read(path).with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    debug!("Attaching {} ({}, {} bytes)", filename, content_type, content.len());

    Ok(Attachment {
        filename,
        content_type,
        content,
    })
}
