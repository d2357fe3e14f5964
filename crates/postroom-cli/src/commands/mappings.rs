//! Show which template fields can receive which email parameters

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use postroom_overrides::{
    InMemoryDefinitionRegistry, InMemoryOverrideStore, InMemoryTemplateRegistry, OverrideService,
    PossibleMapping,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::OutputFormat;

#[derive(Args)]
pub struct MappingsCommand {
    /// YAML file listing the registered email definitions
    #[arg(long, env = "POSTROOM_DEFINITIONS")]
    pub definitions: PathBuf,

    /// YAML file listing the template types and their fields
    #[arg(long, env = "POSTROOM_TEMPLATES")]
    pub templates: PathBuf,

    /// Email definition id; lists the available emails when omitted
    #[arg(long)]
    pub email: Option<String>,

    /// Template type id; lists the available templates when omitted
    #[arg(long)]
    pub template: Option<String>,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

impl MappingsCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let service = self.service()?;

        let (email, template) = match (&self.email, &self.template) {
            (Some(email), Some(template)) => (email, template),
            _ => {
                print_options("Emails", &service.email_options());
                print_options("Templates", &service.template_options());
                return Ok(());
            }
        };

        let mappings = service.resolver().possible_mappings(email, template);

        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mappings)?),
            OutputFormat::Text => print_mappings(&mappings),
        }

        Ok(())
    }

    fn service(&self) -> anyhow::Result<OverrideService> {
        let definitions = fs::read_to_string(&self.definitions)
            .with_context(|| format!("Failed to read {}", self.definitions.display()))?;
        let templates = fs::read_to_string(&self.templates)
            .with_context(|| format!("Failed to read {}", self.templates.display()))?;

        let definitions = Arc::new(InMemoryDefinitionRegistry::from_yaml_str(&definitions)?);
        let templates = Arc::new(InMemoryTemplateRegistry::from_yaml_str(&templates)?);

        Ok(OverrideService::new(
            definitions,
            templates.clone(),
            templates,
            Arc::new(InMemoryOverrideStore::new()),
        ))
    }
}

fn print_options(title: &str, options: &[(String, String)]) {
    println!("{}", title.bold());
    for (id, label) in options {
        println!("  {} {}", id.bright_blue(), label);
    }
}

fn print_mappings(mappings: &[PossibleMapping]) {
    if mappings.is_empty() {
        println!("{}", "No parameters can be mapped to this template.".yellow());
        return;
    }

    for mapping in mappings {
        println!("{} ({})", mapping.label.bold(), mapping.param);
        for option in &mapping.options {
            println!("  {} {} {}", "→".bright_blue(), option.name, option.label.dimmed());
        }
    }
}
