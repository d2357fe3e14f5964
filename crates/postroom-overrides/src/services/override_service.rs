//! Service for editing and saving email overrides

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::definitions::EmailDefinitionRegistry;
use crate::errors::OverrideError;
use crate::fields::{TemplateFieldRegistry, TemplateTypeRegistry};
use crate::mapping::{FieldOption, ParamMapping, ParamMappingResolver};

/// Configuration entity routing a registered email through a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOverride {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub easy_email_type: Option<String>,
    #[serde(default)]
    pub param_map: ParamMapping,
    /// True until the entity has been saved once
    #[serde(skip)]
    pub is_new: bool,
}

impl EmailOverride {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            module: None,
            key: None,
            easy_email_type: None,
            param_map: ParamMapping::default(),
            is_new: true,
        }
    }
}

/// Result of persisting an override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Created,
    Updated,
}

/// Persistence for overrides
#[async_trait]
pub trait OverrideStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<EmailOverride>, OverrideError>;

    async fn save(&self, email_override: &EmailOverride) -> Result<SaveStatus, OverrideError>;
}

/// Values submitted from the override edit view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideSubmission {
    pub email_id: String,
    pub easy_email_type: String,
    /// `(parameter, destination)` pairs; ignored while the override is new
    #[serde(default)]
    pub mappings: Vec<(String, String)>,
}

/// One selectable parameter row in the edit view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub param: String,
    pub label: String,
    /// Matching fields, preceded by an empty "no mapping" choice
    pub options: Vec<FieldOption>,
    pub default_value: Option<String>,
}

/// Where the editor should go after saving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Back to the edit view so the mappings can be chosen
    ConfigureMappings,
    /// Back to the override listing
    Collection,
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub status: SaveStatus,
    pub next_step: NextStep,
    pub message: String,
    pub email_override: EmailOverride,
}

pub struct OverrideService {
    definitions: Arc<dyn EmailDefinitionRegistry>,
    template_types: Arc<dyn TemplateTypeRegistry>,
    resolver: ParamMappingResolver,
    store: Arc<dyn OverrideStore>,
}

impl OverrideService {
    pub fn new(
        definitions: Arc<dyn EmailDefinitionRegistry>,
        fields: Arc<dyn TemplateFieldRegistry>,
        template_types: Arc<dyn TemplateTypeRegistry>,
        store: Arc<dyn OverrideStore>,
    ) -> Self {
        Self {
            resolver: ParamMappingResolver::new(definitions.clone(), fields),
            definitions,
            template_types,
            store,
        }
    }

    pub fn resolver(&self) -> &ParamMappingResolver {
        &self.resolver
    }

    /// `(id, label)` of every registered email
    pub fn email_options(&self) -> Vec<(String, String)> {
        self.definitions
            .definitions()
            .into_iter()
            .map(|d| (d.id, d.label))
            .collect()
    }

    /// `(id, label)` of every template type
    pub fn template_options(&self) -> Vec<(String, String)> {
        self.template_types
            .template_types()
            .into_iter()
            .map(|t| (t.id, t.label))
            .collect()
    }

    /// Id of the registered email the override currently points at
    pub fn current_email_id(&self, email_override: &EmailOverride) -> Option<String> {
        let module = email_override.module.as_deref().filter(|m| !m.is_empty())?;
        let key = email_override.key.as_deref().filter(|k| !k.is_empty())?;

        self.definitions
            .definitions()
            .into_iter()
            .find(|d| d.matches(module, key))
            .map(|d| d.id)
    }

    /// Parameter rows to offer for an override.
    ///
    /// Empty until both the email and the template type are chosen.
    pub fn mapping_rows(&self, email_override: &EmailOverride) -> Vec<MappingRow> {
        let Some(email_id) = self.current_email_id(email_override) else {
            return Vec::new();
        };
        let Some(template_type) = email_override
            .easy_email_type
            .as_deref()
            .filter(|t| !t.is_empty())
        else {
            return Vec::new();
        };

        self.resolver
            .possible_mappings(&email_id, template_type)
            .into_iter()
            .map(|mapping| {
                let mut options = Vec::with_capacity(mapping.options.len() + 1);
                options.push(FieldOption {
                    name: String::new(),
                    label: String::new(),
                });
                options.extend(mapping.options);

                MappingRow {
                    default_value: email_override
                        .param_map
                        .default_for(&mapping.param)
                        .map(str::to_string),
                    param: mapping.param,
                    label: mapping.label,
                    options,
                }
            })
            .collect()
    }

    pub async fn load(&self, id: &str) -> Result<Option<EmailOverride>, OverrideError> {
        self.store.load(id).await
    }

    /// Apply a submission and persist the override.
    ///
    /// The mapping is only rebuilt for existing overrides; a new override
    /// is saved first so its parameters can be offered on the next edit.
    pub async fn save(
        &self,
        mut email_override: EmailOverride,
        submission: OverrideSubmission,
    ) -> Result<SaveOutcome, OverrideError> {
        let is_new = email_override.is_new;
        let definition = self.definitions.definition(&submission.email_id)?;

        email_override.module = Some(definition.module);
        email_override.key = Some(definition.key);
        email_override.easy_email_type = Some(submission.easy_email_type);

        if !is_new {
            email_override.param_map = ParamMapping::from_submission(submission.mappings);
            debug!(
                "Rebuilt {} parameter mappings for override {}",
                email_override.param_map.len(),
                email_override.id
            );
        }

        let status = self.store.save(&email_override).await?;
        email_override.is_new = false;

        let next_step = if is_new {
            NextStep::ConfigureMappings
        } else {
            NextStep::Collection
        };
        let message = match status {
            SaveStatus::Created => format!(
                "Created the {} email override. Please configure any parameter mappings necessary below.",
                email_override.label
            ),
            SaveStatus::Updated => format!("Saved the {} email override.", email_override.label),
        };

        info!("{}", message);

        Ok(SaveOutcome {
            status,
            next_step,
            message,
            email_override,
        })
    }
}
