//! In-memory registries and override store
//!
//! Backed by plain vectors and loadable from YAML, these serve the CLI and
//! tests in place of a content store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::definitions::{EmailDefinition, EmailDefinitionRegistry};
use crate::errors::OverrideError;
use crate::fields::{TemplateFieldDefinition, TemplateFieldRegistry, TemplateType, TemplateTypeRegistry};
use crate::services::{EmailOverride, OverrideStore, SaveStatus};

/// Email definitions held in registration order
#[derive(Debug, Clone, Default)]
pub struct InMemoryDefinitionRegistry {
    definitions: Vec<EmailDefinition>,
}

impl InMemoryDefinitionRegistry {
    pub fn new(definitions: Vec<EmailDefinition>) -> Self {
        Self { definitions }
    }

    /// Load a YAML list of definitions
    pub fn from_yaml_str(yaml: &str) -> Result<Self, OverrideError> {
        let definitions: Vec<EmailDefinition> = serde_yaml::from_str(yaml)?;
        Ok(Self::new(definitions))
    }
}

impl EmailDefinitionRegistry for InMemoryDefinitionRegistry {
    fn definitions(&self) -> Vec<EmailDefinition> {
        self.definitions.clone()
    }

    fn definition(&self, id: &str) -> Result<EmailDefinition, OverrideError> {
        self.definitions
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| OverrideError::DefinitionNotFound(id.to_string()))
    }
}

/// A template type and its fields, as written in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateBundle {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub fields: Vec<TemplateFieldDefinition>,
}

/// Template types and their field definitions
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRegistry {
    bundles: Vec<TemplateBundle>,
}

impl InMemoryTemplateRegistry {
    pub fn new(bundles: Vec<TemplateBundle>) -> Self {
        Self { bundles }
    }

    /// Load a YAML list of template types with their fields
    pub fn from_yaml_str(yaml: &str) -> Result<Self, OverrideError> {
        let bundles: Vec<TemplateBundle> = serde_yaml::from_str(yaml)?;
        Ok(Self::new(bundles))
    }
}

impl TemplateFieldRegistry for InMemoryTemplateRegistry {
    fn field_definitions(
        &self,
        template_type: &str,
    ) -> Result<Vec<TemplateFieldDefinition>, OverrideError> {
        self.bundles
            .iter()
            .find(|b| b.id == template_type)
            .map(|b| b.fields.clone())
            .ok_or_else(|| OverrideError::TemplateTypeNotFound(template_type.to_string()))
    }
}

impl TemplateTypeRegistry for InMemoryTemplateRegistry {
    fn template_types(&self) -> Vec<TemplateType> {
        self.bundles
            .iter()
            .map(|b| TemplateType {
                id: b.id.clone(),
                label: b.label.clone(),
            })
            .collect()
    }
}

/// Override store keeping entities in a map
#[derive(Debug, Default)]
pub struct InMemoryOverrideStore {
    overrides: RwLock<BTreeMap<String, EmailOverride>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn load(&self, id: &str) -> Result<Option<EmailOverride>, OverrideError> {
        Ok(self.overrides.read().await.get(id).cloned())
    }

    async fn save(&self, email_override: &EmailOverride) -> Result<SaveStatus, OverrideError> {
        let mut stored = email_override.clone();
        stored.is_new = false;

        let previous = self
            .overrides
            .write()
            .await
            .insert(stored.id.clone(), stored);

        Ok(match previous {
            Some(_) => SaveStatus::Updated,
            None => SaveStatus::Created,
        })
    }
}
