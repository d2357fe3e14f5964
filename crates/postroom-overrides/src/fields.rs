//! Template field definitions and semantic field types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::OverrideError;

/// Setting holding the target entity type of an `entity_reference` field
pub const TARGET_TYPE_SETTING: &str = "target_type";

/// Semantic type shared by email parameters and template fields.
///
/// Parameters declare one of these directly; template fields get one by
/// running their raw storage type through [`normalize_field_type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Short or long plain string
    String,
    /// Formatted text
    Text,
    /// Reference to an entity of the given target type
    Entity(String),
    /// Any other type, compared verbatim
    Other(String),
}

impl FieldType {
    /// Parse an already-normalized type name such as `string` or `entity:user`
    pub fn parse(value: &str) -> Self {
        match value {
            "string" => FieldType::String,
            "text" => FieldType::Text,
            _ => match value.strip_prefix("entity:") {
                Some(target) => FieldType::Entity(target.to_string()),
                None => FieldType::Other(value.to_string()),
            },
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Text => write!(f, "text"),
            FieldType::Entity(target) => write!(f, "entity:{}", target),
            FieldType::Other(other) => write!(f, "{}", other),
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

/// Collapse a raw template field type into its semantic [`FieldType`].
///
/// `entity_reference` becomes `entity:<target_type>`, the string and text
/// families collapse to `string` and `text`, everything else passes through.
pub fn normalize_field_type(raw_type: &str, settings: &BTreeMap<String, String>) -> FieldType {
    match raw_type {
        "entity_reference" => FieldType::Entity(
            settings
                .get(TARGET_TYPE_SETTING)
                .cloned()
                .unwrap_or_default(),
        ),
        "string" | "string_long" => FieldType::String,
        "text" | "text_long" => FieldType::Text,
        other => FieldType::parse(other),
    }
}

/// Raw field definition as provided by the template field registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFieldDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// Template field with its normalized type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
}

impl From<&TemplateFieldDefinition> for TemplateField {
    fn from(definition: &TemplateFieldDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            label: definition.label.clone(),
            field_type: normalize_field_type(&definition.field_type, &definition.settings),
        }
    }
}

/// A template type (bundle) that overrides can render through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateType {
    pub id: String,
    pub label: String,
}

/// Source of field definitions per template type
pub trait TemplateFieldRegistry: Send + Sync {
    /// Field definitions of a template type, in template order
    fn field_definitions(
        &self,
        template_type: &str,
    ) -> Result<Vec<TemplateFieldDefinition>, OverrideError>;
}

/// Source of the available template types
pub trait TemplateTypeRegistry: Send + Sync {
    fn template_types(&self) -> Vec<TemplateType>;
}
