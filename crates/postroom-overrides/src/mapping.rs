//! Parameter mapping between email definitions and template fields

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::definitions::{EmailDefinition, EmailDefinitionRegistry};
use crate::fields::{TemplateField, TemplateFieldRegistry};

/// One stored link from an email parameter to a template field.
///
/// An empty `destination` means no field has been chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamMappingEntry {
    pub source: String,
    #[serde(default)]
    pub destination: String,
}

/// Ordered parameter mapping stored on an override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMapping(Vec<ParamMappingEntry>);

impl ParamMapping {
    pub fn new(entries: Vec<ParamMappingEntry>) -> Self {
        Self(entries)
    }

    /// Rebuild a mapping from submitted `(parameter, destination)` pairs.
    ///
    /// The result replaces whatever was stored before. A parameter submitted
    /// twice keeps its first destination.
    pub fn from_submission<I, S, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, D)>,
        S: Into<String>,
        D: Into<String>,
    {
        let mut entries: Vec<ParamMappingEntry> = Vec::new();
        for (source, destination) in pairs {
            let source = source.into();
            if entries.iter().any(|e| e.source == source) {
                warn!("Ignoring repeated mapping for parameter {}", source);
                continue;
            }
            entries.push(ParamMappingEntry {
                source,
                destination: destination.into(),
            });
        }
        Self(entries)
    }

    /// Destination stored for a parameter. First match wins.
    pub fn default_for(&self, source: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| entry.destination.as_str())
    }

    pub fn entries(&self) -> &[ParamMappingEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A template field offered as destination for a parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub name: String,
    pub label: String,
}

/// A parameter together with every template field of matching type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PossibleMapping {
    pub param: String,
    pub label: String,
    pub options: Vec<FieldOption>,
}

/// Compute which template fields can receive which parameters.
///
/// Parameters without any field of exactly the same type are left out.
/// Parameter order follows the definition, option order follows `fields`.
pub fn possible_mappings(
    definition: &EmailDefinition,
    fields: &[TemplateField],
) -> Vec<PossibleMapping> {
    definition
        .params
        .iter()
        .filter_map(|param| {
            let options: Vec<FieldOption> = fields
                .iter()
                .filter(|field| field.field_type == param.param_type)
                .map(|field| FieldOption {
                    name: field.name.clone(),
                    label: field.label.clone(),
                })
                .collect();

            if options.is_empty() {
                None
            } else {
                Some(PossibleMapping {
                    param: param.name.clone(),
                    label: param.label.clone(),
                    options,
                })
            }
        })
        .collect()
}

/// Resolves possible mappings through the injected registries
pub struct ParamMappingResolver {
    definitions: Arc<dyn EmailDefinitionRegistry>,
    fields: Arc<dyn TemplateFieldRegistry>,
}

impl ParamMappingResolver {
    pub fn new(
        definitions: Arc<dyn EmailDefinitionRegistry>,
        fields: Arc<dyn TemplateFieldRegistry>,
    ) -> Self {
        Self {
            definitions,
            fields,
        }
    }

    /// Possible mappings for an email and a template type.
    ///
    /// Yields nothing when either side cannot be loaded.
    pub fn possible_mappings(&self, email_id: &str, template_type: &str) -> Vec<PossibleMapping> {
        let definition = match self.definitions.definition(email_id) {
            Ok(definition) => definition,
            Err(e) => {
                debug!("No mappings offered for {}: {}", email_id, e);
                return Vec::new();
            }
        };

        let fields: Vec<TemplateField> = match self.fields.field_definitions(template_type) {
            Ok(definitions) => definitions.iter().map(TemplateField::from).collect(),
            Err(e) => {
                debug!("No mappings offered for {}: {}", template_type, e);
                return Vec::new();
            }
        };

        possible_mappings(&definition, &fields)
    }
}
