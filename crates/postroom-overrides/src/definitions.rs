//! Registered email definitions

use serde::{Deserialize, Serialize};

use crate::errors::OverrideError;
use crate::fields::FieldType;

/// A parameter an email definition accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailParam {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub param_type: FieldType,
}

/// A predefined email kind registered by application code.
///
/// Identified by `id`, and also by the `module` + `key` pair that an
/// override stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDefinition {
    pub id: String,
    pub label: String,
    pub module: String,
    pub key: String,
    #[serde(default)]
    pub params: Vec<EmailParam>,
}

impl EmailDefinition {
    pub fn matches(&self, module: &str, key: &str) -> bool {
        self.module == module && self.key == key
    }
}

/// Source of registered email definitions
pub trait EmailDefinitionRegistry: Send + Sync {
    /// All definitions in registration order
    fn definitions(&self) -> Vec<EmailDefinition>;

    fn definition(&self, id: &str) -> Result<EmailDefinition, OverrideError>;
}
