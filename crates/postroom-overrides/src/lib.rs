//! Email overrides for Postroom
//!
//! Routes a predefined, application-registered email through a
//! content-managed template by mapping the email's parameters onto the
//! template's fields.
//!
//! Features:
//! - Field type normalization (string, text, entity references)
//! - Possible mapping resolution by exact type match
//! - Override editing with deferred mapping on creation

pub mod definitions;
pub mod errors;
pub mod fields;
pub mod mapping;
pub mod memory;
pub mod services;

// Re-export main types
pub use definitions::{EmailDefinition, EmailDefinitionRegistry, EmailParam};
pub use errors::OverrideError;
pub use fields::{
    normalize_field_type, FieldType, TemplateField, TemplateFieldDefinition,
    TemplateFieldRegistry, TemplateType, TemplateTypeRegistry,
};
pub use mapping::{
    possible_mappings, FieldOption, ParamMapping, ParamMappingEntry, ParamMappingResolver,
    PossibleMapping,
};
pub use memory::{InMemoryDefinitionRegistry, InMemoryOverrideStore, InMemoryTemplateRegistry};
pub use services::{
    EmailOverride, MappingRow, NextStep, OverrideService, OverrideStore, OverrideSubmission,
    SaveOutcome, SaveStatus,
};
