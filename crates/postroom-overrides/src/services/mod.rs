mod override_service;

pub use override_service::{
    EmailOverride, MappingRow, NextStep, OverrideService, OverrideStore, OverrideSubmission,
    SaveOutcome, SaveStatus,
};
