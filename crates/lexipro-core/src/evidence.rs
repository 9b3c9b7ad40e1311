//! Loading evidence items from YAML/JSON.

use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::schema::validate_evidence_schema;
use crate::types::EvidenceItem;

/// Errors that can occur when loading or registering evidence.
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("Failed to read evidence file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Evidence failed schema validation: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Evidence validation failed: {0}")]
    ValidationError(String),

    #[error("Evidence content is empty")]
    EmptyContent,

    #[error("Duplicate evidence ID: {0}")]
    DuplicateId(String),
}

impl EvidenceItem {
    /// Parse an item from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EvidenceError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse an item from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, EvidenceError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse an item from a file, choosing the format by extension.
    ///
    /// `.yaml` / `.yml` are read as YAML; anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EvidenceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Schema-check, deserialize, then validate.
    fn from_value(value: JsonValue) -> Result<Self, EvidenceError> {
        validate_evidence_schema(&value).map_err(EvidenceError::SchemaError)?;
        let item: EvidenceItem = serde_json::from_value(value)?;
        item.validate()?;
        Ok(item)
    }

    /// Check field constraints the type system does not carry.
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.id.trim().is_empty() {
            return Err(EvidenceError::ValidationError("id must not be empty".to_string()));
        }

        if !(Self::MIN_RISK_SCORE..=Self::MAX_RISK_SCORE).contains(&self.risk_score) {
            return Err(EvidenceError::ValidationError(format!(
                "riskScore must be between {} and {}, got {}",
                Self::MIN_RISK_SCORE,
                Self::MAX_RISK_SCORE,
                self.risk_score
            )));
        }

        Ok(())
    }
}
