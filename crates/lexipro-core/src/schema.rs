//! JSON Schema validation for evidence input and analysis output.
//!
//! Evidence files are checked against `schema/evidence_item.schema.json`
//! before deserialization. Model-generated analyses are checked against
//! `schema/analysis_result.schema.json` before they are accepted.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded evidence schema (loaded at compile time).
const EVIDENCE_SCHEMA_JSON: &str = include_str!("../../../schema/evidence_item.schema.json");

/// Embedded analysis result schema (loaded at compile time).
const ANALYSIS_RESULT_SCHEMA_JSON: &str =
    include_str!("../../../schema/analysis_result.schema.json");

static EVIDENCE_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static ANALYSIS_RESULT_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn compile(source: &str) -> Result<jsonschema::Validator, String> {
    let schema_value: serde_json::Value = match serde_json::from_str(source) {
        Ok(v) => v,
        Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
    };

    match jsonschema::options().build(&schema_value) {
        Ok(v) => Ok(v),
        Err(e) => Err(format!("Failed to compile schema: {}", e)),
    }
}

fn get_validator(
    cell: &'static OnceLock<Result<jsonschema::Validator, String>>,
    source: &str,
) -> Result<&'static jsonschema::Validator, SchemaError> {
    match cell.get_or_init(|| compile(source)) {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

fn collect_errors(
    validator: &jsonschema::Validator,
    value: &serde_json::Value,
) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an evidence item JSON value.
///
/// Returns the list of validation messages on failure.
pub fn validate_evidence_schema(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator =
        get_validator(&EVIDENCE_SCHEMA, EVIDENCE_SCHEMA_JSON).map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, value)
}

/// Validate an analysis result JSON value.
pub fn validate_analysis_result_schema(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator(&ANALYSIS_RESULT_SCHEMA, ANALYSIS_RESULT_SCHEMA_JSON)
        .map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_evidence_passes_schema() {
        let value = serde_json::json!({
            "id": "EV-001",
            "title": "Nursing Notes - Night Shift",
            "type": "Medical Record",
            "timestamp": "2023-10-12 02:15 AM",
            "content": "Dr. Smith paged twice. No response.",
            "riskScore": 9
        });
        assert!(validate_evidence_schema(&value).is_ok());
    }

    #[test]
    fn test_evidence_unknown_field_fails() {
        let value = serde_json::json!({
            "id": "EV-001",
            "title": "t",
            "type": "Email",
            "timestamp": "",
            "content": "",
            "riskScore": 1,
            "verdict": "guilty"
        });
        assert!(validate_evidence_schema(&value).is_err());
    }

    #[test]
    fn test_evidence_risk_score_bounds() {
        let value = serde_json::json!({
            "id": "EV-001",
            "title": "t",
            "type": "Email",
            "timestamp": "",
            "content": "",
            "riskScore": 0
        });
        let errors = validate_evidence_schema(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_valid_analysis_result_passes_schema() {
        let value = serde_json::json!({
            "summary": "Pager unanswered during hypotension.",
            "liability": "High Risk: Failure to Rescue",
            "reasoning": "02:15 page, no response; BP 90/60.",
            "statutes": ["Failure to Rescue", "EMTALA"]
        });
        assert!(validate_analysis_result_schema(&value).is_ok());
    }

    #[test]
    fn test_analysis_result_missing_field_fails() {
        let value = serde_json::json!({
            "summary": "s",
            "liability": "l",
            "statutes": ["a"]
        });
        assert!(validate_analysis_result_schema(&value).is_err());
    }

    #[test]
    fn test_analysis_result_statutes_must_be_strings() {
        let value = serde_json::json!({
            "summary": "s",
            "liability": "l",
            "reasoning": "r",
            "statutes": [1, 2]
        });
        assert!(validate_analysis_result_schema(&value).is_err());
    }
}
