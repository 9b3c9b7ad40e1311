//! What a live engine returns when the model call fails.

use lexipro_core::{Analyzer, AnalysisResult, EvidenceItem, ForensicAnalyzer};
use serde::{Deserialize, Serialize};

/// Fallback strategy when a live analysis fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Return the fixed "Analysis interrupted." result
    #[default]
    InterruptedResult,

    /// Run the deterministic keyword scorer instead
    Deterministic,
}

impl FallbackStrategy {
    /// Produce the substitute result for `evidence`.
    pub fn resolve(&self, evidence: &EvidenceItem) -> AnalysisResult {
        match self {
            FallbackStrategy::InterruptedResult => interrupted_result(),
            FallbackStrategy::Deterministic => ForensicAnalyzer::new().analyze(evidence),
        }
    }
}

/// Error-shaped result that is still complete and renderable.
pub fn interrupted_result() -> AnalysisResult {
    AnalysisResult {
        summary: "Analysis interrupted.".to_string(),
        liability: "System Error".to_string(),
        reasoning:
            "The forensic engine could not complete the request. Please check API connectivity."
                .to_string(),
        statutes: vec!["Error".to_string()],
    }
}
