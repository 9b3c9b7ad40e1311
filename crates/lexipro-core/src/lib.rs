//! # lexipro-core
//!
//! Deterministic evidence risk scoring for LexiPro forensic analysis.
//!
//! Given one piece of case evidence, this crate answers:
//! - Which risk signals does the text carry?
//! - How serious is the combined picture (Low / Medium / High)?
//! - What narrative, liability phrase and statutes go with it?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No LLM calls**: Scoring is a fixed keyword signal table
//! 3. **Total**: `analyze` never fails and always returns 2-3 statutes
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexipro_core::{analyze, EvidenceItem, EvidenceType};
//!
//! let item = EvidenceItem::new(
//!     "EV-001",
//!     "Nursing Notes",
//!     EvidenceType::MedicalRecord,
//!     "2023-10-12 02:15 AM",
//!     "Dr. Smith paged twice. No response. BP 90/60.",
//!     9,
//! );
//! let result = analyze(&item);
//! println!("{}", result.liability);
//! ```

pub mod analyzer;
pub mod dossier;
pub mod evidence;
pub mod narrative;
pub mod schema;
pub mod signals;
pub mod types;

// Re-export main types at crate root
pub use analyzer::{Analyzer, ForensicAnalyzer};
pub use dossier::Dossier;
pub use evidence::EvidenceError;
pub use schema::{validate_analysis_result_schema, validate_evidence_schema, SchemaError};
pub use signals::{assess, score_signals, Signal, SignalRule, SIGNAL_TABLE};
pub use types::{AnalysisResult, Assessment, EvidenceItem, EvidenceType, RiskTier};

/// Analyze one evidence item with the keyword-signal scorer.
///
/// This is the main entry point for deterministic analysis.
pub fn analyze(evidence: &EvidenceItem) -> AnalysisResult {
    ForensicAnalyzer::new().analyze(evidence)
}
