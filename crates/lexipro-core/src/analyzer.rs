//! Analyzer: scores an evidence item and renders the forensic narrative.
//!
//! Scoring (`signals`) and presentation (`narrative`) stay separate; the
//! analyzer only wires one into the other.

use crate::narrative::{build_liability, build_reasoning, build_statutes, build_summary};
use crate::signals::assess;
use crate::types::{AnalysisResult, Assessment, EvidenceItem};

/// Synchronous, total analysis of a single evidence item.
pub trait Analyzer {
    /// Produce a complete result. Never fails.
    fn analyze(&self, evidence: &EvidenceItem) -> AnalysisResult;
}

/// Keyword-signal analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForensicAnalyzer;

impl ForensicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze and also return the underlying assessment.
    pub fn assess_item(&self, evidence: &EvidenceItem) -> (Assessment, AnalysisResult) {
        let assessment = assess(&evidence.content);

        tracing::debug!(
            evidence_id = %evidence.id,
            score = assessment.score,
            tier = %assessment.tier,
            hits = assessment.hits.len(),
            "Evidence scored"
        );

        let result = AnalysisResult {
            summary: build_summary(evidence, assessment.tier),
            liability: build_liability(assessment.tier, &assessment.hits),
            reasoning: build_reasoning(evidence, &assessment.hits, assessment.tier),
            statutes: build_statutes(evidence.evidence_type, &assessment.hits),
        };

        (assessment, result)
    }
}

impl Analyzer for ForensicAnalyzer {
    fn analyze(&self, evidence: &EvidenceItem) -> AnalysisResult {
        self.assess_item(evidence).1
    }
}
