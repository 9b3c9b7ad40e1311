//! Core data model: evidence items, analysis results, risk tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::signals::Signal;

/// Kind of case material an evidence item represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EvidenceType {
    #[serde(rename = "Medical Record")]
    MedicalRecord,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Deposition")]
    Deposition,
    #[serde(rename = "Lab Result")]
    LabResult,
}

impl EvidenceType {
    /// All evidence types, in display order.
    pub const ALL: [EvidenceType; 4] = [
        EvidenceType::MedicalRecord,
        EvidenceType::Email,
        EvidenceType::Deposition,
        EvidenceType::LabResult,
    ];

    /// Display name as shown in the evidence matrix.
    pub fn display_name(&self) -> &'static str {
        match self {
            EvidenceType::MedicalRecord => "Medical Record",
            EvidenceType::Email => "Email",
            EvidenceType::Deposition => "Deposition",
            EvidenceType::LabResult => "Lab Result",
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for EvidenceType {
    type Err = String;

    /// Accepts the display name or a kebab/snake/compact spelling, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "medicalrecord" => Ok(EvidenceType::MedicalRecord),
            "email" => Ok(EvidenceType::Email),
            "deposition" => Ok(EvidenceType::Deposition),
            "labresult" => Ok(EvidenceType::LabResult),
            _ => Err(format!(
                "unknown evidence type '{}': expected one of Medical Record, Email, Deposition, Lab Result",
                s
            )),
        }
    }
}

/// One discrete piece of case material submitted for analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    /// Opaque identifier, unique within a session (e.g. "EV-001")
    pub id: String,

    /// Display label
    pub title: String,

    /// Kind of material
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,

    /// Display string; never parsed
    pub timestamp: String,

    /// Free text
    pub content: String,

    /// Caller-assigned risk score (1-10); the scorer does not derive it
    pub risk_score: u8,
}

impl EvidenceItem {
    /// Lowest accepted caller risk score.
    pub const MIN_RISK_SCORE: u8 = 1;

    /// Highest accepted caller risk score.
    pub const MAX_RISK_SCORE: u8 = 10;

    /// Create an item with every field supplied.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        evidence_type: EvidenceType,
        timestamp: impl Into<String>,
        content: impl Into<String>,
        risk_score: u8,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            evidence_type,
            timestamp: timestamp.into(),
            content: content.into(),
            risk_score,
        }
    }
}

/// Structured forensic narrative produced for one evidence item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Short narrative
    pub summary: String,

    /// Short risk-tier phrase
    pub liability: String,

    /// Multi-line chain-of-thought narrative
    pub reasoning: String,

    /// Relevant legal/clinical concepts, in priority order
    pub statutes: Vec<String>,
}

/// Three-level risk classification derived from the summed signal weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Score at or above which the tier is `High`.
    pub const HIGH_THRESHOLD: u32 = 6;

    /// Score at or above which the tier is at least `Medium`.
    pub const MEDIUM_THRESHOLD: u32 = 3;

    /// Map a summed signal score to a tier. Boundaries resolve upward.
    pub fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            RiskTier::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring outcome before any narrative is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    /// Sum of matched signal weights
    pub score: u32,

    /// Tier derived from `score`
    pub tier: RiskTier,

    /// Matched signals, in table order
    pub hits: Vec<Signal>,
}

impl Assessment {
    /// Whether the given signal fired.
    pub fn has(&self, signal: Signal) -> bool {
        self.hits.contains(&signal)
    }

    /// True when no signal matched.
    pub fn is_baseline(&self) -> bool {
        self.hits.is_empty()
    }
}
