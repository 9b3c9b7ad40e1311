//! Narrative builders: turn an assessment into the four result fields.
//!
//! Everything here is formatting over already-computed data. No scoring
//! happens in this module.

use crate::signals::Signal;
use crate::types::{EvidenceItem, EvidenceType, RiskTier};

/// Minimum number of statutes in a result.
pub const MIN_STATUTES: usize = 2;

/// Maximum number of statutes in a result.
pub const MAX_STATUTES: usize = 3;

/// Padding statute used when too few signal/type phrases apply.
pub const GENERIC_STATUTE: &str =
    "Clinical Governance: escalation pathways & documentation standards";

/// Marker reported when no signal fired.
pub const BASELINE_MARKER: &str = "None (baseline node)";

/// Signal-conditioned statutes, in priority order.
const SIGNAL_STATUTES: [(Signal, &str); 4] = [
    (
        Signal::DelayFailureToRespond,
        "Failure to Rescue / Delay in Treatment (clinical escalation standard)",
    ),
    (
        Signal::DeterioratingVitals,
        "Standard of Care: recognition & response to hemodynamic instability",
    ),
    (
        Signal::ProtocolStaffing,
        "Policy Compliance: staffing ratio / coverage protocol adherence",
    ),
    (
        Signal::DocumentationCredibility,
        "Impeachment / Credibility: inconsistent recollection & record variance",
    ),
];

const VERIFICATION_STEPS: [&str; 3] = [
    "1) Confirm the statement against primary source lines (EHR, transcript, or original email headers).",
    "2) Validate chronology: align timestamps with staffing rosters, pager logs, and vitals trending.",
    "3) If contradictions exist, preserve them as anchored deltas for impeachment/causation analysis.",
];

/// Statute tied to the kind of evidence, if any.
fn type_statute(evidence_type: EvidenceType) -> Option<&'static str> {
    match evidence_type {
        EvidenceType::Email => {
            Some("Spoliation Risk Indicators: informal routing / off-channel communications")
        }
        EvidenceType::Deposition => {
            Some("Testimony Consistency: recollection vs contemporaneous notes")
        }
        EvidenceType::MedicalRecord => Some("Charting Integrity: time-stamped note correlation"),
        EvidenceType::LabResult => None,
    }
}

/// Pick the liability phrase for a tier and its hits.
pub fn build_liability(tier: RiskTier, hits: &[Signal]) -> String {
    let phrase = match tier {
        RiskTier::High => {
            if hits.contains(&Signal::DelayFailureToRespond)
                && hits.contains(&Signal::DeterioratingVitals)
            {
                "High Risk: Delay in treatment during patient deterioration."
            } else if hits.contains(&Signal::DocumentationCredibility) {
                "High Risk: Credibility gap between testimony and contemporaneous records."
            } else {
                "High Risk: Multiple adverse signals present in the record."
            }
        }
        RiskTier::Medium => "Moderate Risk: Escalation / protocol questions require verification.",
        RiskTier::Low => {
            "Lower Risk: Limited adverse indicators; verify against full chart and timeline."
        }
    };
    phrase.to_string()
}

/// Assemble 2-3 statutes: signal phrases first, then the type phrase, then padding.
pub fn build_statutes(evidence_type: EvidenceType, hits: &[Signal]) -> Vec<String> {
    let mut statutes: Vec<String> = SIGNAL_STATUTES
        .iter()
        .filter(|(signal, _)| hits.contains(signal))
        .map(|(_, statute)| statute.to_string())
        .collect();

    if let Some(statute) = type_statute(evidence_type) {
        statutes.push(statute.to_string());
    }

    while statutes.len() < MIN_STATUTES {
        statutes.push(GENERIC_STATUTE.to_string());
    }

    statutes.truncate(MAX_STATUTES);
    statutes
}

/// Two-sentence summary naming the item and its tier.
pub fn build_summary(item: &EvidenceItem, tier: RiskTier) -> String {
    format!(
        "This {} entry ({}, {}) contains indicators consistent with a {}-risk discovery node. \
         The marketing demo engine flags it for verification against the underlying record set and case timeline.",
        item.evidence_type.display_name().to_lowercase(),
        item.id,
        item.timestamp,
        tier.as_str().to_lowercase(),
    )
}

/// Line-oriented chain-of-thought block.
pub fn build_reasoning(item: &EvidenceItem, hits: &[Signal], tier: RiskTier) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(9);
    lines.push(format!(
        "NODE_CLASSIFICATION: {}_RISK",
        tier.as_str().to_uppercase()
    ));
    lines.push(format!("INPUT_TYPE: {}", item.evidence_type));
    lines.push(format!("TIMESTAMP: {}", item.timestamp));

    if hits.is_empty() {
        lines.push(format!("SIGNALS_DETECTED: {}", BASELINE_MARKER));
    } else {
        let labels: Vec<&str> = hits.iter().map(Signal::label).collect();
        lines.push(format!("SIGNALS_DETECTED: {}", labels.join(" | ")));
    }

    lines.push("VERIFICATION_PROTOCOL:".to_string());
    lines.extend(VERIFICATION_STEPS.iter().map(|s| s.to_string()));
    lines.push(
        "OUTPUT_CONSTRAINT: Demo mode produces structured findings but does not claim medical or legal conclusions."
            .to_string(),
    );

    lines.join("\n")
}
