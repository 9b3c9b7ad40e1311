//! Keyword signal table for evidence risk scoring.
//!
//! Each rule is a (label, pattern, weight) triple. Rules are evaluated
//! independently against the lower-cased evidence text; every matching
//! rule adds its weight to the score and its label to the hit list.
//! Table order is the order hits are reported in.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::{Assessment, RiskTier};

/// A named risk signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    DelayFailureToRespond,
    DeterioratingVitals,
    DocumentationCredibility,
    ProtocolStaffing,
    EscalationChainOfCommand,
}

impl Signal {
    /// Display label used in reasoning output.
    pub fn label(&self) -> &'static str {
        match self {
            Signal::DelayFailureToRespond => "Delay / Failure to Respond",
            Signal::DeterioratingVitals => "Deteriorating Vitals",
            Signal::DocumentationCredibility => "Documentation / Credibility",
            Signal::ProtocolStaffing => "Protocol / Staffing",
            Signal::EscalationChainOfCommand => "Escalation / Chain of Command",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One entry of the signal table.
pub struct SignalRule {
    pub signal: Signal,
    pub pattern: &'static Regex,
    pub weight: u32,
}

impl fmt::Debug for SignalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRule")
            .field("signal", &self.signal)
            .field("pattern", &self.pattern.as_str())
            .field("weight", &self.weight)
            .finish()
    }
}

lazy_static! {
    // =========================================================================
    // SIGNAL PATTERNS
    // =========================================================================

    /// Unanswered pages, ignored calls, unavailable clinicians
    pub static ref DELAY_PATTERN: Regex = Regex::new(
        r"(?i)(no response|paged twice|ignored|unavailable|did not respond)"
    ).unwrap();

    /// Charted blood pressure / heart rate, hypotension, tachycardia
    pub static ref VITALS_PATTERN: Regex = Regex::new(
        r"(?i)(bp\s*[0-9]{2,3}\s*/\s*[0-9]{2,3}|hr\s*[0-9]{2,3}|hypotens|tachycard)"
    ).unwrap();

    /// Failed recollection and off-channel routing
    pub static ref CREDIBILITY_PATTERN: Regex = Regex::new(
        r"(?i)(do not recall|can't recall|battery.*dead|off the main channel|keep this off)"
    ).unwrap();

    /// Staffing ratios and policy breaches
    pub static ref STAFFING_PATTERN: Regex = Regex::new(
        r"(?i)(below protocol|ratio.*below|staffing|policy violation)"
    ).unwrap();

    /// Chain-of-command references
    pub static ref ESCALATION_PATTERN: Regex = Regex::new(
        r"(?i)(charge nurse|supervisor|rapid response|code|escalat)"
    ).unwrap();

    /// The ordered signal table.
    pub static ref SIGNAL_TABLE: [SignalRule; 5] = [
        SignalRule { signal: Signal::DelayFailureToRespond, pattern: &DELAY_PATTERN, weight: 3 },
        SignalRule { signal: Signal::DeterioratingVitals, pattern: &VITALS_PATTERN, weight: 3 },
        SignalRule { signal: Signal::DocumentationCredibility, pattern: &CREDIBILITY_PATTERN, weight: 2 },
        SignalRule { signal: Signal::ProtocolStaffing, pattern: &STAFFING_PATTERN, weight: 2 },
        SignalRule { signal: Signal::EscalationChainOfCommand, pattern: &ESCALATION_PATTERN, weight: 1 },
    ];
}

/// Sum the weights of every rule matching `text` and collect their signals.
pub fn score_signals(text: &str) -> (u32, Vec<Signal>) {
    let lowered = text.to_lowercase();

    let mut score = 0;
    let mut hits = Vec::new();
    for rule in SIGNAL_TABLE.iter() {
        if rule.pattern.is_match(&lowered) {
            score += rule.weight;
            hits.push(rule.signal);
        }
    }

    (score, hits)
}

/// Score `text` and classify it.
pub fn assess(text: &str) -> Assessment {
    let (score, hits) = score_signals(text);
    Assessment {
        score,
        tier: RiskTier::from_score(score),
        hits,
    }
}

/// Largest score the table can produce.
pub fn max_score() -> u32 {
    SIGNAL_TABLE.iter().map(|r| r.weight).sum()
}
