//! Terminal output formatting.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use lexipro_core::{assess, AnalysisResult, Assessment, EvidenceItem, RiskTier};

/// One analyzed item, as printed by `analyze` and `demo`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub evidence_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub evidence_type: String,
    pub timestamp: String,
    pub engine: String,
    /// Keyword signals found in the content, whichever engine ran
    pub signals: Assessment,
    pub analysis: AnalysisResult,
}

impl Report {
    pub fn new(item: &EvidenceItem, engine: &str, analysis: AnalysisResult) -> Self {
        Self {
            evidence_id: item.id.clone(),
            title: item.title.clone(),
            evidence_type: item.evidence_type.to_string(),
            timestamp: item.timestamp.clone(),
            engine: engine.to_string(),
            signals: assess(&item.content),
            analysis,
        }
    }
}

fn tier_colored(tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::High => tier.as_str().red().bold(),
        RiskTier::Medium => tier.as_str().yellow(),
        RiskTier::Low => tier.as_str().green(),
    }
}

/// Print a single report.
pub fn print_report(report: &Report) {
    println!(
        "{} {}",
        report.title.cyan().bold(),
        format!("({})", report.evidence_id).dimmed()
    );
    println!("{}", "─".repeat(60));
    println!("  Type:      {}", report.evidence_type);
    println!("  Timestamp: {}", report.timestamp);
    println!("  Engine:    {}", report.engine);
    println!(
        "  Signals:   {} (score {}, tier {})",
        if report.signals.is_baseline() {
            "none".dimmed().to_string()
        } else {
            report
                .signals
                .hits
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", ")
        },
        report.signals.score,
        tier_colored(report.signals.tier)
    );
    println!();

    println!("{}", "Summary".bold());
    println!("  {}", report.analysis.summary);
    println!();

    println!("{}: {}", "Liability".bold(), report.analysis.liability);
    println!();

    println!("{}", "Statutes".bold());
    for (i, statute) in report.analysis.statutes.iter().enumerate() {
        println!("  {}. {}", i + 1, statute);
    }
    println!();

    println!("{}", "Reasoning".bold());
    for line in report.analysis.reasoning.lines() {
        println!("  {}", line);
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
