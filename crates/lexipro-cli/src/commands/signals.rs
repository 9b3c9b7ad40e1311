//! `lexipro signals`: print the keyword signal table.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use lexipro_core::{RiskTier, SIGNAL_TABLE};

use super::OutputFormat;
use crate::output;

#[derive(Serialize)]
struct SignalRow {
    signal: &'static str,
    weight: u32,
    pattern: &'static str,
}

fn rows() -> Vec<SignalRow> {
    SIGNAL_TABLE
        .iter()
        .map(|rule| SignalRow {
            signal: rule.signal.label(),
            weight: rule.weight,
            pattern: rule.pattern.as_str(),
        })
        .collect()
}

pub fn execute(format: OutputFormat) -> Result<()> {
    let rows = rows();

    match format {
        OutputFormat::Json => output::print_json(&rows)?,
        OutputFormat::Text => {
            println!("{:<28} {:>6}  {}", "Signal".bold(), "Weight".bold(), "Pattern".bold());
            println!("{}", "─".repeat(80));
            for row in &rows {
                println!("{:<28} {:>6}  {}", row.signal, row.weight, row.pattern.dimmed());
            }
            println!("{}", "─".repeat(80));
            println!(
                "Tiers: High >= {}, Medium >= {}, Low otherwise",
                RiskTier::HIGH_THRESHOLD,
                RiskTier::MEDIUM_THRESHOLD
            );
        }
    }

    Ok(())
}
