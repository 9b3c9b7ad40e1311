//! `lexipro analyze`: score one evidence file or a piece of text.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;

use lexipro_core::{Dossier, EvidenceItem, EvidenceType};

use super::{EngineArgs, OutputFormat};
use crate::output;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Evidence item file (.json, .yaml or .yml)
    #[arg(long, conflicts_with = "content", required_unless_present = "content")]
    pub file: Option<PathBuf>,

    /// Raw evidence text to ingest
    #[arg(long)]
    pub content: Option<String>,

    /// Evidence type for --content
    #[arg(long = "type", default_value = "Medical Record", conflicts_with = "file")]
    pub evidence_type: String,

    /// Identifier for --content (defaults to the next EV-NNN)
    #[arg(long, conflicts_with = "file")]
    pub id: Option<String>,

    /// Title for --content (defaults to "Ingested <type>")
    #[arg(long, conflicts_with = "file")]
    pub title: Option<String>,

    /// Timestamp for --content (defaults to now)
    #[arg(long, conflicts_with = "file")]
    pub timestamp: Option<String>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

pub async fn execute(args: AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let item = load_item(&args)?;
    let engine = args.engine.build()?;

    tracing::info!(evidence_id = %item.id, engine = engine.name(), "Analyzing evidence");
    let result = engine.analyze(&item).await;

    let report = output::Report::new(&item, engine.name(), result);
    match format {
        OutputFormat::Text => output::print_report(&report),
        OutputFormat::Json => output::print_json(&report)?,
    }

    Ok(())
}

/// Build the evidence item from `--file` or from `--content` and its options.
fn load_item(args: &AnalyzeArgs) -> Result<EvidenceItem> {
    if let Some(path) = &args.file {
        return EvidenceItem::from_file(path)
            .with_context(|| format!("Failed to load evidence from {}", path.display()));
    }

    let content = args
        .content
        .as_deref()
        .ok_or_else(|| anyhow!("either --file or --content is required"))?;

    let evidence_type: EvidenceType = args.evidence_type.parse().map_err(|e: String| anyhow!(e))?;

    let mut dossier = Dossier::new();
    let ingested = match &args.timestamp {
        Some(ts) => dossier.ingest_at(evidence_type, content, ts.clone()),
        None => dossier.ingest(evidence_type, content),
    }
    .context("Failed to ingest evidence")?;

    let mut item = ingested.clone();
    if let Some(id) = &args.id {
        item.id = id.clone();
    }
    if let Some(title) = &args.title {
        item.title = title.clone();
    }
    item.validate().context("Invalid evidence")?;

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_args(content: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            file: None,
            content: Some(content.to_string()),
            evidence_type: "Deposition".to_string(),
            id: None,
            title: None,
            timestamp: Some("2023-10-15 10:00 AM".to_string()),
            engine: EngineArgs::default(),
        }
    }

    #[test]
    fn test_content_is_ingested_with_defaults() {
        let item = load_item(&content_args("I do not recall the page.")).unwrap();

        assert_eq!(item.id, "EV-001");
        assert_eq!(item.title, "Ingested Deposition");
        assert_eq!(item.evidence_type, EvidenceType::Deposition);
        assert_eq!(item.timestamp, "2023-10-15 10:00 AM");
        assert_eq!(item.risk_score, 5);
    }

    #[test]
    fn test_id_and_title_overrides() {
        let mut args = content_args("Short staffed on nights.");
        args.id = Some("CASE-7".to_string());
        args.title = Some("Night Shift Email".to_string());

        let item = load_item(&args).unwrap();
        assert_eq!(item.id, "CASE-7");
        assert_eq!(item.title, "Night Shift Email");
    }

    #[test]
    fn test_blank_content_rejected() {
        assert!(load_item(&content_args("   ")).is_err());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut args = content_args("text");
        args.evidence_type = "Voicemail".to_string();
        assert!(load_item(&args).is_err());
    }

    #[test]
    fn test_blank_id_override_rejected() {
        let mut args = content_args("text");
        args.id = Some("  ".to_string());
        assert!(load_item(&args).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let args = AnalyzeArgs {
            file: Some(PathBuf::from("/nonexistent/item.json")),
            ..content_args("unused")
        };
        let err = load_item(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/item.json"));
    }
}
