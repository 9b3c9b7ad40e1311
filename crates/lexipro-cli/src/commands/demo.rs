//! `lexipro demo`: analyze the seed dossier.

use anyhow::Result;
use clap::Args;

use lexipro_core::Dossier;
use lexipro_runtime::analyze_all;

use super::{EngineArgs, OutputFormat};
use crate::output::{self, Report};

#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

pub async fn execute(args: DemoArgs, format: OutputFormat) -> Result<()> {
    let engine = args.engine.build()?;
    let dossier = Dossier::demo();

    tracing::info!(items = dossier.len(), engine = engine.name(), "Analyzing seed dossier");
    let results = analyze_all(engine.as_ref(), dossier.items()).await;

    let reports: Vec<Report> = dossier
        .items()
        .iter()
        .zip(results)
        .map(|(item, result)| Report::new(item, engine.name(), result))
        .collect();

    match format {
        OutputFormat::Text => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                output::print_report(report);
            }
        }
        OutputFormat::Json => output::print_json(&reports)?,
    }

    Ok(())
}
