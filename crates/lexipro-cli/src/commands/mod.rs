//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lexipro_runtime::{build_engine, AnalysisEngine, EngineKind, RuntimeConfig};

pub mod analyze;
pub mod demo;
pub mod signals;

/// LexiPro - forensic evidence risk analysis
#[derive(Parser, Debug)]
#[command(name = "lexipro")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one evidence file or a piece of text
    Analyze(analyze::AnalyzeArgs),

    /// Analyze every item in the seed dossier
    Demo(demo::DemoArgs),

    /// Print the keyword signal table
    Signals,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineChoice {
    Deterministic,
    Live,
}

impl From<EngineChoice> for EngineKind {
    fn from(choice: EngineChoice) -> Self {
        match choice {
            EngineChoice::Deterministic => EngineKind::Deterministic,
            EngineChoice::Live => EngineKind::Live,
        }
    }
}

/// Engine selection shared by the analysis commands.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Analysis engine (overrides the config file)
    #[arg(long, value_enum)]
    pub engine: Option<EngineChoice>,

    /// Runtime configuration file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the deterministic engine's artificial pause
    #[arg(long)]
    pub no_delay: bool,
}

impl EngineArgs {
    /// Resolve the runtime configuration: file first, then flag overrides.
    pub fn runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RuntimeConfig::default(),
        };

        if let Some(engine) = self.engine {
            config.engine = engine.into();
        }
        if self.no_delay {
            config.delay = Duration::ZERO;
        }

        Ok(config)
    }

    pub fn build(&self) -> Result<Arc<dyn AnalysisEngine>> {
        let config = self.runtime_config()?;
        let engine = build_engine(&config).context("Failed to build analysis engine")?;
        tracing::debug!(engine = engine.name(), "Analysis engine ready");
        Ok(engine)
    }
}

fn load_config(path: &Path) -> Result<RuntimeConfig> {
    RuntimeConfig::from_yaml_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::execute(args, self.format).await,
            Commands::Demo(args) => demo::execute(args, self.format).await,
            Commands::Signals => signals::execute(self.format),
        }
    }
}
