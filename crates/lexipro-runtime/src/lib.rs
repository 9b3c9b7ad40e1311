//! # lexipro-runtime
//!
//! Pluggable analysis engines for LexiPro.
//!
//! `lexipro-core` owns the deterministic scorer. This crate puts it and an
//! optional generative-model analysis behind one async interface,
//! [`AnalysisEngine`], so callers pick a single explicit strategy:
//!
//! - [`DeterministicEngine`]: the keyword scorer, with a configurable pause
//! - [`LiveEngine`]: a model call whose answer is schema-checked; any
//!   failure is replaced by the configured [`FallbackStrategy`]
//!
//! Engines never return errors. Errors in this crate only surface while
//! building an engine (unknown provider, missing API key).
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexipro_runtime::{build_engine, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_yaml_file("lexipro.yaml")?;
//! let engine = build_engine(&config)?;
//! let result = engine.analyze(&item).await;
//! ```

use std::time::Duration;
use thiserror::Error;

pub mod cache;
pub mod config;
pub mod engine;
pub mod fallback;
pub mod prompts;
pub mod providers;

pub use cache::{AnalysisCache, CacheKey};
pub use config::{CacheConfig, ConfigError, EngineKind, LiveConfig, RuntimeConfig};
pub use engine::{
    analyze_all, build_engine, parse_analysis, AnalysisEngine, DeterministicEngine, LiveEngine,
};
pub use fallback::{interrupted_result, FallbackStrategy};
pub use providers::{LlmProvider, ProviderError};

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Model response failed schema validation: {}", .0.join("; "))]
    InvalidResponse(Vec<String>),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}
