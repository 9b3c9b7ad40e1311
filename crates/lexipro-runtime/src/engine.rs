//! Pluggable analysis engines.
//!
//! Every engine implements [`AnalysisEngine`] and is total: whatever goes
//! wrong inside, the caller gets a complete [`AnalysisResult`].
//!
//! - [`DeterministicEngine`]: keyword scorer, with an optional pause
//! - [`LiveEngine`]: generative model, schema-checked, with a fallback

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

use lexipro_core::{
    validate_analysis_result_schema, Analyzer, AnalysisResult, EvidenceItem, ForensicAnalyzer,
};

use crate::cache::{AnalysisCache, CacheKey};
use crate::config::{EngineKind, LiveConfig, RuntimeConfig};
use crate::fallback::FallbackStrategy;
use crate::prompts::{build_analysis_prompt, FORENSIC_SYSTEM_PROMPT};
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};
use crate::RuntimeError;

lazy_static! {
    /// A fenced code block, optionally tagged `json`.
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
}

/// An interchangeable analysis strategy.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Analyze one item. Never fails.
    async fn analyze(&self, evidence: &EvidenceItem) -> AnalysisResult;

    /// Engine name for logs and CLI output.
    fn name(&self) -> &str;
}

/// Analyze a batch concurrently; results keep input order.
pub async fn analyze_all(
    engine: &dyn AnalysisEngine,
    items: &[EvidenceItem],
) -> Vec<AnalysisResult> {
    futures::future::join_all(items.iter().map(|item| engine.analyze(item))).await
}

/// Offline keyword-signal engine.
#[derive(Debug, Clone)]
pub struct DeterministicEngine {
    analyzer: ForensicAnalyzer,
    delay: Duration,
}

impl DeterministicEngine {
    /// Create an engine that pauses `delay` before answering.
    pub fn new(delay: Duration) -> Self {
        Self {
            analyzer: ForensicAnalyzer::new(),
            delay,
        }
    }

    /// Engine with no artificial pause.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for DeterministicEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl AnalysisEngine for DeterministicEngine {
    async fn analyze(&self, evidence: &EvidenceItem) -> AnalysisResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.analyzer.analyze(evidence)
    }

    fn name(&self) -> &str {
        "deterministic"
    }
}

/// Engine backed by a generative model.
pub struct LiveEngine {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    fallback: FallbackStrategy,
    cache: Option<AnalysisCache>,
}

impl LiveEngine {
    /// Create an engine from a provider and live settings.
    pub fn new(provider: Arc<dyn LlmProvider>, config: &LiveConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| AnalysisCache::new(config.cache.max_entries, config.cache.ttl));

        Self {
            provider,
            completion: config.completion_config(),
            fallback: config.fallback,
            cache,
        }
    }

    /// Replace the fallback strategy.
    pub fn with_fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Call the model and accept its answer only if it is a valid result.
    async fn try_analyze(&self, evidence: &EvidenceItem) -> Result<AnalysisResult, RuntimeError> {
        let messages = vec![
            ChatMessage::system(FORENSIC_SYSTEM_PROMPT),
            ChatMessage::user(build_analysis_prompt(evidence)),
        ];

        let timeout = self.completion.timeout;
        let response = tokio::time::timeout(timeout, self.provider.complete(messages, &self.completion))
            .await
            .map_err(|_| RuntimeError::Timeout(timeout))??;

        tracing::debug!(
            evidence_id = %evidence.id,
            model = %response.model,
            tokens = response.usage.total(),
            "Live analysis response received"
        );

        parse_analysis(&response.content)
    }
}

#[async_trait]
impl AnalysisEngine for LiveEngine {
    async fn analyze(&self, evidence: &EvidenceItem) -> AnalysisResult {
        let key = CacheKey::new(evidence, &self.completion.model);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::info!(evidence_id = %evidence.id, "Live analysis served from cache");
                return hit;
            }
        }

        match self.try_analyze(evidence).await {
            Ok(result) => {
                if let Some(cache) = &self.cache {
                    cache.insert(key, result.clone()).await;
                }
                result
            }
            Err(e) => {
                tracing::error!(
                    evidence_id = %evidence.id,
                    provider = self.provider.name(),
                    error = %e,
                    fallback = ?self.fallback,
                    "Live analysis failed"
                );
                self.fallback.resolve(evidence)
            }
        }
    }

    fn name(&self) -> &str {
        "live"
    }
}

/// Pull the JSON object out of model text, validate it, deserialize it.
///
/// Accepts bare JSON or JSON wrapped in a fenced code block.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, RuntimeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RuntimeError::EmptyResponse);
    }

    let body = FENCED_BLOCK
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| RuntimeError::MalformedResponse(e.to_string()))?;

    validate_analysis_result_schema(&value).map_err(RuntimeError::InvalidResponse)?;

    serde_json::from_value(value).map_err(|e| RuntimeError::MalformedResponse(e.to_string()))
}

/// Build the engine selected by `config`.
pub fn build_engine(config: &RuntimeConfig) -> Result<Arc<dyn AnalysisEngine>, RuntimeError> {
    match config.engine {
        EngineKind::Deterministic => Ok(Arc::new(DeterministicEngine::new(config.delay))),
        EngineKind::Live => {
            let provider = build_provider(&config.live)?;
            Ok(Arc::new(LiveEngine::new(provider, &config.live)))
        }
    }
}

fn build_provider(config: &LiveConfig) -> Result<Arc<dyn LlmProvider>, RuntimeError> {
    match config.provider.as_str() {
        #[cfg(feature = "gemini")]
        "gemini" => Ok(Arc::new(crate::providers::GeminiProvider::from_config(config)?)),
        other => Err(RuntimeError::ProviderNotConfigured(format!(
            "unknown or disabled provider '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::interrupted_result;
    use crate::providers::{CompletionResponse, ProviderError, TokenUsage};
    use lexipro_core::Dossier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MODEL_JSON: &str = r#"{
        "summary": "Attending unreachable during hypotensive episode.",
        "liability": "High Risk: Failure to Rescue",
        "reasoning": "02:15 pages unanswered while BP 90/60 and HR 115.",
        "statutes": ["Failure to Rescue", "Standard of Care: escalation"]
    }"#;

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct MockProvider {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(CompletionResponse {
                    content: text.to_string(),
                    usage: TokenUsage::default(),
                    model: config.model.clone(),
                    stop_reason: Some("STOP".to_string()),
                }),
                Reply::Fail => Err(ProviderError::HttpError("connection refused".to_string())),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ProviderError::HttpError("unreachable".to_string()))
                }
            }
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn live(provider: Arc<MockProvider>, cache: bool) -> LiveEngine {
        let mut config = LiveConfig::default();
        config.cache.enabled = cache;
        config.timeout = Duration::from_secs(5);
        LiveEngine::new(provider, &config)
    }

    fn seed(id: &str) -> EvidenceItem {
        Dossier::demo().get(id).unwrap().clone()
    }

    #[tokio::test]
    async fn test_deterministic_engine_matches_core() {
        let engine = DeterministicEngine::immediate();
        let item = seed("EV-001");
        assert_eq!(engine.analyze(&item).await, lexipro_core::analyze(&item));
        assert_eq!(engine.name(), "deterministic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deterministic_engine_waits_for_delay() {
        let engine = DeterministicEngine::new(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        engine.analyze(&seed("EV-002")).await;
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_live_engine_accepts_valid_json() {
        let engine = live(MockProvider::new(Reply::Text(MODEL_JSON)), false);
        let result = engine.analyze(&seed("EV-001")).await;
        assert_eq!(result.liability, "High Risk: Failure to Rescue");
        assert_eq!(result.statutes.len(), 2);
    }

    #[tokio::test]
    async fn test_live_engine_provider_failure_is_interrupted() {
        let engine = live(MockProvider::new(Reply::Fail), false);
        let result = engine.analyze(&seed("EV-001")).await;
        assert_eq!(result, interrupted_result());
    }

    #[tokio::test]
    async fn test_live_engine_malformed_json_is_interrupted() {
        let engine = live(MockProvider::new(Reply::Text("I cannot help with that.")), false);
        assert_eq!(engine.analyze(&seed("EV-002")).await, interrupted_result());
    }

    #[tokio::test]
    async fn test_live_engine_missing_field_is_interrupted() {
        let engine = live(
            MockProvider::new(Reply::Text(r#"{"summary": "s", "liability": "l"}"#)),
            false,
        );
        assert_eq!(engine.analyze(&seed("EV-002")).await, interrupted_result());
    }

    #[tokio::test]
    async fn test_live_engine_deterministic_fallback() {
        let engine = live(MockProvider::new(Reply::Fail), false)
            .with_fallback(FallbackStrategy::Deterministic);
        let item = seed("EV-004");
        assert_eq!(engine.analyze(&item).await, lexipro_core::analyze(&item));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_engine_timeout_falls_back() {
        let engine = live(MockProvider::new(Reply::Hang), false);
        assert_eq!(engine.analyze(&seed("EV-001")).await, interrupted_result());
    }

    #[tokio::test]
    async fn test_live_engine_caches_success() {
        let provider = MockProvider::new(Reply::Text(MODEL_JSON));
        let engine = live(provider.clone(), true);
        let item = seed("EV-001");

        let first = engine.analyze(&item).await;
        let second = engine.analyze(&item).await;

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_live_engine_does_not_cache_failures() {
        let provider = MockProvider::new(Reply::Fail);
        let engine = live(provider.clone(), true);
        let item = seed("EV-001");

        engine.analyze(&item).await;
        engine.analyze(&item).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_analyze_all_keeps_order() {
        let engine = DeterministicEngine::immediate();
        let dossier = Dossier::demo();
        let results = analyze_all(&engine, dossier.items()).await;

        assert_eq!(results.len(), 3);
        for (item, result) in dossier.items().iter().zip(&results) {
            assert!(result.summary.contains(&item.id));
        }
    }

    #[test]
    fn test_parse_analysis_fenced_block() {
        let text = format!("Here is the analysis:\n```json\n{}\n```", MODEL_JSON);
        let result = parse_analysis(&text).unwrap();
        assert_eq!(result.summary, "Attending unreachable during hypotensive episode.");
    }

    #[test]
    fn test_parse_analysis_errors() {
        assert!(matches!(parse_analysis("  "), Err(RuntimeError::EmptyResponse)));
        assert!(matches!(
            parse_analysis("{not json"),
            Err(RuntimeError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"summary": "s", "liability": "l", "reasoning": "r", "statutes": "x"}"#),
            Err(RuntimeError::InvalidResponse(_))
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_parse_analysis_is_total(text in ".{0,300}") {
            // Arbitrary model text yields Ok or Err, never a panic
            let _ = parse_analysis(&text);
        }
    }

    #[test]
    fn test_build_engine_deterministic_by_default() {
        let engine = build_engine(&RuntimeConfig::default()).unwrap();
        assert_eq!(engine.name(), "deterministic");
    }

    #[test]
    fn test_build_engine_unknown_provider() {
        let mut config = RuntimeConfig::default();
        config.engine = EngineKind::Live;
        config.live.provider = "carrier-pigeon".to_string();
        assert!(matches!(
            build_engine(&config),
            Err(RuntimeError::ProviderNotConfigured(_))
        ));
    }

    #[cfg(feature = "gemini")]
    #[test]
    fn test_build_engine_live_reads_configured_key_envs() {
        let mut config = RuntimeConfig::default();
        config.engine = EngineKind::Live;
        config.live.api_key_env = vec!["LEXIPRO_TEST_UNSET_GEMINI_KEY".to_string()];

        match build_engine(&config) {
            Err(RuntimeError::Provider(ProviderError::NotConfigured(msg))) => {
                assert!(msg.contains("LEXIPRO_TEST_UNSET_GEMINI_KEY"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(engine) => panic!("built {} engine without a key", engine.name()),
        }
    }
}
