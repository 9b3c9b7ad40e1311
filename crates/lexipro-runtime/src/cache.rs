//! Caching layer for live analyses.
//!
//! Identical evidence is answered from memory instead of a second model
//! call. Only successful live results are stored; fallbacks never are.

use moka::future::Cache;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use lexipro_core::{AnalysisResult, EvidenceItem};

/// Cache key: a hash over every evidence field plus the model name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    pub fn new(evidence: &EvidenceItem, model: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        evidence.hash(&mut hasher);
        model.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Analysis cache using moka.
pub struct AnalysisCache {
    cache: Cache<CacheKey, AnalysisResult>,
}

impl AnalysisCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<AnalysisResult> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, result: AnalysisResult) {
        self.cache.insert(key, result).await;
    }
}
