use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::report::AnalysisReport;

/// Successful reports keyed by the SHA-256 of their source (URL or text).
pub struct ReportCache {
    reports: DashMap<String, AnalysisReport>,
    max_entries: usize,
    enabled: bool,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: usize,
    pub max_entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl ReportCache {
    pub fn new(enabled: bool, max_entries: usize) -> Self {
        Self {
            reports: DashMap::new(),
            max_entries: max_entries.max(1),
            enabled,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, source: &str) -> Option<AnalysisReport> {
        if !self.enabled {
            return None;
        }

        let found = self.reports.get(&hash_source(source)).map(|r| r.value().clone());
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, source: &str, report: AnalysisReport) {
        if !self.enabled {
            return;
        }

        if self.reports.len() >= self.max_entries {
            // Drop a quarter when full
            let to_remove: Vec<_> = self
                .reports
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.reports.remove(&key);
            }
        }
        self.reports.insert(hash_source(source), report);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.enabled,
            entries: self.reports.len(),
            max_entries: self.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn hash_source(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.trim().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::RuleBasedAnalyzer;

    fn report() -> AnalysisReport {
        AnalysisReport::new(None, RuleBasedAnalyzer::new().analyze_tagged("We use cookies."), 15, 1)
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = ReportCache::new(true, 10);
        cache.insert("https://a.test/privacy", report());

        assert!(cache.get("https://a.test/privacy").is_some());
        assert!(cache.get("https://b.test/privacy").is_none());

        let stats = cache.stats();
        assert_eq!((stats.entries, stats.hits, stats.misses), (1, 1, 1));
    }

    #[test]
    fn test_evicts_quarter_when_full() {
        let cache = ReportCache::new(true, 8);
        for i in 0..8 {
            cache.insert(&format!("source-{i}"), report());
        }
        assert_eq!(cache.stats().entries, 8);

        cache.insert("source-8", report());
        assert_eq!(cache.stats().entries, 7);
        assert!(cache.get("source-8").is_some());
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = ReportCache::new(false, 8);
        cache.insert("source", report());

        assert!(cache.get("source").is_none());
        assert_eq!(cache.stats().entries, 0);
    }
}
