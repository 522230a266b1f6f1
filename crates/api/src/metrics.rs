use analysis::AnalysisMethod;
use pipeline::AnalysisRun;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub struct Metrics {
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Per analysis method
    openai_analyses: AtomicUsize,
    mistral_analyses: AtomicUsize,
    rule_based_analyses: AtomicUsize,
    fallbacks: AtomicUsize,

    cache_hits: AtomicUsize,
    chunked_analyses: AtomicUsize,
    total_chunks_analyzed: AtomicUsize,
    total_chunks_failed: AtomicUsize,
    total_analysis_time_us: AtomicU64,
    timed_analyses: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            openai_analyses: AtomicUsize::new(0),
            mistral_analyses: AtomicUsize::new(0),
            rule_based_analyses: AtomicUsize::new(0),
            fallbacks: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            chunked_analyses: AtomicUsize::new(0),
            total_chunks_analyzed: AtomicUsize::new(0),
            total_chunks_failed: AtomicUsize::new(0),
            total_analysis_time_us: AtomicU64::new(0),
            timed_analyses: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_analysis(&self, run: &AnalysisRun) {
        let counter = match run.outcome.analysis_method {
            AnalysisMethod::OpenAi => &self.openai_analyses,
            AnalysisMethod::MistralAi => &self.mistral_analyses,
            AnalysisMethod::EnhancedRuleBased => &self.rule_based_analyses,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if run.outcome.is_fallback() {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        // Chunked by attempts, not successes
        if run.chunks_analyzed + run.chunks_failed > 1 {
            self.chunked_analyses.fetch_add(1, Ordering::Relaxed);
        }
        self.total_chunks_analyzed
            .fetch_add(run.chunks_analyzed, Ordering::Relaxed);
        self.total_chunks_failed
            .fetch_add(run.chunks_failed, Ordering::Relaxed);
        self.total_analysis_time_us
            .fetch_add(run.elapsed.as_micros() as u64, Ordering::Relaxed);
        self.timed_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let timed = self.timed_analyses.load(Ordering::Relaxed);
        let total_us = self.total_analysis_time_us.load(Ordering::Relaxed) as f64;

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            analyses_by_method: MethodCounts {
                openai: self.openai_analyses.load(Ordering::Relaxed),
                mistral_ai: self.mistral_analyses.load(Ordering::Relaxed),
                enhanced_rule_based: self.rule_based_analyses.load(Ordering::Relaxed),
            },
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            chunked_analyses: self.chunked_analyses.load(Ordering::Relaxed),
            total_chunks_analyzed: self.total_chunks_analyzed.load(Ordering::Relaxed),
            total_chunks_failed: self.total_chunks_failed.load(Ordering::Relaxed),
            avg_analysis_time_ms: if timed > 0 {
                total_us / timed as f64 / 1000.0
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodCounts {
    pub openai: usize,
    pub mistral_ai: usize,
    pub enhanced_rule_based: usize,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub analyses_by_method: MethodCounts,
    pub fallbacks: usize,
    pub cache_hits: usize,
    pub chunked_analyses: usize,
    pub total_chunks_analyzed: usize,
    pub total_chunks_failed: usize,
    pub avg_analysis_time_ms: f64,
}
