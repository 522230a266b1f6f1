use ingest::estimate_tokens;
use std::time::Duration;

/// Characters per token assumed when sizing chunks.
const CHARS_PER_TOKEN: f64 = 3.5;

/// Decides between one provider call and a chunked run, and caps how much
/// text each call may carry.
#[derive(Debug, Clone)]
pub struct SizePolicy {
    pub single_call_token_budget: usize,
    /// Hard cap on characters sent in a single-call analysis.
    pub single_call_char_cap: usize,
    /// Hard cap on characters sent per chunk.
    pub chunk_char_cap: usize,
    pub chunk_delay: Duration,
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            single_call_token_budget: 12_000,
            single_call_char_cap: 48_000,
            chunk_char_cap: 40_000,
            chunk_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPlan {
    Single,
    Chunked { chunk_chars: usize },
}

impl SizePolicy {
    pub fn chunk_budget_chars(&self) -> usize {
        ((self.single_call_token_budget as f64 * CHARS_PER_TOKEN) as usize).max(1)
    }

    pub fn plan(&self, text: &str) -> AnalysisPlan {
        if estimate_tokens(text) <= self.single_call_token_budget {
            AnalysisPlan::Single
        } else {
            AnalysisPlan::Chunked {
                chunk_chars: self.chunk_budget_chars(),
            }
        }
    }
}
