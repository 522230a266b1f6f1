pub mod chunk;
pub mod chunker;
pub mod fetcher;
pub mod html;
pub mod reader;
pub mod retry;

pub use chunk::Chunk;
pub use chunker::{Chunker, ChunkerConfig, split};
pub use fetcher::{DocumentFetcher, FetchError, HttpFetcher};
pub use reader::FileReader;
pub use retry::RetryPolicy;

use sha2::{Digest, Sha256};

/// Generate a stable document ID from a URL, path or the text itself
pub fn generate_doc_id(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// Estimate token count (rough: 4 characters per token, rounded up)
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => &text[..byte_pos],
        None => text,
    }
}
