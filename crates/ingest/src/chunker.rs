use crate::chunk::Chunk;

/// A break character must fall past this fraction of the chunk budget to be used.
const BREAK_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    pub max_chars: usize,
}

/// Splits text into contiguous, size-bounded chunks that concatenate back to
/// the original text.
///
/// Chunks prefer to end right after a `.` or `\n` when one sits in the last
/// 30% of the budget window; otherwise the raw budget boundary is used.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self::new(ChunkerConfig { max_chars })
    }

    pub fn max_chars(&self) -> usize {
        self.config.max_chars.max(1)
    }

    pub fn chunk_text(&self, doc_id: &str, text: &str) -> Vec<Chunk> {
        let max_chars = self.max_chars();

        // Byte offset of every char boundary, including the end of the text
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut current_pos = 0;

        while current_pos < total {
            let mut end_pos = (current_pos + max_chars).min(total);

            if end_pos < total {
                if let Some(break_pos) = Self::find_break(text, &bounds, current_pos, end_pos) {
                    let threshold = current_pos as f64 + max_chars as f64 * BREAK_THRESHOLD;
                    if break_pos as f64 > threshold {
                        end_pos = break_pos + 1;
                    }
                }
            }

            let piece = &text[bounds[current_pos]..bounds[end_pos]];
            chunks.push(Chunk::new(
                doc_id.to_string(),
                chunks.len(),
                piece.to_string(),
                (current_pos, end_pos),
            ));

            current_pos = end_pos;
        }

        chunks
    }

    /// Char position of the last `.` or `\n` in `[start, end)`.
    fn find_break(text: &str, bounds: &[usize], start: usize, end: usize) -> Option<usize> {
        let window = &text[bounds[start]..bounds[end]];
        let byte_pos = bounds[start] + window.rfind(['.', '\n'])?;

        bounds[start..end]
            .binary_search(&byte_pos)
            .ok()
            .map(|i| start + i)
    }
}

/// Split `text` into chunk strings of at most `max_chars` characters.
pub fn split(text: &str, max_chars: usize) -> Vec<String> {
    Chunker::with_max_chars(max_chars)
        .chunk_text("", text)
        .into_iter()
        .map(|c| c.text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_chunks_rebuild_text_within_budget(text in "\\PC{0,400}", max in 1usize..64) {
            let chunks = split(&text, max);

            prop_assert_eq!(chunks.concat(), text);
            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.chars().count() <= max);
            }
        }

        #[test]
        fn prop_sentence_text_rebuilds(text in "[a-zé .\n]{0,300}", max in 1usize..48) {
            let chunks = split(&text, max);

            let total = text.chars().count();
            prop_assert_eq!(chunks.concat(), text);
            prop_assert!(chunks.len() >= total.div_ceil(max));
            prop_assert!(chunks.iter().all(|c| c.chars().count() <= max));
        }
    }

    #[test]
    fn test_basic_chunking() {
        let chunker = Chunker::with_max_chars(1000);
        let text = "This is a test paragraph.\n\nThis is another paragraph.";
        let chunks = chunker.chunk_text("test-doc", text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].doc_id, "test-doc");
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].offset, (0, text.chars().count()));
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(split("", 10).is_empty());
    }

    #[test]
    fn test_budget_equal_to_length_is_single_chunk() {
        let text = "abcdefghij";
        assert_eq!(split(text, 10), vec![text.to_string()]);
    }

    #[test]
    fn test_round_trip_reproduces_text() {
        let text = "Privacy matters. We collect data.\nWe share it with partners. \
                    Contact us at privacy@example.com for details. No breaks here at all \
                    just a long run of words without terminators";

        for max in [1, 3, 7, 16, 25, 40, 100, 1000] {
            let chunks = split(text, max);
            assert_eq!(chunks.concat(), text, "max_chars = {max}");
            assert!(chunks.iter().all(|c| c.chars().count() <= max));
        }
    }

    #[test]
    fn test_snaps_to_sentence_end_in_last_thirty_percent() {
        let chunks = split("abcdefgh.ijklmnop", 10);
        assert_eq!(chunks, vec!["abcdefgh.", "ijklmnop"]);
    }

    #[test]
    fn test_snaps_to_newline() {
        let chunks = split("abcdefgh\nijklmnop", 10);
        assert_eq!(chunks[0], "abcdefgh\n");
    }

    #[test]
    fn test_prefers_later_of_period_and_newline() {
        let chunks = split("abcdef.h\nijklmnop", 10);
        assert_eq!(chunks[0], "abcdef.h\n");
    }

    #[test]
    fn test_early_break_is_ignored() {
        // '.' at position 2 is before the 70% mark, so cut at the raw boundary
        let chunks = split("ab.cdefghijklmnop", 10);
        assert_eq!(chunks[0], "ab.cdefghi");
        assert_eq!(chunks[1], "jklmnop");
    }

    #[test]
    fn test_no_break_characters_uses_raw_boundary() {
        let chunks = split("abcdefghijklmnopqrstuvwxy", 10);
        assert_eq!(chunks, vec!["abcdefghij", "klmnopqrst", "uvwxy"]);
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let text = "Données personnelles é à ü. Über alles—naïve café.";
        let chunks = split(text, 9);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 9));
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let chunker = Chunker::with_max_chars(12);
        let chunks = chunker.chunk_text("doc", "One. Two. Three. Four. Five. Six.");

        assert_eq!(chunks[0].offset.0, 0);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].offset.1, pair[1].offset.0);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }
}
