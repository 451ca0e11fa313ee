//! Extractive decoder: projects a target vector back into readable text.
//!
//! Decoding is retrieval, not generation. The resume is split into
//! sentences, each sentence is re-embedded through the oracle, and the
//! sentences whose embeddings sit closest to the target vector are stitched
//! back together **in document order**: narrative flow wins over similarity
//! rank in the visible output.
//!
//! Every decode call re-embeds every sentence, one oracle call per sentence,
//! sequentially. That linear cost (20-50 calls for a typical resume) is the
//! dominant latency of a decode; there is no sentence-embedding cache.

pub mod error;


pub use error::{DecodeError, DecodeResult};

use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::constants::{DEFAULT_TOP_K, MIN_SENTENCE_CHARS};
use crate::oracle::EmbeddingOracle;
use crate::vector::Embedding;

/// Sentence-selection decoder over an embedding oracle.
#[derive(Debug, Clone)]
pub struct ExtractiveDecoder {
    /// Trimmed sentences at or below this length are discarded as fragments.
    min_sentence_chars: usize,
    /// Default selection size when the caller does not override it.
    top_k: usize,
}

impl Default for ExtractiveDecoder {
    fn default() -> Self {
        Self {
            min_sentence_chars: MIN_SENTENCE_CHARS,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ExtractiveDecoder {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            ..Default::default()
        }
    }

    /// Splits text into candidate sentences, dropping fragments.
    ///
    /// Order follows the document. The same filter feeds both decoding and
    /// the degenerate-input check, so "no valid sentences" means exactly
    /// "this returns empty".
    pub fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| s.chars().count() > self.min_sentence_chars)
            .map(str::to_string)
            .collect()
    }

    /// Decodes `target` into text using the configured selection size.
    pub async fn decode<O: EmbeddingOracle>(
        &self,
        oracle: &O,
        target: &Embedding,
        resume_text: &str,
    ) -> DecodeResult<String> {
        self.decode_top_k(oracle, target, resume_text, self.top_k).await
    }

    /// Decodes `target` into the `top_k` best-matching sentences of
    /// `resume_text`, reassembled in document order.
    pub async fn decode_top_k<O: EmbeddingOracle>(
        &self,
        oracle: &O,
        target: &Embedding,
        resume_text: &str,
        top_k: usize,
    ) -> DecodeResult<String> {
        let sentences = self.segment(resume_text);
        if sentences.is_empty() {
            return Err(DecodeError::NoValidSentences);
        }

        // One sequential oracle call per sentence. A failed span is dropped
        // together with its slot so sentences and vectors stay co-indexed.
        let mut surviving = Vec::with_capacity(sentences.len());
        let mut vectors = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            match oracle.embed(&sentence).await {
                Ok(vector) => {
                    surviving.push(sentence);
                    vectors.push(vector);
                }
                Err(e) => {
                    warn!(error = %e, sentence_len = sentence.len(), "Dropping unembeddable sentence");
                }
            }
        }

        if surviving.is_empty() {
            return Err(DecodeError::NoEmbeddableSentences);
        }

        // Score each survivor against the target, in document order. A
        // dimension mismatch means the oracle changed its output width
        // mid-decode; treat that span like an embed failure.
        let mut scored: Vec<(usize, f32)> = Vec::with_capacity(surviving.len());
        for (index, vector) in vectors.iter().enumerate() {
            match target.cosine_similarity(vector) {
                Ok(score) => scored.push((index, score)),
                Err(e) => {
                    warn!(error = %e, index, "Dropping sentence with mismatched embedding");
                }
            }
        }
        if scored.is_empty() {
            return Err(DecodeError::NoEmbeddableSentences);
        }

        // Stable sort, descending score. Ties keep document order; this is
        // the documented tie-break and is covered by tests.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut selected: Vec<usize> = scored
            .iter()
            .take(top_k)
            .map(|(index, _)| *index)
            .collect();

        // Back to document order for reassembly.
        selected.sort_unstable();

        debug!(
            candidates = surviving.len(),
            selected = selected.len(),
            top_k,
            "Decoded target vector into sentences"
        );

        let chosen: Vec<&str> = selected
            .into_iter()
            .map(|index| surviving[index].as_str())
            .collect();
        Ok(chosen.join("\n\n"))
    }
}
