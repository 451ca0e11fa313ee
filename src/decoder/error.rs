//! Decoder error types.

use thiserror::Error;

/// Degraded-input failures from extractive decoding.
///
/// These replace sentinel error strings: callers branch on the variant, not
/// on message content. Both are soft failures surfaced to the UI layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Segmentation left no sentence above the minimum length.
    #[error("no valid sentences found in resume")]
    NoValidSentences,

    /// Every surviving sentence failed to embed.
    #[error("could not embed any resume sentence")]
    NoEmbeddableSentences,
}

/// Convenience result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
