//! Source-text extraction seam.
//!
//! Resume text arrives either as a plain string or as a binary document.
//! Document parsing (PDF and friends) is an external collaborator with a
//! narrow contract: given a blob, return best-effort plain text or an
//! explicit error. This module defines that contract and the trivial
//! plain-text implementation the CLI uses.

#[cfg(test)]
mod tests;

use thiserror::Error;

/// Errors from turning a document blob into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The blob is not decodable as text.
    #[error("document is not valid UTF-8 text: {reason}")]
    InvalidEncoding { reason: String },

    /// Decoding succeeded but produced nothing usable.
    #[error("document contained no extractable text")]
    NoText,
}

/// Turns a document blob into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, blob: &[u8]) -> Result<String, ExtractError>;
}

/// Pass-through extractor for blobs that are already UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, blob: &[u8]) -> Result<String, ExtractError> {
        let text = std::str::from_utf8(blob).map_err(|e| ExtractError::InvalidEncoding {
            reason: e.to_string(),
        })?;

        if text.trim().is_empty() {
            return Err(ExtractError::NoText);
        }
        Ok(text.to_string())
    }
}
