//! Oracle error types.

use thiserror::Error;

/// Errors returned by the embedding/generation oracle.
///
/// A failed call always surfaces as an error, never as a zero vector or a
/// failure string inside the success channel.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The HTTP request could not be sent or completed.
    #[error("oracle request failed: {reason}")]
    Request { reason: String },

    /// The request exceeded the per-call timeout.
    #[error("oracle request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// The server answered with a non-2xx status.
    #[error("oracle returned HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    /// The response body could not be decoded.
    #[error("oracle response was malformed: {reason}")]
    MalformedResponse { reason: String },

    /// The server answered 2xx but carried no embedding.
    #[error("oracle returned no embedding")]
    EmptyEmbedding,

    /// The embedding failed canonical-vector validation.
    #[error("oracle returned an invalid vector: {reason}")]
    InvalidVector { reason: String },

    /// A retired operation was invoked.
    #[error("'{method}' is retired; use the adapter pipeline instead")]
    Retired { method: &'static str },
}

/// Convenience result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
