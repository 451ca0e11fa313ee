//! Pipeline error types.

use thiserror::Error;

use crate::adapter::AdapterError;
use crate::decoder::DecodeError;
use crate::oracle::OracleError;
use crate::vector::VectorError;

/// Errors surfaced by the orchestration pipeline.
///
/// The two embedding variants are distinct so the caller's failure message
/// can name which input could not be embedded. Either one halts the run
/// before the adapter is invoked.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The resume text is blank.
    #[error("resume text is empty")]
    EmptyResume,

    /// The job description text is blank.
    #[error("job description text is empty")]
    EmptyJobDescription,

    /// The HTTP oracle client could not be constructed.
    #[error("failed to initialize oracle client: {source}")]
    OracleInit {
        #[source]
        source: OracleError,
    },

    /// The resume could not be embedded; the adapter was never called.
    #[error("failed to embed resume: {source}")]
    ResumeEmbedding {
        #[source]
        source: OracleError,
    },

    /// The job description could not be embedded; the adapter was never called.
    #[error("failed to embed job description: {source}")]
    JobEmbedding {
        #[source]
        source: OracleError,
    },

    /// The adapter transform failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Extractive decoding failed on degraded input.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Vector arithmetic failed (dimension disagreement between stages).
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// The critique call failed.
    #[error("critique generation failed: {source}")]
    Critique {
        #[source]
        source: OracleError,
    },
}
