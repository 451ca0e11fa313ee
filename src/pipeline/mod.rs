//! Orchestration: oracle -> adapter -> decoder, plus the critique path.
//!
//! [`TailorPipeline`] is the explicit context object: built once at process
//! start, then passed by reference wherever needed. There is no ambient
//! model cache. All stages run sequentially on the calling task; a stage
//! failure halts the run, so later stages never see mismatched or partial
//! data.

pub mod error;


pub use error::PipelineError;

use tracing::{debug, info};

use crate::adapter::{AdapterConfig, AdapterMode, LoadedAdapter};
use crate::config::Config;
use crate::decoder::ExtractiveDecoder;
use crate::oracle::{CritiqueModel, EmbeddingOracle, OllamaClient, OracleConfig};
use crate::critique;

/// Outcome of one tailoring run.
#[derive(Debug, Clone)]
pub struct TailorReport {
    /// Sentences selected by the decoder, in document order.
    pub tailored_text: String,

    /// Cosine between the original resume embedding and the job embedding.
    pub original_alignment: f32,

    /// Cosine between the tailored embedding and the job embedding.
    pub tailored_alignment: f32,

    /// Which parameter set produced the tailored vector.
    pub mode: AdapterMode,

    /// Embedding dimension of the run.
    pub embedding_dim: usize,
}

impl TailorReport {
    /// Alignment gained (or lost) by the transform.
    pub fn alignment_delta(&self) -> f32 {
        self.tailored_alignment - self.original_alignment
    }
}

/// The tailoring pipeline over an oracle `O`.
///
/// Generic over the oracle so tests run against the mock; production code
/// uses [`TailorPipeline::from_config`] with an [`OllamaClient`].
pub struct TailorPipeline<O> {
    oracle: O,
    adapter: LoadedAdapter,
    decoder: ExtractiveDecoder,
}

impl TailorPipeline<OllamaClient> {
    /// Builds the production pipeline: HTTP oracle, adapter loaded from the
    /// configured weights path (falling back when absent), decoder with the
    /// configured selection size.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let oracle = OllamaClient::new(OracleConfig::from_config(config))
            .map_err(|source| PipelineError::OracleInit { source })?;

        let adapter_config = AdapterConfig {
            input_dim: config.embedding_dim,
            hidden_dim: config.hidden_dim,
            ..Default::default()
        };
        let adapter = LoadedAdapter::initialize(adapter_config, Some(&config.weights_path))?;

        info!(
            mode = %adapter.mode(),
            embedding_dim = config.embedding_dim,
            embed_model = %config.embed_model,
            "Pipeline initialized"
        );

        Ok(Self {
            oracle,
            adapter,
            decoder: ExtractiveDecoder::new(config.top_k),
        })
    }
}

impl<O: EmbeddingOracle + CritiqueModel> TailorPipeline<O> {
    /// Assembles a pipeline from parts (tests, custom oracles).
    pub fn new(oracle: O, adapter: LoadedAdapter, decoder: ExtractiveDecoder) -> Self {
        Self {
            oracle,
            adapter,
            decoder,
        }
    }

    /// Which parameter set transforms run through.
    pub fn mode(&self) -> AdapterMode {
        self.adapter.mode()
    }

    /// Runs the full tailoring pass for one (resume, job description) pair.
    ///
    /// Both inputs are embedded first; if either embedding fails, the run
    /// halts with a typed error before the adapter is ever invoked.
    pub async fn tailor(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<TailorReport, PipelineError> {
        if resume_text.trim().is_empty() {
            return Err(PipelineError::EmptyResume);
        }
        if jd_text.trim().is_empty() {
            return Err(PipelineError::EmptyJobDescription);
        }

        debug!(
            resume_len = resume_text.len(),
            jd_len = jd_text.len(),
            "Embedding pipeline inputs"
        );
        let resume_vec = self
            .oracle
            .embed(resume_text)
            .await
            .map_err(|source| PipelineError::ResumeEmbedding { source })?;
        let jd_vec = self
            .oracle
            .embed(jd_text)
            .await
            .map_err(|source| PipelineError::JobEmbedding { source })?;

        let tailored = self.adapter.transform(&resume_vec, &jd_vec)?;

        let original_alignment = resume_vec.cosine_similarity(&jd_vec)?;
        let tailored_alignment = tailored.cosine_similarity(&jd_vec)?;
        debug!(
            original_alignment,
            tailored_alignment,
            mode = %self.adapter.mode(),
            "Transform complete; decoding"
        );

        let tailored_text = self
            .decoder
            .decode(&self.oracle, &tailored, resume_text)
            .await?;

        Ok(TailorReport {
            tailored_text,
            original_alignment,
            tailored_alignment,
            mode: self.adapter.mode(),
            embedding_dim: resume_vec.dim(),
        })
    }

    /// Computes the alignment score between two raw texts without running
    /// the adapter (used for standalone scoring).
    pub async fn alignment(&self, resume_text: &str, jd_text: &str) -> Result<f32, PipelineError> {
        let resume_vec = self
            .oracle
            .embed(resume_text)
            .await
            .map_err(|source| PipelineError::ResumeEmbedding { source })?;
        let jd_vec = self
            .oracle
            .embed(jd_text)
            .await
            .map_err(|source| PipelineError::JobEmbedding { source })?;
        Ok(resume_vec.cosine_similarity(&jd_vec)?)
    }

    /// Requests qualitative critique text from the generative model.
    ///
    /// The embedding model is released first so both fit in accelerator
    /// memory on small machines.
    pub async fn critique(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<String, PipelineError> {
        self.oracle.release_embedder().await;

        let prompt = critique::consultant_prompt(resume_text, jd_text);
        self.oracle
            .generate(critique::SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|source| PipelineError::Critique { source })
    }
}
