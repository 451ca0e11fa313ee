//! Offline fitting of the adapter's learned path.
//!
//! The objective is direct cosine alignment: for each (resume, job) pair the
//! adapter output is pulled toward the job vector's direction, minimizing
//! `1 - cos(output, job)` averaged per mini-batch. Nothing anchors the output
//! to the resume vector; the extractive decoder keeps results grounded in the
//! resume's actual text.
//!
//! The run is a fixed number of epochs with a fresh shuffle each pass and no
//! early stopping. On completion the learned parameters overwrite any
//! previous blob; on any corpus error the run aborts before the first step
//! with nothing saved.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{TrainerError, TrainerResult};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::adapter::{AdapterConfig, AdapterMode, AdapterNetwork};
use crate::constants::{
    CORPUS_JD_KEY, CORPUS_RESUME_KEY, COSINE_EPS, DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS,
    DEFAULT_HIDDEN_DIM, DEFAULT_INIT_SEED, DEFAULT_LEARNING_RATE, LOSS_LOG_INTERVAL,
};

/// Hyperparameters and file locations for a training run.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Safetensors file with `resume_embeddings` and `jd_embeddings`.
    pub corpus_path: PathBuf,

    /// Destination for the fitted learned parameters (overwritten).
    pub weights_path: PathBuf,

    /// Passes over the full corpus.
    pub epochs: usize,

    /// Nominal mini-batch size; the final batch of an epoch may be smaller.
    pub batch_size: usize,

    /// Fixed learning rate for the adaptive optimizer.
    pub learning_rate: f64,

    /// Hidden width of the adapter being fitted.
    pub hidden_dim: usize,

    /// Seed for weight init and epoch shuffles.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("./dataset_tensors.safetensors"),
            weights_path: PathBuf::from("./mlp_adapter.safetensors"),
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            hidden_dim: DEFAULT_HIDDEN_DIM,
            seed: DEFAULT_INIT_SEED,
        }
    }
}

impl TrainerConfig {
    fn validate(&self) -> TrainerResult<()> {
        if self.epochs == 0 {
            return Err(TrainerError::InvalidConfig {
                reason: "epochs must be greater than zero".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(TrainerError::InvalidConfig {
                reason: "batch_size must be greater than zero".to_string(),
            });
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainerError::InvalidConfig {
                reason: format!("learning_rate must be positive, got {}", self.learning_rate),
            });
        }
        Ok(())
    }
}

/// Co-indexed (resume, job) embedding matrices, fully resident in memory for
/// the duration of a run. Read-only to the trainer.
#[derive(Debug)]
pub struct TrainingCorpus {
    resumes: Tensor,
    jds: Tensor,
}

impl TrainingCorpus {
    /// Loads and validates a corpus file.
    ///
    /// Pairs are co-indexed by position; the two matrices must agree on both
    /// example count and embedding dimension, and the count must be nonzero.
    pub fn load<P: AsRef<Path>>(path: P, device: &Device) -> TrainerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TrainerError::CorpusNotFound {
                path: path.to_path_buf(),
            });
        }

        let tensors = candle_core::safetensors::load(path, device).map_err(|e| {
            TrainerError::MalformedCorpus {
                reason: e.to_string(),
            }
        })?;

        let resumes = Self::take_matrix(&tensors, CORPUS_RESUME_KEY)?;
        let jds = Self::take_matrix(&tensors, CORPUS_JD_KEY)?;
        Self::from_tensors(resumes, jds)
    }

    /// Builds a corpus from in-memory matrices (used by tests and the
    /// preprocessing pipeline).
    pub fn from_tensors(resumes: Tensor, jds: Tensor) -> TrainerResult<Self> {
        let (n_resumes, resume_dim) = resumes
            .dims2()
            .map_err(|_| TrainerError::MalformedCorpus {
                reason: format!(
                    "{CORPUS_RESUME_KEY} must be rank 2 (examples x dim), got shape {:?}",
                    resumes.dims()
                ),
            })?;
        let (n_jds, jd_dim) = jds.dims2().map_err(|_| TrainerError::MalformedCorpus {
            reason: format!(
                "{CORPUS_JD_KEY} must be rank 2 (examples x dim), got shape {:?}",
                jds.dims()
            ),
        })?;

        if n_resumes != n_jds {
            return Err(TrainerError::MalformedCorpus {
                reason: format!("example count mismatch: {n_resumes} resumes vs {n_jds} jds"),
            });
        }
        if resume_dim != jd_dim {
            return Err(TrainerError::MalformedCorpus {
                reason: format!("dimension mismatch: resume dim {resume_dim} vs jd dim {jd_dim}"),
            });
        }
        if n_resumes == 0 {
            return Err(TrainerError::EmptyCorpus);
        }

        let resumes = resumes.to_dtype(DType::F32)?;
        let jds = jds.to_dtype(DType::F32)?;
        Ok(Self { resumes, jds })
    }

    /// Writes the corpus to a safetensors file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TrainerResult<()> {
        let tensors = HashMap::from([
            (CORPUS_RESUME_KEY.to_string(), self.resumes.clone()),
            (CORPUS_JD_KEY.to_string(), self.jds.clone()),
        ]);
        candle_core::safetensors::save(&tensors, path)?;
        Ok(())
    }

    /// Number of (resume, job) pairs.
    pub fn len(&self) -> usize {
        self.resumes.dims()[0]
    }

    /// `true` when the corpus holds no pairs (unreachable after validation).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embedding dimension D.
    pub fn dim(&self) -> usize {
        self.resumes.dims()[1]
    }

    fn take_matrix(tensors: &HashMap<String, Tensor>, key: &str) -> TrainerResult<Tensor> {
        tensors
            .get(key)
            .cloned()
            .ok_or_else(|| TrainerError::MalformedCorpus {
                reason: format!("missing tensor '{key}'"),
            })
    }
}

/// Per-run statistics returned to the caller.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Pairs in the corpus.
    pub examples: usize,
    /// Embedding dimension D.
    pub embedding_dim: usize,
    /// Average `1 - cos` loss per epoch, in epoch order.
    pub epoch_losses: Vec<f32>,
}

impl TrainingSummary {
    /// Average loss of the final epoch.
    pub fn final_loss(&self) -> f32 {
        self.epoch_losses.last().copied().unwrap_or(f32::NAN)
    }
}

/// Fits the adapter's learned path against a corpus of embedding pairs.
///
/// The trainer owns the network for the duration of a run; only the learned
/// parameter set is optimized and persisted.
#[derive(Debug)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Full run: load corpus, fit, overwrite the weights blob.
    ///
    /// A missing or empty corpus aborts before any optimization step and
    /// leaves any existing blob untouched.
    pub fn run(&self) -> TrainerResult<TrainingSummary> {
        self.config.validate()?;

        let device = Device::Cpu;
        info!(corpus = %self.config.corpus_path.display(), "Loading training corpus");
        let corpus = TrainingCorpus::load(&self.config.corpus_path, &device)?;

        info!(
            examples = corpus.len(),
            embedding_dim = corpus.dim(),
            epochs = self.config.epochs,
            batch_size = self.config.batch_size,
            "Starting adapter training"
        );

        let adapter_config = AdapterConfig {
            input_dim: corpus.dim(),
            hidden_dim: self.config.hidden_dim,
            seed: self.config.seed,
        };
        let network = AdapterNetwork::new(adapter_config)?;

        let epoch_losses = self.fit(&network, &corpus)?;

        network.save(&self.config.weights_path)?;
        info!(
            weights = %self.config.weights_path.display(),
            final_loss = epoch_losses.last().copied().unwrap_or(f32::NAN),
            "Training complete; learned parameters saved"
        );

        Ok(TrainingSummary {
            examples: corpus.len(),
            embedding_dim: corpus.dim(),
            epoch_losses,
        })
    }

    /// Optimization loop over an already-built network (no persistence).
    ///
    /// Exposed for tests and callers that manage their own corpus lifecycle.
    pub fn fit(
        &self,
        network: &AdapterNetwork,
        corpus: &TrainingCorpus,
    ) -> TrainerResult<Vec<f32>> {
        self.config.validate()?;
        if corpus.is_empty() {
            return Err(TrainerError::EmptyCorpus);
        }

        // Adam semantics: adaptive first-order updates, no weight decay.
        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(network.learned_vars().all_vars(), params)?;

        let device = Device::Cpu;
        let n = corpus.len();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut epoch_losses = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            let mut permutation: Vec<u32> = (0..n as u32).collect();
            permutation.shuffle(&mut rng);

            let mut epoch_loss = 0f32;
            let mut batches = 0usize;

            for chunk in permutation.chunks(self.config.batch_size) {
                let indices = Tensor::from_slice(chunk, chunk.len(), &device)?;
                let batch_resumes = corpus.resumes.index_select(&indices, 0)?;
                let batch_jds = corpus.jds.index_select(&indices, 0)?;

                let output =
                    network.forward(&batch_resumes, &batch_jds, AdapterMode::Learned, true)?;
                let loss = cosine_alignment_loss(&output, &batch_jds)?;
                optimizer.backward_step(&loss)?;

                epoch_loss += loss.to_scalar::<f32>()?;
                batches += 1;
            }

            let average = epoch_loss / batches as f32;
            epoch_losses.push(average);

            if (epoch + 1) % LOSS_LOG_INTERVAL == 0 {
                info!(
                    epoch = epoch + 1,
                    total_epochs = self.config.epochs,
                    loss = average,
                    "Training progress"
                );
            } else {
                debug!(epoch = epoch + 1, loss = average, "Epoch finished");
            }
        }

        Ok(epoch_losses)
    }
}

/// Mean `1 - cos(output, target)` over a batch.
///
/// Averaging over the actual row count makes the nominal-vs-partial batch
/// distinction (and the all-ones similarity label of the reference loss)
/// implicit.
fn cosine_alignment_loss(output: &Tensor, target: &Tensor) -> candle_core::Result<Tensor> {
    let dot = (output * target)?.sum(1)?;
    let output_norm = output.sqr()?.sum(1)?.sqrt()?;
    let target_norm = target.sqr()?.sum(1)?.sqrt()?;
    let denom = ((output_norm * target_norm)? + COSINE_EPS)?;
    let cosine = (dot / denom)?;
    (cosine.ones_like()? - cosine)?.mean_all()
}
