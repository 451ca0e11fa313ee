//! Trainable MLP adapter over (resume, job) embedding pairs.
//!
//! The adapter concatenates the two embeddings and maps the combined vector
//! back to embedding space. Two disjoint parameter sets exist:
//!
//! - **Learned**: `2D -> H -> H -> D` with ReLU activations and 10% dropout
//!   after the first layer (training only). Fitted by [`crate::trainer`].
//! - **Linear fallback**: a single independent `2D -> D` projection used when
//!   no trained weights exist. Never trained, never persisted.
//!
//! Callers obtain an adapter through [`LoadedAdapter::initialize`], which
//! returns an explicit `Trained`/`Fallback` variant instead of silently
//! swapping modes behind one opaque handle.

pub mod error;


pub use error::AdapterError;

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::init::Init;
use candle_nn::{Dropout, Linear, Module, VarMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_HIDDEN_DIM, DEFAULT_INIT_SEED, DROPOUT_PROB};
use crate::vector::Embedding;

/// Which parameter set a transform runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterMode {
    /// The trained three-layer MLP.
    Learned,
    /// The untrained single-layer projection.
    LinearFallback,
}

impl std::fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Learned => write!(f, "learned"),
            Self::LinearFallback => write!(f, "linear-fallback"),
        }
    }
}

/// Network shape and initialization seed.
#[derive(Debug, Clone, Copy)]
pub struct AdapterConfig {
    /// Embedding dimension D. The first layer sees `2 * input_dim`.
    pub input_dim: usize,
    /// Hidden width H of the learned path.
    pub hidden_dim: usize,
    /// Seed for Glorot initialization. Fixed seed => identical weights.
    pub seed: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            input_dim: DEFAULT_EMBEDDING_DIM,
            hidden_dim: DEFAULT_HIDDEN_DIM,
            seed: DEFAULT_INIT_SEED,
        }
    }
}

impl AdapterConfig {
    /// Creates a config for dimension `input_dim` with default hidden width.
    pub fn new(input_dim: usize) -> Self {
        Self {
            input_dim,
            ..Default::default()
        }
    }
}

/// The adapter network with both parameter sets materialized.
///
/// Inference is pure with respect to the parameters; dropout is active only
/// on the training forward pass. The network always lives on the CPU: it is
/// tiny, and accelerator memory belongs to the embedding model.
pub struct AdapterNetwork {
    learned_vars: VarMap,
    // Fallback weights live in their own VarMap so save/load and the
    // optimizer can only ever touch the learned set.
    #[allow(dead_code)]
    fallback_vars: VarMap,
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
    skip: Linear,
    dropout: Dropout,
    config: AdapterConfig,
    device: Device,
}

impl std::fmt::Debug for AdapterNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterNetwork")
            .field("input_dim", &self.config.input_dim)
            .field("hidden_dim", &self.config.hidden_dim)
            .field("seed", &self.config.seed)
            .finish()
    }
}

impl AdapterNetwork {
    /// Builds the network with Glorot-uniform weights and zero biases.
    ///
    /// Initialization is deterministic for a given `config.seed`; the
    /// fallback path consumes the same RNG stream after the learned layers,
    /// so the two parameter sets are never identical.
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        if config.input_dim == 0 {
            return Err(AdapterError::InvalidConfig {
                reason: "input_dim must be greater than zero".to_string(),
            });
        }
        if config.hidden_dim == 0 {
            return Err(AdapterError::InvalidConfig {
                reason: "hidden_dim must be greater than zero".to_string(),
            });
        }

        let device = Device::Cpu;
        let combined_dim = config.input_dim * 2;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut learned_vars = VarMap::new();
        let fc1 = glorot_linear(
            &mut learned_vars,
            &mut rng,
            "fc1",
            combined_dim,
            config.hidden_dim,
            &device,
        )?;
        let fc2 = glorot_linear(
            &mut learned_vars,
            &mut rng,
            "fc2",
            config.hidden_dim,
            config.hidden_dim,
            &device,
        )?;
        let fc3 = glorot_linear(
            &mut learned_vars,
            &mut rng,
            "fc3",
            config.hidden_dim,
            config.input_dim,
            &device,
        )?;

        let mut fallback_vars = VarMap::new();
        let skip = glorot_linear(
            &mut fallback_vars,
            &mut rng,
            "skip",
            combined_dim,
            config.input_dim,
            &device,
        )?;

        Ok(Self {
            learned_vars,
            fallback_vars,
            fc1,
            fc2,
            fc3,
            skip,
            dropout: Dropout::new(DROPOUT_PROB),
            config,
            device,
        })
    }

    /// Returns the network configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Returns the compute device (always CPU).
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Learned-path variables, for the optimizer. The fallback set is
    /// deliberately unreachable from here.
    pub(crate) fn learned_vars(&self) -> &VarMap {
        &self.learned_vars
    }

    /// Inference transform: maps a (resume, job) pair to a tailored vector.
    ///
    /// Accepts rank-1 (single example) or rank-2 (batch) tensors; rank-1
    /// inputs are treated as a batch of one. Output shape is `(batch, D)`.
    pub fn transform(
        &self,
        resume: &Tensor,
        job: &Tensor,
        mode: AdapterMode,
    ) -> Result<Tensor, AdapterError> {
        self.forward(resume, job, mode, false)
    }

    /// Forward pass with explicit dropout control. Training uses
    /// `train = true` on the learned path only.
    pub(crate) fn forward(
        &self,
        resume: &Tensor,
        job: &Tensor,
        mode: AdapterMode,
        train: bool,
    ) -> Result<Tensor, AdapterError> {
        let resume = self.batched(resume)?;
        let job = self.batched(job)?;

        let (resume_batch, resume_dim) = dims2(&resume)?;
        let (job_batch, job_dim) = dims2(&job)?;

        if resume_dim != self.config.input_dim {
            return Err(AdapterError::DimensionMismatch {
                expected: self.config.input_dim,
                actual: resume_dim,
            });
        }
        if job_dim != self.config.input_dim {
            return Err(AdapterError::DimensionMismatch {
                expected: self.config.input_dim,
                actual: job_dim,
            });
        }
        if resume_batch != job_batch {
            return Err(AdapterError::BatchMismatch {
                resume: resume_batch,
                job: job_batch,
            });
        }

        let combined = Tensor::cat(&[&resume, &job], 1)?;

        let output = match mode {
            AdapterMode::Learned => {
                let x = self.fc1.forward(&combined)?.relu()?;
                let x = self.dropout.forward(&x, train)?;
                let x = self.fc2.forward(&x)?.relu()?;
                self.fc3.forward(&x)?
            }
            AdapterMode::LinearFallback => self.skip.forward(&combined)?,
        };

        Ok(output)
    }

    /// Convenience transform over canonical embeddings; returns a single
    /// tailored embedding of length D.
    pub fn transform_pair(
        &self,
        resume: &Embedding,
        job: &Embedding,
        mode: AdapterMode,
    ) -> Result<Embedding, AdapterError> {
        let resume_t = resume.to_tensor(&self.device)?;
        let job_t = job.to_tensor(&self.device)?;
        let output = self.transform(&resume_t, &job_t, mode)?;
        Ok(Embedding::from_tensor(&output)?)
    }

    /// Overwrites `path` with the learned parameter set.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AdapterError> {
        let path = path.as_ref();
        self.learned_vars
            .save(path)
            .map_err(|e| AdapterError::WeightsSaveFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Loads learned parameters in place from a safetensors blob.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), AdapterError> {
        let path = path.as_ref();
        self.learned_vars
            .load(path)
            .map_err(|e| AdapterError::WeightsLoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn batched(&self, input: &Tensor) -> Result<Tensor, AdapterError> {
        match input.rank() {
            1 => Ok(input.unsqueeze(0)?),
            2 => Ok(input.clone()),
            rank => Err(AdapterError::InvalidRank { rank }),
        }
    }
}

/// An adapter whose operating mode was decided exactly once, at load time.
///
/// The two variants carry the same network but are not interchangeable:
/// callers that care (the report, the UI layer) branch on the variant, not
/// on a hidden boolean.
#[derive(Debug)]
pub enum LoadedAdapter {
    /// Trained weights were found and loaded; transforms use the MLP.
    Trained(AdapterNetwork),
    /// No usable weights; transforms use the untrained linear projection.
    Fallback(AdapterNetwork),
}

impl LoadedAdapter {
    /// Builds the network and attempts to load trained weights.
    ///
    /// A missing or unreadable blob is non-fatal and yields the `Fallback`
    /// variant; only construction errors propagate.
    pub fn initialize(
        config: AdapterConfig,
        weights_path: Option<&Path>,
    ) -> Result<Self, AdapterError> {
        let mut network = AdapterNetwork::new(config)?;

        let Some(path) = weights_path else {
            info!("No adapter weights configured; using linear fallback");
            return Ok(Self::Fallback(network));
        };

        if !path.exists() {
            info!(path = %path.display(), "Adapter weights not found; using linear fallback");
            return Ok(Self::Fallback(network));
        }

        match network.load(path) {
            Ok(()) => {
                info!(path = %path.display(), "Loaded trained adapter weights");
                Ok(Self::Trained(network))
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load adapter weights; using linear fallback"
                );
                Ok(Self::Fallback(network))
            }
        }
    }

    /// The mode transforms run in.
    pub fn mode(&self) -> AdapterMode {
        match self {
            Self::Trained(_) => AdapterMode::Learned,
            Self::Fallback(_) => AdapterMode::LinearFallback,
        }
    }

    /// `true` when trained weights are in use.
    pub fn is_trained(&self) -> bool {
        matches!(self, Self::Trained(_))
    }

    /// The underlying network.
    pub fn network(&self) -> &AdapterNetwork {
        match self {
            Self::Trained(n) | Self::Fallback(n) => n,
        }
    }

    /// Transforms a (resume, job) pair in this adapter's mode.
    pub fn transform(&self, resume: &Embedding, job: &Embedding) -> Result<Embedding, AdapterError> {
        self.network().transform_pair(resume, job, self.mode())
    }
}

/// Dense layer with Glorot-uniform weights and zero bias, registered in
/// `varmap` under `name.weight` / `name.bias`.
fn glorot_linear(
    varmap: &mut VarMap,
    rng: &mut StdRng,
    name: &str,
    in_dim: usize,
    out_dim: usize,
    device: &Device,
) -> Result<Linear, AdapterError> {
    let weight_name = format!("{name}.weight");
    let bias_name = format!("{name}.bias");

    let weight = varmap.get(
        (out_dim, in_dim),
        &weight_name,
        Init::Const(0.0),
        DType::F32,
        device,
    )?;
    let bias = varmap.get(out_dim, &bias_name, Init::Const(0.0), DType::F32, device)?;

    // Candle's CPU backend cannot be seeded, so the Glorot draw happens
    // through our own seeded RNG and is written over the zero init.
    let bound = (6.0 / (in_dim + out_dim) as f64).sqrt();
    let values: Vec<f32> = (0..out_dim * in_dim)
        .map(|_| rng.random_range(-bound..bound) as f32)
        .collect();
    let glorot = Tensor::from_vec(values, (out_dim, in_dim), device)?;
    varmap.set_one(weight_name, &glorot)?;

    Ok(Linear::new(weight, Some(bias)))
}

fn dims2(tensor: &Tensor) -> Result<(usize, usize), AdapterError> {
    Ok(tensor.dims2()?)
}
