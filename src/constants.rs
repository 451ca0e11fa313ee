//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary values (e.g. the adapter's concatenated input
//! width) from primary ones to avoid drift. The embedding dimension is a
//! runtime setting ([`crate::Config::embedding_dim`]); the constants here are
//! defaults and hyperparameters, not compile-time invariants.

/// Output width of `mxbai-embed-large`, the default embedding model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Hidden width of the adapter's learned path.
pub const DEFAULT_HIDDEN_DIM: usize = 2048;

/// Dropout probability on the learned path (training only).
pub const DROPOUT_PROB: f32 = 0.1;

/// Seed for Glorot weight initialization when none is configured.
pub const DEFAULT_INIT_SEED: u64 = 42;

/// Sentences at or below this many trimmed characters are fragments and are
/// excluded from extractive decoding.
pub const MIN_SENTENCE_CHARS: usize = 20;

/// Default number of sentences the decoder selects.
pub const DEFAULT_TOP_K: usize = 10;

/// Training run defaults.
pub const DEFAULT_EPOCHS: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 16;
pub const DEFAULT_LEARNING_RATE: f64 = 1e-4;

/// Epoch interval for training-loss log lines.
pub const LOSS_LOG_INTERVAL: usize = 5;

/// Numerical floor for cosine denominators.
pub const COSINE_EPS: f64 = 1e-8;

/// Ollama endpoint defaults.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBED_MODEL: &str = "mxbai-embed-large";
pub const DEFAULT_CRITIQUE_MODEL: &str = "gemma:2b";

/// Per-call timeout for embedding and generation requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Timeout for the best-effort model unload poke.
pub const UNLOAD_TIMEOUT_SECS: u64 = 5;

/// Tensor names inside the training-corpus safetensors file.
pub const CORPUS_RESUME_KEY: &str = "resume_embeddings";
pub const CORPUS_JD_KEY: &str = "jd_embeddings";
