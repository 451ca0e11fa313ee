//! Mock oracle for tests (deterministic stub vectors, programmable failures).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{CritiqueModel, EmbeddingOracle, OracleError, OracleResult};
use crate::vector::Embedding;

/// In-memory oracle.
///
/// Unprogrammed texts get a deterministic hash-seeded unit vector, so the
/// same text always embeds identically within and across tests. Responses
/// and failures can be pinned per text, and every embed call is recorded.
pub struct MockOracle {
    dim: usize,
    responses: Mutex<HashMap<String, Vec<f32>>>,
    failures: Mutex<HashSet<String>>,
    fail_all: AtomicBool,
    embed_calls: Mutex<Vec<String>>,
    critique_reply: Mutex<String>,
}

impl MockOracle {
    /// Creates a mock producing `dim`-length vectors.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashSet::new()),
            fail_all: AtomicBool::new(false),
            embed_calls: Mutex::new(Vec::new()),
            critique_reply: Mutex::new("## Career Transition Analysis\n(mock)".to_string()),
        }
    }

    /// Pins the vector returned for `text`.
    pub fn with_response(self, text: &str, vector: Vec<f32>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
        self
    }

    /// Makes embedding `text` fail.
    pub fn with_failure(self, text: &str) -> Self {
        self.failures.lock().unwrap().insert(text.to_string());
        self
    }

    /// Makes every embed call fail.
    pub fn failing(dim: usize) -> Self {
        let mock = Self::new(dim);
        mock.fail_all.store(true, Ordering::SeqCst);
        mock
    }

    /// Sets the canned critique reply.
    pub fn with_critique_reply(self, reply: &str) -> Self {
        *self.critique_reply.lock().unwrap() = reply.to_string();
        self
    }

    /// Texts passed to [`EmbeddingOracle::embed`], in call order.
    pub fn embed_calls(&self) -> Vec<String> {
        self.embed_calls.lock().unwrap().clone()
    }

    /// Deterministic unit vector derived from the text hash (same scheme for
    /// every unprogrammed input).
    fn stub_vector(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut vector = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            vector.push(value);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingOracle for MockOracle {
    async fn embed(&self, text: &str) -> OracleResult<Embedding> {
        self.embed_calls.lock().unwrap().push(text.to_string());

        if self.fail_all.load(Ordering::SeqCst) || self.failures.lock().unwrap().contains(text) {
            return Err(OracleError::HttpStatus {
                endpoint: "mock:/api/embed".to_string(),
                status: 500,
            });
        }

        let vector = self
            .responses
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.stub_vector(text));

        Embedding::new(vector).map_err(|e| OracleError::InvalidVector {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CritiqueModel for MockOracle {
    async fn generate(&self, _system: &str, _prompt: &str) -> OracleResult<String> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(OracleError::HttpStatus {
                endpoint: "mock:/api/generate".to_string(),
                status: 500,
            });
        }
        Ok(self.critique_reply.lock().unwrap().clone())
    }
}
