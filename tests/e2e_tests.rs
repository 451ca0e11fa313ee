//! End-to-end tests: train against a synthetic corpus, reload the weights,
//! and run the full tailoring pipeline over the mock oracle.

use candle_core::{Device, Tensor};
use tempfile::TempDir;

use resumecraft::{
    AdapterConfig, AdapterMode, ExtractiveDecoder, LoadedAdapter, MockOracle, TailorPipeline,
    Trainer, TrainerConfig, TrainingCorpus,
};

const DIM: usize = 8;
const HIDDEN: usize = 16;

const RESUME: &str = "Maintained a fleet of ingestion services in production. \
    Cut p99 query latency by forty percent over two quarters. \
    Ran the on-call rotation for the data platform team.";

const JD: &str = "Looking for a senior engineer to own data platform reliability.";

fn synthetic_corpus(n: usize) -> TrainingCorpus {
    let device = Device::Cpu;
    let mut resumes = Vec::with_capacity(n * DIM);
    let mut jds = Vec::with_capacity(n * DIM);
    for i in 0..n * DIM {
        resumes.push((i as f32 * 0.37).sin());
        jds.push((i as f32 * 0.11).cos());
    }
    let resumes = Tensor::from_vec(resumes, (n, DIM), &device).unwrap();
    let jds = Tensor::from_vec(jds, (n, DIM), &device).unwrap();
    TrainingCorpus::from_tensors(resumes, jds).unwrap()
}

fn trainer_config(dir: &TempDir) -> TrainerConfig {
    TrainerConfig {
        corpus_path: dir.path().join("corpus.safetensors"),
        weights_path: dir.path().join("adapter.safetensors"),
        epochs: 30,
        batch_size: 4,
        learning_rate: 1e-2,
        hidden_dim: HIDDEN,
        seed: 7,
    }
}

#[tokio::test]
async fn test_train_then_tailor_runs_in_learned_mode() {
    let dir = TempDir::new().unwrap();
    let config = trainer_config(&dir);

    synthetic_corpus(12).save(&config.corpus_path).unwrap();
    let summary = Trainer::new(config.clone()).run().unwrap();
    assert_eq!(summary.examples, 12);
    assert_eq!(summary.embedding_dim, DIM);
    assert!(config.weights_path.is_file());

    let adapter_config = AdapterConfig {
        input_dim: DIM,
        hidden_dim: HIDDEN,
        ..Default::default()
    };
    let adapter = LoadedAdapter::initialize(adapter_config, Some(&config.weights_path)).unwrap();
    assert!(adapter.is_trained());

    let pipeline = TailorPipeline::new(MockOracle::new(DIM), adapter, ExtractiveDecoder::new(2));
    let report = pipeline.tailor(RESUME, JD).await.unwrap();

    assert_eq!(report.mode, AdapterMode::Learned);
    assert_eq!(report.embedding_dim, DIM);
    // top_k of 2 out of 3 candidate sentences.
    assert_eq!(report.tailored_text.split("\n\n").count(), 2);
}

#[tokio::test]
async fn test_missing_weights_degrade_to_fallback_tailoring() {
    let dir = TempDir::new().unwrap();

    let adapter_config = AdapterConfig {
        input_dim: DIM,
        hidden_dim: HIDDEN,
        ..Default::default()
    };
    let missing = dir.path().join("nonexistent.safetensors");
    let adapter = LoadedAdapter::initialize(adapter_config, Some(&missing)).unwrap();
    assert!(!adapter.is_trained());

    let pipeline = TailorPipeline::new(MockOracle::new(DIM), adapter, ExtractiveDecoder::new(10));
    let report = pipeline.tailor(RESUME, JD).await.unwrap();

    assert_eq!(report.mode, AdapterMode::LinearFallback);
    assert!(!report.tailored_text.is_empty());
}

#[tokio::test]
async fn test_training_loss_trends_downward_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = trainer_config(&dir);

    synthetic_corpus(12).save(&config.corpus_path).unwrap();
    let summary = Trainer::new(config).run().unwrap();

    let first = summary.epoch_losses[0];
    assert!(summary.final_loss() < first);
}
