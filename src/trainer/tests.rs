use super::*;

use crate::adapter::AdapterConfig;

fn tiny_config() -> TrainerConfig {
    TrainerConfig {
        epochs: 5,
        batch_size: 2,
        learning_rate: 1e-2,
        hidden_dim: 16,
        seed: 11,
        ..Default::default()
    }
}

/// Corpus where every resume vector equals its job vector: a trivially
/// fittable alignment target.
fn identity_corpus(examples: usize, dim: usize) -> TrainingCorpus {
    let device = Device::Cpu;
    let mut values = Vec::with_capacity(examples * dim);
    for i in 0..examples {
        for j in 0..dim {
            // Distinct, deterministic, non-degenerate rows.
            values.push(((i * dim + j) as f32 * 0.7).sin() + 0.1);
        }
    }
    let matrix = Tensor::from_vec(values, (examples, dim), &device).unwrap();
    TrainingCorpus::from_tensors(matrix.clone(), matrix).unwrap()
}

mod corpus_tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = TrainingCorpus::load("/nonexistent/corpus.safetensors", &Device::Cpu)
            .unwrap_err();
        assert!(matches!(err, TrainerError::CorpusNotFound { .. }));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.safetensors");

        let corpus = identity_corpus(4, 8);
        corpus.save(&path).unwrap();

        let loaded = TrainingCorpus::load(&path, &Device::Cpu).unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.dim(), 8);
    }

    #[test]
    fn test_missing_tensor_key_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.safetensors");

        let device = Device::Cpu;
        let only_resumes = std::collections::HashMap::from([(
            CORPUS_RESUME_KEY.to_string(),
            Tensor::zeros((2, 4), DType::F32, &device).unwrap(),
        )]);
        candle_core::safetensors::save(&only_resumes, &path).unwrap();

        let err = TrainingCorpus::load(&path, &device).unwrap_err();
        assert!(matches!(err, TrainerError::MalformedCorpus { .. }));
    }

    #[test]
    fn test_count_mismatch_is_malformed() {
        let device = Device::Cpu;
        let resumes = Tensor::zeros((3, 4), DType::F32, &device).unwrap();
        let jds = Tensor::zeros((2, 4), DType::F32, &device).unwrap();
        let err = TrainingCorpus::from_tensors(resumes, jds).unwrap_err();
        assert!(matches!(err, TrainerError::MalformedCorpus { .. }));
    }

    #[test]
    fn test_dim_mismatch_is_malformed() {
        let device = Device::Cpu;
        let resumes = Tensor::zeros((2, 4), DType::F32, &device).unwrap();
        let jds = Tensor::zeros((2, 8), DType::F32, &device).unwrap();
        let err = TrainingCorpus::from_tensors(resumes, jds).unwrap_err();
        assert!(matches!(err, TrainerError::MalformedCorpus { .. }));
    }

    #[test]
    fn test_zero_examples_is_empty_corpus() {
        let device = Device::Cpu;
        let resumes = Tensor::zeros((0, 4), DType::F32, &device).unwrap();
        let jds = Tensor::zeros((0, 4), DType::F32, &device).unwrap();
        let err = TrainingCorpus::from_tensors(resumes, jds).unwrap_err();
        assert!(matches!(err, TrainerError::EmptyCorpus));
    }

    #[test]
    fn test_rank1_tensor_is_malformed() {
        let device = Device::Cpu;
        let resumes = Tensor::zeros(4, DType::F32, &device).unwrap();
        let jds = Tensor::zeros(4, DType::F32, &device).unwrap();
        let err = TrainingCorpus::from_tensors(resumes, jds).unwrap_err();
        assert!(matches!(err, TrainerError::MalformedCorpus { .. }));
    }
}

mod loss_tests {
    use super::*;

    #[test]
    fn test_loss_is_zero_for_identical_vectors() {
        let device = Device::Cpu;
        let t = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], (2, 2), &device).unwrap();
        let loss = cosine_alignment_loss(&t, &t).unwrap().to_scalar::<f32>().unwrap();
        assert!(loss.abs() < 1e-5);
    }

    #[test]
    fn test_loss_is_two_for_opposite_vectors() {
        let device = Device::Cpu;
        let a = Tensor::from_vec(vec![1.0f32, 0.0], (1, 2), &device).unwrap();
        let b = Tensor::from_vec(vec![-1.0f32, 0.0], (1, 2), &device).unwrap();
        let loss = cosine_alignment_loss(&a, &b).unwrap().to_scalar::<f32>().unwrap();
        assert!((loss - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_loss_is_one_for_orthogonal_vectors() {
        let device = Device::Cpu;
        let a = Tensor::from_vec(vec![1.0f32, 0.0], (1, 2), &device).unwrap();
        let b = Tensor::from_vec(vec![0.0f32, 1.0], (1, 2), &device).unwrap();
        let loss = cosine_alignment_loss(&a, &b).unwrap().to_scalar::<f32>().unwrap();
        assert!((loss - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_loss_ignores_magnitude() {
        let device = Device::Cpu;
        let a = Tensor::from_vec(vec![0.5f32, 0.5], (1, 2), &device).unwrap();
        let b = Tensor::from_vec(vec![100.0f32, 100.0], (1, 2), &device).unwrap();
        let loss = cosine_alignment_loss(&a, &b).unwrap().to_scalar::<f32>().unwrap();
        assert!(loss.abs() < 1e-4);
    }
}

mod fit_tests {
    use super::*;

    #[test]
    fn test_convergence_on_identity_corpus() {
        // With resume == job everywhere, alignment loss must fall toward
        // zero within the epoch budget and never meaningfully regress.
        let corpus = identity_corpus(6, 8);
        let config = TrainerConfig {
            epochs: 60,
            batch_size: 3,
            learning_rate: 1e-2,
            hidden_dim: 16,
            seed: 3,
            ..Default::default()
        };

        let network = AdapterNetwork::new(AdapterConfig {
            input_dim: corpus.dim(),
            hidden_dim: config.hidden_dim,
            seed: config.seed,
        })
        .unwrap();

        let losses = Trainer::new(config).fit(&network, &corpus).unwrap();
        assert_eq!(losses.len(), 60);

        let first = losses[0];
        let last = *losses.last().unwrap();
        assert!(
            last < 0.2,
            "final loss {last} did not approach zero (start {first})"
        );
        assert!(last < first, "loss did not decrease: {first} -> {last}");

        // Dropout noise allows small wobbles, not regressions.
        for window in losses.windows(2) {
            assert!(
                window[1] <= window[0] + 0.1,
                "loss regressed beyond tolerance: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_partial_final_batch_is_handled() {
        // 5 examples with batch size 2 leaves a final batch of 1.
        let corpus = identity_corpus(5, 8);
        let config = tiny_config();

        let network = AdapterNetwork::new(AdapterConfig {
            input_dim: corpus.dim(),
            hidden_dim: config.hidden_dim,
            seed: config.seed,
        })
        .unwrap();

        let losses = Trainer::new(config).fit(&network, &corpus).unwrap();
        assert_eq!(losses.len(), 5);
        assert!(losses.iter().all(|l| l.is_finite()));
    }

    #[test]
    fn test_fit_rejects_zero_epochs() {
        let corpus = identity_corpus(2, 4);
        let config = TrainerConfig {
            epochs: 0,
            ..tiny_config()
        };
        let network = AdapterNetwork::new(AdapterConfig {
            input_dim: 4,
            hidden_dim: 8,
            seed: 1,
        })
        .unwrap();

        let err = Trainer::new(config).fit(&network, &corpus).unwrap_err();
        assert!(matches!(err, TrainerError::InvalidConfig { .. }));
    }
}

mod run_tests {
    use super::*;

    #[test]
    fn test_run_aborts_without_corpus_and_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainerConfig {
            corpus_path: dir.path().join("missing.safetensors"),
            weights_path: dir.path().join("weights.safetensors"),
            ..tiny_config()
        };

        let err = Trainer::new(config.clone()).run().unwrap_err();
        assert!(matches!(err, TrainerError::CorpusNotFound { .. }));
        assert!(!config.weights_path.exists(), "no partial save on abort");
    }

    #[test]
    fn test_run_writes_loadable_weights() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.safetensors");
        let weights_path = dir.path().join("weights.safetensors");

        identity_corpus(4, 8).save(&corpus_path).unwrap();

        let config = TrainerConfig {
            corpus_path,
            weights_path: weights_path.clone(),
            ..tiny_config()
        };
        let summary = Trainer::new(config.clone()).run().unwrap();

        assert_eq!(summary.examples, 4);
        assert_eq!(summary.embedding_dim, 8);
        assert_eq!(summary.epoch_losses.len(), 5);
        assert!(weights_path.exists());

        // The blob must load back into a matching network.
        let mut network = AdapterNetwork::new(AdapterConfig {
            input_dim: 8,
            hidden_dim: config.hidden_dim,
            seed: 0,
        })
        .unwrap();
        network.load(&weights_path).unwrap();
    }

    #[test]
    fn test_run_overwrites_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("corpus.safetensors");
        let weights_path = dir.path().join("weights.safetensors");

        identity_corpus(4, 8).save(&corpus_path).unwrap();
        std::fs::write(&weights_path, b"stale blob").unwrap();

        let config = TrainerConfig {
            corpus_path,
            weights_path: weights_path.clone(),
            ..tiny_config()
        };
        Trainer::new(config).run().unwrap();

        let reloaded = candle_core::safetensors::load(&weights_path, &Device::Cpu).unwrap();
        assert!(reloaded.contains_key("fc1.weight"));
    }
}
