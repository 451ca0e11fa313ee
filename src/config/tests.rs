use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_resumecraft_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("RESUMECRAFT_OLLAMA_URL");
        env::remove_var("RESUMECRAFT_EMBED_MODEL");
        env::remove_var("RESUMECRAFT_CRITIQUE_MODEL");
        env::remove_var("RESUMECRAFT_WEIGHTS_PATH");
        env::remove_var("RESUMECRAFT_CORPUS_PATH");
        env::remove_var("RESUMECRAFT_EMBEDDING_DIM");
        env::remove_var("RESUMECRAFT_HIDDEN_DIM");
        env::remove_var("RESUMECRAFT_REQUEST_TIMEOUT_SECS");
        env::remove_var("RESUMECRAFT_TOP_K");
        env::remove_var("RESUMECRAFT_EPOCHS");
        env::remove_var("RESUMECRAFT_BATCH_SIZE");
        env::remove_var("RESUMECRAFT_LEARNING_RATE");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.ollama_url, "http://localhost:11434");
    assert_eq!(config.embed_model, "mxbai-embed-large");
    assert_eq!(config.critique_model, "gemma:2b");
    assert_eq!(config.weights_path, PathBuf::from("./mlp_adapter.safetensors"));
    assert_eq!(config.embedding_dim, 1024);
    assert_eq!(config.hidden_dim, 2048);
    assert_eq!(config.top_k, 10);
    assert_eq!(config.epochs, 50);
    assert_eq!(config.batch_size, 16);
    assert_eq!(config.learning_rate, 1e-4);
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear_resumecraft_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config.ollama_url, "http://localhost:11434");
    assert_eq!(config.embedding_dim, 1024);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_resumecraft_env();
    let config = with_env_vars(
        &[
            ("RESUMECRAFT_OLLAMA_URL", "http://10.0.0.2:11434"),
            ("RESUMECRAFT_EMBED_MODEL", "nomic-embed-text"),
            ("RESUMECRAFT_EMBEDDING_DIM", "768"),
            ("RESUMECRAFT_TOP_K", "5"),
            ("RESUMECRAFT_LEARNING_RATE", "0.001"),
        ],
        || Config::from_env().unwrap(),
    );

    assert_eq!(config.ollama_url, "http://10.0.0.2:11434");
    assert_eq!(config.embed_model, "nomic-embed-text");
    assert_eq!(config.embedding_dim, 768);
    assert_eq!(config.top_k, 5);
    assert_eq!(config.learning_rate, 0.001);
}

#[test]
#[serial]
fn test_from_env_rejects_non_numeric_dim() {
    clear_resumecraft_env();
    let result = with_env_vars(&[("RESUMECRAFT_EMBEDDING_DIM", "huge")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::NumberParseError { name, .. }) if name == "RESUMECRAFT_EMBEDDING_DIM"
    ));
}

#[test]
#[serial]
fn test_from_env_blank_string_falls_back_to_default() {
    clear_resumecraft_env();
    let config = with_env_vars(&[("RESUMECRAFT_EMBED_MODEL", "  ")], || {
        Config::from_env().unwrap()
    });
    assert_eq!(config.embed_model, "mxbai-embed-large");
}

#[test]
fn test_validate_accepts_defaults() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_dim() {
    let config = Config {
        embedding_dim: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue { name }) if name == "RESUMECRAFT_EMBEDDING_DIM"
    ));
}

#[test]
fn test_validate_rejects_zero_top_k() {
    let config = Config {
        top_k: 0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroValue { .. })));
}

#[test]
fn test_validate_rejects_bad_learning_rate() {
    let config = Config {
        learning_rate: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLearningRate { .. })
    ));
}

#[test]
fn test_validate_rejects_directory_as_weights_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        weights_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}
