//! Resumecraft CLI entrypoint.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use resumecraft::config::Config;
use resumecraft::extract::{PlainTextExtractor, TextExtractor};
use resumecraft::pipeline::TailorPipeline;
use resumecraft::trainer::{Trainer, TrainerConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(
    name = "resumecraft",
    about = "Tailors a resume toward a job description with a learned embedding adapter",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tailor a resume toward a job description and print the result.
    Tailor {
        /// Path to the resume (plain text).
        resume: PathBuf,
        /// Path to the job description (plain text).
        jd: PathBuf,
        /// Number of sentences to select (overrides RESUMECRAFT_TOP_K).
        #[arg(long)]
        top_k: Option<usize>,
        /// Also request a qualitative critique after tailoring.
        #[arg(long)]
        critique: bool,
    },

    /// Print the cosine alignment between a resume and a job description.
    Align {
        resume: PathBuf,
        jd: PathBuf,
    },

    /// Request a qualitative critique without tailoring.
    Critique {
        resume: PathBuf,
        jd: PathBuf,
    },

    /// Fit the adapter's learned path against a corpus of embedding pairs.
    Train {
        /// Corpus file (overrides RESUMECRAFT_CORPUS_PATH).
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Output weights file (overrides RESUMECRAFT_WEIGHTS_PATH).
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        epochs: Option<usize>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        learning_rate: Option<f64>,
        /// Seed for weight init and epoch shuffles.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.validate()?;

    match cli.command {
        Command::Tailor {
            resume,
            jd,
            top_k,
            critique,
        } => run_tailor(config, &resume, &jd, top_k, critique).await,
        Command::Align { resume, jd } => run_align(config, &resume, &jd).await,
        Command::Critique { resume, jd } => run_critique(config, &resume, &jd).await,
        Command::Train {
            corpus,
            out,
            epochs,
            batch_size,
            learning_rate,
            seed,
        } => run_train(config, corpus, out, epochs, batch_size, learning_rate, seed),
    }
}

async fn run_tailor(
    mut config: Config,
    resume: &Path,
    jd: &Path,
    top_k: Option<usize>,
    critique: bool,
) -> anyhow::Result<()> {
    if let Some(top_k) = top_k {
        config.top_k = top_k;
    }

    let resume_text = read_document(resume)?;
    let jd_text = read_document(jd)?;

    let pipeline = TailorPipeline::from_config(&config)?;
    let report = pipeline.tailor(&resume_text, &jd_text).await?;

    println!("{}", report.tailored_text);
    println!();
    println!(
        "alignment: {:.4} -> {:.4} ({:+.4}, {} mode)",
        report.original_alignment,
        report.tailored_alignment,
        report.alignment_delta(),
        report.mode,
    );

    if critique {
        let reply = pipeline.critique(&resume_text, &jd_text).await?;
        println!();
        println!("{reply}");
    }

    Ok(())
}

async fn run_align(config: Config, resume: &Path, jd: &Path) -> anyhow::Result<()> {
    let resume_text = read_document(resume)?;
    let jd_text = read_document(jd)?;

    let pipeline = TailorPipeline::from_config(&config)?;
    let score = pipeline.alignment(&resume_text, &jd_text).await?;

    println!("{score:.4}");
    Ok(())
}

async fn run_critique(config: Config, resume: &Path, jd: &Path) -> anyhow::Result<()> {
    let resume_text = read_document(resume)?;
    let jd_text = read_document(jd)?;

    let pipeline = TailorPipeline::from_config(&config)?;
    let reply = pipeline.critique(&resume_text, &jd_text).await?;

    println!("{reply}");
    Ok(())
}

fn run_train(
    config: Config,
    corpus: Option<PathBuf>,
    out: Option<PathBuf>,
    epochs: Option<usize>,
    batch_size: Option<usize>,
    learning_rate: Option<f64>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let defaults = TrainerConfig::default();
    let trainer_config = TrainerConfig {
        corpus_path: corpus.unwrap_or(config.corpus_path),
        weights_path: out.unwrap_or(config.weights_path),
        epochs: epochs.unwrap_or(config.epochs),
        batch_size: batch_size.unwrap_or(config.batch_size),
        learning_rate: learning_rate.unwrap_or(config.learning_rate),
        hidden_dim: config.hidden_dim,
        seed: seed.unwrap_or(defaults.seed),
    };

    let summary = Trainer::new(trainer_config).run()?;

    println!(
        "trained on {} pairs (dim {}), final loss {:.4}",
        summary.examples,
        summary.embedding_dim,
        summary.final_loss(),
    );
    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    let blob =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    PlainTextExtractor
        .extract(&blob)
        .with_context(|| format!("failed to extract text from {}", path.display()))
}
