use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use medqa_core::config::{Config, Settings};
use medqa_core::loader::CorpusLoader;
use medqa_core::types::{Answer, Entities, MatchOutcome};
use medqa_core::Corpus;
use medqa_engine::{MedQaEngine, Refresh};
use medqa_entities::KeywordExtractor;

#[derive(Parser)]
#[command(name = "medqa")]
#[command(version, about = "Answer medical questions from MedQuAD CSV exports", long_about = None)]
struct Cli {
    /// Config file (defaults to medqa.toml + medqa.<RUST_ENV>.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the closest known question and print its answer
    Ask {
        query: String,

        /// Directory scanned for .csv exports
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Report "no confident answer" below this similarity
        #[arg(long)]
        min_score: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Annotate text with symptoms, diseases and treatments
    Entities {
        text: String,

        #[arg(long)]
        json: bool,
    },

    /// Index size for the corpus directory
    Stats {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Interactive session; `:refresh` reloads the corpus, `:quit` exits
    Chat {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_file(path)?,
        None => Config::load()?,
    };
    let mut settings = config.settings().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    match cli.command {
        Commands::Ask { query, data_dir, min_score, json } => {
            if let Some(min) = min_score {
                settings.search.min_score = min;
            }
            let engine = engine_for(&settings)?;
            let dir = corpus_dir(&config, &settings, data_dir);
            engine.rebuild(load_corpus(&dir)?)?;
            let answer = engine.answer(&query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                print_answer(&answer);
            }
        }
        Commands::Entities { text, json } => {
            let engine = engine_for(&settings)?;
            let entities = engine.extract(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&entities)?);
            } else {
                print_entities(&entities);
            }
        }
        Commands::Stats { data_dir } => {
            let engine = engine_for(&settings)?;
            let dir = corpus_dir(&config, &settings, data_dir);
            let stats = engine.rebuild(load_corpus(&dir)?)?;
            println!("Corpus directory: {}", dir.display());
            println!("📊 Documents:       {}", stats.documents);
            println!("📊 Vocabulary size: {}", stats.vocabulary_size);
            println!("🔑 Fingerprint:     {:016x}", stats.fingerprint);
        }
        Commands::Chat { data_dir } => {
            let engine = engine_for(&settings)?;
            let dir = corpus_dir(&config, &settings, data_dir);
            engine.rebuild(load_corpus(&dir)?)?;
            chat(&engine, &dir)?;
        }
    }
    Ok(())
}

fn engine_for(settings: &Settings) -> Result<MedQaEngine> {
    Ok(MedQaEngine::new(settings, Box::new(KeywordExtractor::default()))?)
}

fn corpus_dir(config: &Config, settings: &Settings, arg: Option<PathBuf>) -> PathBuf {
    arg.unwrap_or_else(|| config.resolve_path(&settings.data.corpus_dir))
}

fn load_corpus(dir: &Path) -> Result<Corpus> {
    let loader = CorpusLoader::new()?;
    tracing::debug!(dir = %dir.display(), "loading corpus");
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .context("progress template")?
            .progress_chars("#>-"),
    );
    let loaded = loader.load_dir_with(dir, |file, total| {
        pb.set_length(total as u64);
        pb.set_message(file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let corpus = loaded?;
    eprintln!("✅ Loaded {} Q&A pairs from {}", corpus.len(), dir.display());
    Ok(corpus)
}

fn chat(engine: &MedQaEngine, dir: &Path) -> Result<()> {
    println!("Ask a medical question (:refresh reloads the knowledge base, :quit exits)");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" | ":q" => break,
            ":refresh" => match load_corpus(dir).and_then(|c| engine.refresh(c).map_err(anyhow::Error::from)) {
                Ok(Refresh::Rebuilt(s)) => println!("🔄 Rebuilt index: {} documents", s.documents),
                Ok(Refresh::Unchanged(s)) => println!("Knowledge base unchanged ({} documents)", s.documents),
                Err(e) => println!("❌ Refresh failed: {e:#}"),
            },
            query => match engine.answer(query) {
                Ok(answer) => print_answer(&answer),
                Err(e) => println!("❌ {e}"),
            },
        }
    }
    Ok(())
}

fn print_answer(answer: &Answer) {
    let best = answer.outcome.best();
    if let MatchOutcome::NoConfidentMatch { min_score, .. } = &answer.outcome {
        println!("⚠️  No confident answer (best score {:.4} is below {:.4})", best.score, min_score);
        println!();
    }
    println!("🔍 Closest Matched Question");
    println!("{}", best.question);
    println!();
    if answer.outcome.is_confident() {
        println!("💬 Answer");
        println!("{}", best.answer);
        println!();
    }
    println!("Similarity Score: {:.4}", best.score);
    println!();
    print_entities(&answer.entities);
}

fn print_entities(entities: &Entities) {
    println!("🧬 Extracted Medical Entities");
    for (category, items) in entities.iter() {
        let shown = if items.is_empty() { "None".to_string() } else { items.join(", ") };
        println!("{}: {}", category, shown);
    }
}
