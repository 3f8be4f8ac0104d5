//! # DocRag: grounded answers over a small document corpus
//!
//! Loads the corpus, embeds every document once, then answers questions
//! from stdin until `exit`.
//!
//! Usage:
//!   docrag                                  # ~/.docrag/config.toml + corpus.json
//!   docrag --corpus data.json --top-k 2     # explicit corpus, fewer sources
//!   docrag --embedding-provider local       # offline embeddings

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use docrag_agent::{Session, SessionOptions};
use docrag_core::DocRagConfig;
use docrag_core::traits::{Embedder, Provider};
use docrag_knowledge::corpus::load_corpus_or_empty;
use docrag_knowledge::indexing::build_index_with;
use docrag_knowledge::normalize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docrag", version, about = "📚 DocRag: ask questions about your documents")]
struct Cli {
    /// Config file (default: ~/.docrag/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Corpus JSON file: [{"id", "title", "content"}, ...]
    #[arg(long)]
    corpus: Option<String>,

    /// Number of documents retrieved per question
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Completion provider (openai, ollama, custom:<url>, ...)
    #[arg(long)]
    provider: Option<String>,

    /// Completion model
    #[arg(long)]
    model: Option<String>,

    /// Embedding provider (openai, ollama, local, ...)
    #[arg(long)]
    embedding_provider: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut DocRagConfig) {
        if let Some(corpus) = &self.corpus {
            config.retrieval.corpus_path = corpus.clone();
        }
        if let Some(k) = self.top_k {
            config.retrieval.top_k = k;
        }
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(provider) = &self.embedding_provider {
            config.embedding.provider = provider.clone();
        }
    }
}

fn session_options(config: &DocRagConfig) -> SessionOptions {
    SessionOptions {
        top_k: config.retrieval.top_k,
        min_similarity: config.retrieval.min_similarity,
        query_timeout: match config.session.query_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
        params: config.generate_params(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries answers only.
    let filter = if cli.verbose {
        "docrag=debug,docrag_knowledge=debug,docrag_providers=debug,docrag_agent=debug"
    } else {
        "docrag=info,docrag_knowledge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => DocRagConfig::load_from(path)?,
        None => DocRagConfig::load()?,
    };
    cli.apply(&mut config);

    let corpus_path = PathBuf::from(shellexpand::tilde(&config.retrieval.corpus_path).to_string());
    let records = load_corpus_or_empty(&corpus_path);
    if records.is_empty() {
        println!("No data found in {}. Nothing to search.", corpus_path.display());
        return Ok(());
    }

    let embedder = docrag_providers::create_embedder(&config)?;
    let provider = docrag_providers::create_provider(&config)?;

    // Indexing failures are fatal: no index, no session.
    let store = build_index_with(
        normalize(&records),
        embedder.as_ref(),
        config.embedding.concurrency,
    )
    .await?;

    println!("📚 DocRag v{}", env!("CARGO_PKG_VERSION"));
    println!("   Documents:  {}", store.len());
    println!("   Embedder:   {}", embedder.identity());
    println!("   Model:      {} ({})", config.llm.model, provider.name());
    println!("   Type 'exit' to quit.");

    let session = Session::new(
        &store,
        embedder.as_ref(),
        provider.as_ref(),
        session_options(&config),
    );
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let answered = session.run(stdin, tokio::io::stdout()).await?;

    tracing::info!("👋 Answered {answered} question(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "docrag",
            "--corpus",
            "/tmp/c.json",
            "-k",
            "1",
            "--embedding-provider",
            "local",
        ]);
        let mut config = DocRagConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.retrieval.corpus_path, "/tmp/c.json");
        assert_eq!(config.retrieval.top_k, 1);
        assert_eq!(config.embedding.provider, "local");
        assert_eq!(config.llm.provider, "openai");
    }

    #[test]
    fn test_zero_timeout_disables() {
        let mut config = DocRagConfig::default();
        config.session.query_timeout_secs = 0;
        assert!(session_options(&config).query_timeout.is_none());
        config.session.query_timeout_secs = 30;
        assert_eq!(
            session_options(&config).query_timeout,
            Some(Duration::from_secs(30))
        );
    }
}
