use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use precis::{
    config, logging, model,
    pipeline::{SummarizeOptions, SummaryApi, SummaryService},
};

#[derive(Parser)]
#[command(
    name = "summarize",
    about = "Summarize a PDF, text, or markdown document from the command line"
)]
struct Cli {
    /// File to summarize (.pdf, .txt, .md).
    file: Option<PathBuf>,
    /// Summarize inline text instead of a file.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    /// Override the summary word ceiling.
    #[arg(long)]
    max_words: Option<usize>,
    /// Override the summary word floor.
    #[arg(long)]
    min_words: Option<usize>,
}

#[tokio::main]
async fn main() {
    config::init_config();
    logging::init_tracing();
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let defaults = SummarizeOptions::from_config(config::get_config());
    let options = SummarizeOptions {
        max_words: cli.max_words.unwrap_or(defaults.max_words),
        min_words: cli.min_words.unwrap_or(defaults.min_words),
        ..defaults
    };

    let service = SummaryService::new();
    let outcome = match (&cli.file, &cli.text) {
        (Some(path), _) => service.summarize_file(path, options).await?,
        (None, Some(text)) => service.summarize_text(text, options).await?,
        (None, None) => bail!("provide a file path or --text"),
    };

    println!("{}", outcome.text);
    tracing::info!(
        method = ?outcome.method,
        words = outcome.word_count,
        chunks = outcome.chunk_count,
        fallback_chunks = outcome.fallback_chunks,
        recompressed = outcome.recompressed,
        "Summary metadata"
    );

    model::release_shared().await;
    Ok(())
}
