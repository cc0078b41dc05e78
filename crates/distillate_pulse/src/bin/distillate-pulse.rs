use std::path::PathBuf;

use clap::{Parser, Subcommand};
use distillate_pulse::{
    gemini::GeminiClient, openai::OpenAiSpeech, sources::default_sources,
    tracing::init_tracing_subscriber, DistillWorker, HttpFetcher, IngestCollector, RetryPolicy,
    SynthesisWorker,
};
use distillate_store::SqliteDataStore;

#[derive(Parser)]
#[command(name = "distillate-pulse", about = "AI news distillation pipeline")]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://distillate.db")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect new items from every registered source
    Ingest,
    /// Categorize and summarize unprocessed items
    Distill {
        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY")]
        gemini_key: String,

        /// Path of the single-instance guard token
        #[arg(long, default_value = "/var/tmp/ai-distillate/distillation.lock")]
        guard_path: PathBuf,
    },
    /// Fold the enriched backlog into a new executive report with audio
    Synthesize {
        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY")]
        gemini_key: String,

        /// OpenAI API key, used for speech synthesis
        #[arg(long, env = "OPENAI_API_KEY")]
        openai_key: String,

        /// Directory receiving rendered audio artifacts
        #[arg(long, default_value = "/var/tmp/ai-distillate/audio")]
        artifacts_dir: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let store = SqliteDataStore::init(&cli.database_url).await?;

    match cli.command {
        Command::Ingest => {
            tracing::info!("Running ingestion...");
            let fetcher = HttpFetcher::new(RetryPolicy::fetch())?;
            let collector = IngestCollector::new(default_sources(), store, fetcher);
            collector.run().await?;
        }
        Command::Distill {
            gemini_key,
            guard_path,
        } => {
            tracing::info!("Running distillation...");
            let gemini = GeminiClient::new(gemini_key);
            let worker = DistillWorker::new(store, gemini, guard_path);
            worker.run().await?;
        }
        Command::Synthesize {
            gemini_key,
            openai_key,
            artifacts_dir,
        } => {
            tracing::info!("Running synthesis...");
            let gemini = GeminiClient::new(gemini_key);
            let speech = OpenAiSpeech::new(openai_key);
            let worker = SynthesisWorker::new(store, gemini, speech, artifacts_dir);
            worker.run().await?;
        }
    }

    Ok(())
}
