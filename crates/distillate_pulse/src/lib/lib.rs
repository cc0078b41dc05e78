mod distill;
mod error;
pub mod extract;
pub mod feeds;
mod fetcher;
mod guard;
mod ingest;
mod llm;
mod retry;
pub mod sources;
mod synthesize;
pub mod tracing;
pub mod yt;

pub use distill::DistillWorker;
pub use error::Error;
pub use fetcher::{Fetcher, HttpFetcher};
pub use guard::RunGuard;
pub use ingest::{IngestCollector, MAX_ENTRIES_PER_SOURCE};
pub use llm::{
    gemini, openai, Distillation, Distiller, ReportGenerator, ReportSections, SpeechRenderer,
};
pub use retry::{with_retry, RetryPolicy};
pub use synthesize::SynthesisWorker;
