use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Utc};
use distillate_store::{DataStore, Item, NewReport};
use itertools::Itertools;

use crate::{
    llm::{ReportGenerator, SpeechRenderer},
    retry::{with_retry, RetryPolicy},
    sources::LIVE_BRIEFING_SOURCE,
};

/// Trailing freshness window within which the latest live-briefing item is
/// always represented in a new report.
const LIVE_BRIEFING_WINDOW_HOURS: i64 = 24;

/// The synthesis stage: folds the eligible batch into one executive report
/// plus its spoken-audio rendition, committed atomically.
pub struct SynthesisWorker<D, R, S>
where
    D: DataStore + Send + Sync + 'static,
    R: ReportGenerator + Send + Sync + 'static,
    S: SpeechRenderer + Send + Sync + 'static,
{
    store: D,
    reporter: R,
    speech: S,
    live_source: String,
    artifacts_dir: PathBuf,
    retry: RetryPolicy,
}

impl<D, R, S> SynthesisWorker<D, R, S>
where
    D: DataStore + Send + Sync + 'static,
    R: ReportGenerator + Send + Sync + 'static,
    S: SpeechRenderer + Send + Sync + 'static,
{
    pub fn new(store: D, reporter: R, speech: S, artifacts_dir: impl Into<PathBuf>) -> Self {
        SynthesisWorker {
            store,
            reporter,
            speech,
            live_source: LIVE_BRIEFING_SOURCE.to_string(),
            artifacts_dir: artifacts_dir.into(),
            retry: RetryPolicy::language_model(),
        }
    }

    pub fn live_source(mut self, source: impl Into<String>) -> Self {
        self.live_source = source.into();
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Produces at most one new report covering the eligible batch, or does
    /// nothing when the batch is empty.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let batch = self.select_batch().await?;
        if batch.is_empty() {
            tracing::info!("No items eligible for synthesis");
            return Ok(());
        }

        tracing::info!(count = batch.len(), "Synthesizing items into an executive report");

        // summary corpus for the structured report, raw corpus for the
        // spoken script; both tagged for attribution inside the prompt
        let summaries = batch
            .iter()
            .map(|item| {
                format!(
                    "Source: {}\nTitle: {}\nSummary: {}",
                    item.source, item.title, item.summary
                )
            })
            .join("\n\n");
        let raw_text = batch
            .iter()
            .map(|item| {
                format!(
                    "Source: {}\nTitle: {}\nContent: {}",
                    item.source, item.title, item.raw_text
                )
            })
            .join("\n\n");

        if summaries.trim().is_empty() {
            tracing::info!("Aggregated corpus is empty; skipping synthesis");
            return Ok(());
        }

        let sections = with_retry(&self.retry, || self.reporter.generate_report(&summaries))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to generate executive report: {e:?}"))?;

        let script = with_retry(&self.retry, || self.reporter.generate_script(&raw_text))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to generate narration script: {e:?}"))?;

        let generated_at = Utc::now();
        let audio_path = self
            .artifacts_dir
            .join(format!("briefing_{}.mp3", generated_at.format("%Y%m%d_%H%M%S")));

        with_retry(&self.retry, || self.speech.render(&script, &audio_path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to render audio: {e:?}"))?;

        let report = NewReport {
            generated_at,
            whats_new: sections.whats_new,
            feature_brief_summary: sections.feature_brief_summary,
            key_takeaways: sections.key_takeaways,
            audio_path: audio_path.display().to_string(),
        };
        let item_ids: Vec<String> = batch.iter().map(|item| item.id.clone()).collect();

        let report_id = self
            .store
            .commit_report(&report, &item_ids)
            .await
            .context("Failed to commit report")?;

        tracing::info!(report_id, items = item_ids.len(), "Report committed");

        Ok(())
    }

    /// The eligible batch: every processed-but-unsynthesized item, most
    /// recent first, plus the newest live-briefing item inside the trailing
    /// window regardless of its `synthesized` flag.
    async fn select_batch(&self) -> anyhow::Result<Vec<Item>> {
        let mut batch = self.store.pending_synthesis_items().await?;

        let cutoff = Utc::now() - Duration::hours(LIVE_BRIEFING_WINDOW_HOURS);
        if let Some(live) = self
            .store
            .latest_source_item_since(&self.live_source, cutoff)
            .await?
        {
            if !batch.iter().any(|item| item.id == live.id) {
                batch.push(live);
            }
        }

        Ok(batch)
    }
}
