use anyhow::Context;
use chrono::Utc;
use distillate_store::{DataStore, NewItem};

use crate::{
    extract::extract_text_from_html,
    feeds::{self, FeedEntry},
    fetcher::Fetcher,
    sources::{Source, SourceKind},
    yt,
};

/// Number of entries considered per source in one collection pass.
pub const MAX_ENTRIES_PER_SOURCE: usize = 5;

/// Length of the transcript prefix used as the provisional summary.
const TRANSCRIPT_SUMMARY_CHARS: usize = 500;

/// The ingestion stage: pulls new items per registered source, deduplicates
/// against the store, and persists them oldest first so the store-assigned
/// insertion order tracks recency within a pass.
pub struct IngestCollector<D, F>
where
    D: DataStore + Send + Sync + 'static,
    F: Fetcher + Send + Sync + 'static,
{
    sources: Vec<Source>,
    store: D,
    fetcher: F,
    max_entries: usize,
}

impl<D, F> IngestCollector<D, F>
where
    D: DataStore + Send + Sync + 'static,
    F: Fetcher + Send + Sync + 'static,
{
    pub fn new(sources: Vec<Source>, store: D, fetcher: F) -> Self {
        IngestCollector {
            sources,
            store,
            fetcher,
            max_entries: MAX_ENTRIES_PER_SOURCE,
        }
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> anyhow::Result<()> {
        for source in &self.sources {
            tracing::info!(source = %source.name, kind = ?source.kind, "Collecting source");

            let outcome = match source.kind {
                SourceKind::Feed => self.collect_feed(source).await,
                SourceKind::VideoChannel => self.collect_channel(source).await,
            };

            // one source failing must not starve the rest
            if let Err(err) = outcome {
                tracing::error!(error = ?err, source = %source.name, "Source collection failed");
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(source = %source.name))]
    async fn collect_feed(&self, source: &Source) -> anyhow::Result<()> {
        let body = self.fetcher.fetch_text(&source.endpoint).await?;
        let mut entries = feeds::parse_feed(&body)?;
        entries.truncate(self.max_entries);

        let candidates: Vec<NewItem> = entries
            .into_iter()
            .filter_map(|entry| self.feed_candidate(source, entry))
            .collect();

        let candidate_ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        let existing = self
            .store
            .get_existing_item_ids(&candidate_ids)
            .await
            .context("Failed to check for existing items")?;

        let mut fresh: Vec<NewItem> = candidates
            .into_iter()
            .filter(|candidate| {
                if existing.contains(&candidate.id) {
                    tracing::debug!(item_id = %candidate.id, "Skipping: already present");
                    false
                } else {
                    true
                }
            })
            .collect();

        // persist oldest first so insertion order tracks recency
        fresh.sort_by_key(|candidate| candidate.published_at);

        for mut item in fresh {
            if source.full_text && item.audio_path.is_none() {
                match self.fetcher.fetch_text(&item.url).await {
                    Ok(html) => {
                        let text = extract_text_from_html(&html);
                        if !text.is_empty() {
                            item.raw_text = text;
                        }
                    }
                    // extraction failure is non-fatal; keep the feed blurb
                    Err(err) => {
                        tracing::warn!(error = ?err, url = %item.url, "Failed to fetch full page text");
                    }
                }
            }

            item.ingested_at = Utc::now();
            if let Err(err) = self.store.insert_item(&item).await {
                tracing::error!(error = ?err, item_id = %item.id, "Failed to persist item");
            }
        }

        Ok(())
    }

    /// Builds the insert payload for one feed entry, or skips it when the
    /// entry is missing its title or link.
    fn feed_candidate(&self, source: &Source, entry: FeedEntry) -> Option<NewItem> {
        let (Some(title), Some(url)) = (entry.title, entry.link) else {
            tracing::warn!(source = %source.name, "Skipping entry without title or link");
            return None;
        };

        let id = entry.id.unwrap_or_else(|| url.clone());
        let summary = entry.summary.unwrap_or_default();

        Some(NewItem {
            id,
            source: source.name.clone(),
            title,
            url,
            raw_text: summary.clone(),
            summary,
            audio_path: entry.audio_enclosure,
            published_at: entry.published.unwrap_or_else(Utc::now),
            ingested_at: Utc::now(),
        })
    }

    #[tracing::instrument(skip_all, fields(source = %source.name))]
    async fn collect_channel(&self, source: &Source) -> anyhow::Result<()> {
        let listing = self.fetcher.fetch_text(&source.endpoint).await?;
        let video_ids = yt::extract_video_ids(&listing, self.max_entries);

        let item_ids: Vec<String> = video_ids.iter().map(|v| format!("video:{v}")).collect();
        let id_refs: Vec<&str> = item_ids.iter().map(String::as_str).collect();
        let existing = self
            .store
            .get_existing_item_ids(&id_refs)
            .await
            .context("Failed to check for existing items")?;

        // the listing is most-recent-first; walk it backwards so older
        // videos land first and insertion order tracks recency
        for video_id in video_ids.iter().rev() {
            let item_id = format!("video:{video_id}");
            if existing.contains(&item_id) {
                tracing::debug!(item_id = %item_id, "Skipping: already present");
                continue;
            }

            if let Err(err) = self.collect_video(source, video_id, &item_id).await {
                tracing::error!(error = ?err, video_id = %video_id, "Failed to process video");
            }
        }

        Ok(())
    }

    async fn collect_video(
        &self,
        source: &Source,
        video_id: &str,
        item_id: &str,
    ) -> anyhow::Result<()> {
        let url = format!("{}?v={}", yt::WATCH_BASE_URL, video_id);
        let watch_html = self.fetcher.fetch_text(&url).await?;

        let title =
            yt::extract_title(&watch_html).unwrap_or_else(|| format!("Video {video_id}"));
        let published_at = yt::extract_publish_date(&watch_html).unwrap_or_else(Utc::now);

        let raw_text = yt::fetch_transcript(&self.fetcher, &watch_html).await?;
        let summary = transcript_summary(&raw_text);

        let item = NewItem {
            id: item_id.to_string(),
            source: source.name.clone(),
            title,
            url,
            raw_text,
            summary,
            audio_path: None,
            published_at,
            ingested_at: Utc::now(),
        };

        self.store.insert_item(&item).await?;

        Ok(())
    }
}

/// Provisional summary for a transcript: a fixed-length prefix.
fn transcript_summary(raw_text: &str) -> String {
    if raw_text.chars().count() > TRANSCRIPT_SUMMARY_CHARS {
        let prefix: String = raw_text.chars().take(TRANSCRIPT_SUMMARY_CHARS).collect();
        format!("{prefix}...")
    } else {
        raw_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_summary_truncates_long_text() {
        let long = "x".repeat(600);
        let summary = transcript_summary(&long);
        assert_eq!(summary.chars().count(), TRANSCRIPT_SUMMARY_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_transcript_summary_keeps_short_text() {
        assert_eq!(transcript_summary("short"), "short");
    }
}
