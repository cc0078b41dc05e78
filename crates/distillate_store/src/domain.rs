use chrono::{DateTime, Utc};

/// One ingested content unit: an article pulled from a syndicated feed or a
/// video transcript.
///
/// Lifecycle flags: `processed` flips once distillation has produced a
/// category/summary (or found nothing to distill), `synthesized` flips once
/// the item has been folded into at least one report.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Item {
    /// Store-assigned monotonic counter. Establishes recency order
    /// independent of declared publish timestamps.
    pub insertion_sequence: i64,
    /// Source-provided identifier, the item URL, or `video:<platform-id>`.
    pub id: String,
    pub source: String,
    pub title: String,
    pub url: String,
    pub raw_text: String,
    pub summary: String,
    /// Set only after successful distillation.
    pub category: Option<String>,
    /// Set for items that ship a native audio enclosure.
    pub audio_path: Option<String>,
    pub published_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
    pub processed: bool,
    pub synthesized: bool,
}

/// Insert payload for an [`Item`]. The store assigns `insertion_sequence`;
/// `category` starts null and both lifecycle flags start false.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub id: String,
    pub source: String,
    pub title: String,
    pub url: String,
    pub raw_text: String,
    pub summary: String,
    pub audio_path: Option<String>,
    pub published_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
}

/// One synthesized executive edition covering a batch of items.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Report {
    pub id: i64,
    pub generated_at: DateTime<Utc>,
    pub whats_new: String,
    pub feature_brief_summary: String,
    pub key_takeaways: String,
    pub audio_path: String,
}

/// Insert payload for a [`Report`].
#[derive(Debug, Clone)]
pub struct NewReport {
    pub generated_at: DateTime<Utc>,
    pub whats_new: String,
    pub feature_brief_summary: String,
    pub key_takeaways: String,
    pub audio_path: String,
}
