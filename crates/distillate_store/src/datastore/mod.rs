use std::{collections::HashSet, future::Future};

use chrono::{DateTime, Utc};

use crate::domain::{Item, NewItem, NewReport};

pub mod sqlite;

/// Storage operations the three pipeline stages depend on.
///
/// Ingestion uses the id lookups and `insert_item`; distillation uses the
/// `processed` transitions; synthesis uses the batch selectors and the
/// all-or-nothing `commit_report`.
pub trait DataStore {
    fn get_existing_item_ids(
        &self,
        item_ids: &[&str],
    ) -> impl Future<Output = anyhow::Result<HashSet<String>>> + Send;

    /// Inserts a new item, returning `false` if the id was already present
    /// (a duplicate is a skip, not an error).
    fn insert_item(&self, item: &NewItem) -> impl Future<Output = anyhow::Result<bool>> + Send;

    /// Items awaiting distillation, oldest first.
    fn unprocessed_items(&self) -> impl Future<Output = anyhow::Result<Vec<Item>>> + Send;

    /// Marks an item processed without a distillation result (no text).
    fn mark_processed(&self, item_id: &str) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Writes summary, category and the `processed` flag as one unit.
    fn record_distillation(
        &self,
        item_id: &str,
        category: &str,
        summary: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Items with `processed` set and `synthesized` unset, most recent first.
    fn pending_synthesis_items(&self) -> impl Future<Output = anyhow::Result<Vec<Item>>> + Send;

    /// The single most recent item from `source` whose `published_at` falls
    /// at or after `cutoff`, regardless of its `synthesized` flag.
    fn latest_source_item_since(
        &self,
        source: &str,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = anyhow::Result<Option<Item>>> + Send;

    /// Inserts the report and flips `synthesized` on every item in the batch
    /// inside one transaction. Returns the new report id.
    fn commit_report(
        &self,
        report: &NewReport,
        item_ids: &[String],
    ) -> impl Future<Output = anyhow::Result<i64>> + Send;
}

impl<T: DataStore + Send + Sync> DataStore for &T {
    async fn get_existing_item_ids(&self, item_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        (**self).get_existing_item_ids(item_ids).await
    }

    async fn insert_item(&self, item: &NewItem) -> anyhow::Result<bool> {
        (**self).insert_item(item).await
    }

    async fn unprocessed_items(&self) -> anyhow::Result<Vec<Item>> {
        (**self).unprocessed_items().await
    }

    async fn mark_processed(&self, item_id: &str) -> anyhow::Result<()> {
        (**self).mark_processed(item_id).await
    }

    async fn record_distillation(
        &self,
        item_id: &str,
        category: &str,
        summary: &str,
    ) -> anyhow::Result<()> {
        (**self)
            .record_distillation(item_id, category, summary)
            .await
    }

    async fn pending_synthesis_items(&self) -> anyhow::Result<Vec<Item>> {
        (**self).pending_synthesis_items().await
    }

    async fn latest_source_item_since(
        &self,
        source: &str,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Option<Item>> {
        (**self).latest_source_item_since(source, cutoff).await
    }

    async fn commit_report(&self, report: &NewReport, item_ids: &[String]) -> anyhow::Result<i64> {
        (**self).commit_report(report, item_ids).await
    }
}
