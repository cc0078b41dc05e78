use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use distillate_store::{DataStore, Item, NewItem, NewReport, Report};

/// In-memory stand-in for the sqlite store, assigning insertion sequence in
/// arrival order just like the real one.
#[derive(Clone, Default)]
pub struct MockDataStore {
    pub items: Arc<Mutex<Vec<Item>>>,
    pub reports: Arc<Mutex<Vec<Report>>>,
    pub fail_with: Option<String>,
}

impl MockDataStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    /// Seeds a pre-existing item, assigning the next insertion sequence
    /// unless the caller picked one.
    pub fn seed(&self, mut item: Item) {
        let mut items = self.items.lock().unwrap();
        if item.insertion_sequence == 0 {
            item.insertion_sequence = items.len() as i64 + 1;
        }
        items.push(item);
    }

    pub fn item(&self, id: &str) -> Option<Item> {
        self.items.lock().unwrap().iter().find(|i| i.id == id).cloned()
    }

    pub fn item_ids_in_insert_order(&self) -> Vec<String> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by_key(|i| i.insertion_sequence);
        items.into_iter().map(|i| i.id).collect()
    }
}

impl DataStore for MockDataStore {
    async fn get_existing_item_ids(&self, item_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        let items = self.items.lock().unwrap();
        Ok(item_ids
            .iter()
            .filter(|id| items.iter().any(|i| i.id == **id))
            .map(|id| id.to_string())
            .collect())
    }

    async fn insert_item(&self, item: &NewItem) -> anyhow::Result<bool> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        let mut items = self.items.lock().unwrap();
        if items.iter().any(|i| i.id == item.id) {
            return Ok(false);
        }

        let insertion_sequence = items.len() as i64 + 1;
        items.push(Item {
            insertion_sequence,
            id: item.id.clone(),
            source: item.source.clone(),
            title: item.title.clone(),
            url: item.url.clone(),
            raw_text: item.raw_text.clone(),
            summary: item.summary.clone(),
            category: None,
            audio_path: item.audio_path.clone(),
            published_at: item.published_at,
            ingested_at: item.ingested_at,
            processed: false,
            synthesized: false,
        });

        Ok(true)
    }

    async fn unprocessed_items(&self) -> anyhow::Result<Vec<Item>> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        let mut pending: Vec<Item> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| !i.processed)
            .cloned()
            .collect();
        pending.sort_by_key(|i| i.insertion_sequence);
        Ok(pending)
    }

    async fn mark_processed(&self, item_id: &str) -> anyhow::Result<()> {
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|i| i.id == item_id) {
            item.processed = true;
        }
        Ok(())
    }

    async fn record_distillation(
        &self,
        item_id: &str,
        category: &str,
        summary: &str,
    ) -> anyhow::Result<()> {
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|i| i.id == item_id) {
            item.summary = summary.to_string();
            item.category = Some(category.to_string());
            item.processed = true;
        }
        Ok(())
    }

    async fn pending_synthesis_items(&self) -> anyhow::Result<Vec<Item>> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        let mut pending: Vec<Item> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.processed && !i.synthesized)
            .cloned()
            .collect();
        pending.sort_by_key(|i| std::cmp::Reverse(i.insertion_sequence));
        Ok(pending)
    }

    async fn latest_source_item_since(
        &self,
        source: &str,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Option<Item>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.source == source && i.published_at >= cutoff)
            .max_by_key(|i| i.insertion_sequence)
            .cloned())
    }

    async fn commit_report(&self, report: &NewReport, item_ids: &[String]) -> anyhow::Result<i64> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        let mut items = self.items.lock().unwrap();
        for item_id in item_ids {
            if let Some(item) = items.iter_mut().find(|i| i.id == *item_id) {
                item.synthesized = true;
            }
        }

        let mut reports = self.reports.lock().unwrap();
        let id = reports.len() as i64 + 1;
        reports.push(Report {
            id,
            generated_at: report.generated_at,
            whats_new: report.whats_new.clone(),
            feature_brief_summary: report.feature_brief_summary.clone(),
            key_takeaways: report.key_takeaways.clone(),
            audio_path: report.audio_path.clone(),
        });

        Ok(id)
    }
}
