use std::{collections::HashSet, str::FromStr};

use anyhow::Context;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};

use crate::{
    datastore::DataStore,
    domain::{Item, NewItem, NewReport, Report},
};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct SqliteDataStore {
    pub pool: SqlitePool,
}

impl SqliteDataStore {
    /// Open the database (creating the file if missing) and apply any
    /// pending migrations before first use.
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid sqlite database URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to sqlite database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(SqliteDataStore { pool })
    }

    pub async fn get_item(&self, item_id: &str) -> anyhow::Result<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch item")
    }

    /// The most recently ingested item from a source, by insertion order
    /// rather than by declared publish timestamp. This is the read the
    /// dashboard relies on.
    pub async fn newest_item_for_source(&self, source: &str) -> anyhow::Result<Option<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE source = ? ORDER BY insertion_sequence DESC LIMIT 1",
        )
        .bind(source)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch newest item for source")
    }

    pub async fn latest_report(&self) -> anyhow::Result<Option<Report>> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch latest report")
    }
}

impl DataStore for SqliteDataStore {
    async fn get_existing_item_ids(&self, item_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        #[derive(sqlx::FromRow)]
        struct ItemId {
            id: String,
        }

        if item_ids.is_empty() {
            return Ok(HashSet::new());
        }

        // sqlite has no `= ANY($1)`; expand one placeholder per id
        let placeholders = item_ids.iter().map(|_| "?").join(", ");
        let sql = format!("SELECT id FROM items WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, ItemId>(&sql);
        for id in item_ids {
            query = query.bind(*id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch existing item ids"))
            .context("Failed to fetch existing item ids")?;

        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    async fn insert_item(&self, item: &NewItem) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (id, source, title, url, raw_text, summary, audio_path, published_at, ingested_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&item.id)
        .bind(&item.source)
        .bind(&item.title)
        .bind(&item.url)
        .bind(&item.raw_text)
        .bind(&item.summary)
        .bind(&item.audio_path)
        .bind(item.published_at)
        .bind(item.ingested_at)
        .execute(&self.pool)
        .await
        .inspect_err(|err| {
            tracing::error!(
                error = ?err,
                item_id = %item.id,
                "Failed to insert item"
            )
        })
        .context("Failed to insert item")?;

        Ok(result.rows_affected() > 0)
    }

    async fn unprocessed_items(&self) -> anyhow::Result<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE processed = 0 ORDER BY insertion_sequence ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch unprocessed items")
    }

    async fn mark_processed(&self, item_id: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE items SET processed = 1 WHERE id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await
            .context("Failed to mark item processed")?;

        Ok(())
    }

    async fn record_distillation(
        &self,
        item_id: &str,
        category: &str,
        summary: &str,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE items SET summary = ?, category = ?, processed = 1 WHERE id = ?")
            .bind(summary)
            .bind(category)
            .bind(item_id)
            .execute(&self.pool)
            .await
            .inspect_err(|err| {
                tracing::error!(error = ?err, item_id = %item_id, "Failed to record distillation")
            })
            .context("Failed to record distillation")?;

        Ok(())
    }

    async fn pending_synthesis_items(&self) -> anyhow::Result<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE processed = 1 AND synthesized = 0 ORDER BY insertion_sequence DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch items pending synthesis")
    }

    async fn latest_source_item_since(
        &self,
        source: &str,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Option<Item>> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE source = ? AND published_at >= ?
            ORDER BY insertion_sequence DESC
            LIMIT 1
            "#,
        )
        .bind(source)
        .bind(cutoff)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch latest source item")
    }

    async fn commit_report(&self, report: &NewReport, item_ids: &[String]) -> anyhow::Result<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin report transaction")?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO reports (generated_at, whats_new, feature_brief_summary, key_takeaways, audio_path)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(report.generated_at)
        .bind(&report.whats_new)
        .bind(&report.feature_brief_summary)
        .bind(&report.key_takeaways)
        .bind(&report.audio_path)
        .execute(&mut *tx)
        .await
        .inspect_err(|err| tracing::error!(error = ?err, "Failed to insert report"))
        .context("Failed to insert report")?;

        for item_id in item_ids {
            sqlx::query("UPDATE items SET synthesized = 1 WHERE id = ?")
                .bind(item_id)
                .execute(&mut *tx)
                .await
                .inspect_err(|err| {
                    tracing::error!(error = ?err, item_id = %item_id, "Failed to flag item synthesized")
                })
                .context("Failed to flag item synthesized")?;
        }

        tx.commit()
            .await
            .context("Failed to commit report transaction")?;

        Ok(inserted.last_insert_rowid())
    }
}
