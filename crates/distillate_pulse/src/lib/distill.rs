use std::path::PathBuf;

use distillate_store::DataStore;

use crate::{
    guard::RunGuard,
    llm::Distiller,
    retry::{with_retry, RetryPolicy},
};

/// The distillation stage: turns every unprocessed item into a category and
/// condensed summary via the language-model service, guarded against
/// overlapping self-invocations.
pub struct DistillWorker<D, L>
where
    D: DataStore + Send + Sync + 'static,
    L: Distiller + Send + Sync + 'static,
{
    store: D,
    distiller: L,
    guard_path: PathBuf,
    retry: RetryPolicy,
}

impl<D, L> DistillWorker<D, L>
where
    D: DataStore + Send + Sync + 'static,
    L: Distiller + Send + Sync + 'static,
{
    pub fn new(store: D, distiller: L, guard_path: impl Into<PathBuf>) -> Self {
        DistillWorker {
            store,
            distiller,
            guard_path: guard_path.into(),
            retry: RetryPolicy::language_model(),
        }
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let Some(_guard) = RunGuard::acquire(&self.guard_path)? else {
            tracing::warn!("Distillation already running elsewhere; exiting without work");
            return Ok(());
        };

        let items = self.store.unprocessed_items().await?;
        if items.is_empty() {
            tracing::info!("No unprocessed items found");
            return Ok(());
        }

        tracing::info!(count = items.len(), "Distilling unprocessed items");

        for item in &items {
            if item.raw_text.trim().is_empty() {
                tracing::info!(item_id = %item.id, "Item has no text; marking processed");
                self.store.mark_processed(&item.id).await?;
                continue;
            }

            let distilled =
                with_retry(&self.retry, || self.distiller.distill(&item.raw_text)).await;

            match distilled {
                Ok(result) => {
                    self.store
                        .record_distillation(&item.id, &result.category, &result.summary)
                        .await?;
                    tracing::info!(item_id = %item.id, category = %result.category, "Distilled item");
                }
                // the item stays unprocessed and is retried next invocation
                Err(err) => {
                    tracing::error!(
                        error = ?err,
                        item_id = %item.id,
                        "Distillation failed; leaving item unprocessed"
                    );
                }
            }
        }

        Ok(())
    }
}
