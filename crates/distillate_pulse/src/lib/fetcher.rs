use std::{future::Future, time::Duration};

use anyhow::Context;

use crate::retry::{with_retry, RetryPolicy};

/// Retrieval seam used by ingestion for feeds, pages, channel listings and
/// transcripts.
pub trait Fetcher {
    fn fetch_text(&self, url: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

impl<T: Fetcher + Send + Sync> Fetcher for &T {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        (**self).fetch_text(url).await
    }
}

/// HTTP fetcher carrying a realistic browser identity, a fixed request
/// timeout and policy-driven retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(policy: RetryPolicy) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .context("Failed to build http client")?;

        Ok(HttpFetcher { client, policy })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        with_retry(&self.policy, || async {
            let response = self
                .client
                .get(url)
                .header("Accept-Language", "en-US,en;q=0.9")
                .send()
                .await?
                .error_for_status()?;

            Ok::<_, anyhow::Error>(response.text().await?)
        })
        .await
        .inspect_err(|e| tracing::error!(error = ?e, url, "Fetch failed after retries"))
        .with_context(|| format!("Failed to fetch {url}"))
    }
}
