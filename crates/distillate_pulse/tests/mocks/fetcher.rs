use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use distillate_pulse::Fetcher;

/// Serves canned bodies by URL; unknown URLs fail like a dead network.
#[derive(Clone, Default)]
pub struct MockFetcher {
    pub responses: Arc<Mutex<HashMap<String, String>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn with_response(self, url: &str, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    pub fn fetched(&self, url: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|u| u == url)
    }
}

impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No canned response for {url}"))
    }
}
