use std::sync::{Arc, Mutex};

use distillate_pulse::{Distillation, Distiller};

#[derive(Clone)]
pub struct MockDistiller {
    pub category: String,
    pub summary: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub failures_remaining: Arc<Mutex<u32>>,
    pub fail_with: Option<String>,
}

impl MockDistiller {
    pub fn new(category: &str, summary: &str) -> Self {
        Self {
            category: category.to_string(),
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures_remaining: Arc::new(Mutex::new(0)),
            fail_with: None,
        }
    }

    /// Always fails.
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("", "")
        }
    }

    /// Fails the first `failures` calls, then succeeds.
    pub fn flaky(category: &str, summary: &str, failures: u32) -> Self {
        let mock = Self::new(category, summary);
        *mock.failures_remaining.lock().unwrap() = failures;
        mock
    }
}

impl Distiller for MockDistiller {
    type Error = anyhow::Error;

    async fn distill(&self, text: &str) -> anyhow::Result<Distillation> {
        self.calls.lock().unwrap().push(text.to_string());

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        let mut remaining = self.failures_remaining.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(anyhow::anyhow!("transient model failure"));
        }

        Ok(Distillation {
            category: self.category.clone(),
            summary: self.summary.clone(),
        })
    }
}
