use std::sync::{Arc, Mutex};

use distillate_pulse::{ReportGenerator, ReportSections};

#[derive(Clone)]
pub struct MockReportGenerator {
    pub report_calls: Arc<Mutex<Vec<String>>>,
    pub script_calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockReportGenerator {
    pub fn new() -> Self {
        Self {
            report_calls: Arc::new(Mutex::new(Vec::new())),
            script_calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new()
        }
    }
}

impl ReportGenerator for MockReportGenerator {
    type Error = anyhow::Error;

    async fn generate_report(&self, summaries: &str) -> anyhow::Result<ReportSections> {
        self.report_calls.lock().unwrap().push(summaries.to_string());

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        Ok(ReportSections {
            whats_new: "* fresh developments".into(),
            feature_brief_summary: "* **Topic:** covered".into(),
            key_takeaways: "* act on it".into(),
        })
    }

    async fn generate_script(&self, raw_text: &str) -> anyhow::Result<String> {
        self.script_calls.lock().unwrap().push(raw_text.to_string());

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        Ok("Welcome to your daily update!".into())
    }
}
