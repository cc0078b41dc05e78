use std::{fmt::Debug, future::Future};

use serde::Deserialize;

/// The three narrative sections of an executive report.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSections {
    pub whats_new: String,
    pub feature_brief_summary: String,
    pub key_takeaways: String,
}

pub trait ReportGenerator {
    type Error: Debug;

    /// Structured three-section report over the summary corpus.
    fn generate_report(
        &self,
        summaries: &str,
    ) -> impl Future<Output = Result<ReportSections, Self::Error>> + Send;

    /// Free-form spoken-word script over the raw-text corpus.
    fn generate_script(
        &self,
        raw_text: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
