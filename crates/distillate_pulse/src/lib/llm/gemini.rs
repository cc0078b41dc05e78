use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::llm::{Distillation, Distiller, ReportGenerator, ReportSections};

/// Client for the Gemini generateContent API, used for both structured and
/// free-text calls.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Empty response from model")]
    EmptyResponse,
    #[error("Malformed structured response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl GeminiClient {
    const MODEL: &'static str = "gemini-2.5-flash";
    const DISTILL_PROMPT: &'static str = include_str!("./prompts/distill.txt");
    const REPORT_PROMPT: &'static str = include_str!("./prompts/report.txt");
    const SCRIPT_PROMPT: &'static str = include_str!("./prompts/script.txt");
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sends a generateContent request and returns the first candidate's
    /// text, treating an empty candidate list as a failure.
    pub async fn send_generate_request(
        &self,
        body: serde_json::Value,
    ) -> Result<String, GeminiError> {
        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url,
                Self::MODEL
            ))
            .timeout(Self::REQUEST_TIMEOUT)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, message });
        }

        let response = resp.json::<GenerateContentResponse>().await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GeminiError::EmptyResponse)
    }

    /// Structured-output call: the model is constrained to `schema` and the
    /// returned JSON is parsed into `T`.
    async fn send_structured_request<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: serde_json::Value,
        temperature: Option<f32>,
    ) -> Result<T, GeminiError> {
        let mut generation_config = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
        if let Some(temperature) = temperature {
            generation_config["temperature"] = json!(temperature);
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        let text = self.send_generate_request(body).await?;

        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl Distiller for GeminiClient {
    type Error = GeminiError;

    async fn distill(&self, text: &str) -> Result<Distillation, GeminiError> {
        let prompt = format!("{}\nText to process:\n{}", Self::DISTILL_PROMPT, text);
        let schema = json!({
            "type": "object",
            "properties": {
                "category": { "type": "string" },
                "summary": { "type": "string" }
            },
            "required": ["category", "summary"]
        });

        self.send_structured_request(prompt, schema, None)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to distill item"))
    }
}

impl ReportGenerator for GeminiClient {
    type Error = GeminiError;

    async fn generate_report(&self, summaries: &str) -> Result<ReportSections, GeminiError> {
        let prompt = format!(
            "{}\nRaw Summaries Batch:\n{}",
            Self::REPORT_PROMPT,
            summaries
        );
        let schema = json!({
            "type": "object",
            "properties": {
                "whats_new": { "type": "string" },
                "feature_brief_summary": { "type": "string" },
                "key_takeaways": { "type": "string" }
            },
            "required": ["whats_new", "feature_brief_summary", "key_takeaways"]
        });

        // lower temperature for analytical output
        self.send_structured_request(prompt, schema, Some(0.2))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate report"))
    }

    async fn generate_script(&self, raw_text: &str) -> Result<String, GeminiError> {
        let prompt = format!("{}\nRaw Articles:\n{}", Self::SCRIPT_PROMPT, raw_text);
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        self.send_generate_request(body)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate script"))
    }
}
