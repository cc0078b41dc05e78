use std::{path::Path, time::Duration};

use reqwest::Client;

use crate::llm::SpeechRenderer;

/// Client for the OpenAI text-to-speech API.
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl OpenAiSpeech {
    const SPEECH_MODEL: &'static str = "tts-1";
    /// Natural, engaging narration voice.
    const VOICE: &'static str = "nova";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_speech_request(&self, input: &str) -> Result<Vec<u8>, OpenAiError> {
        let body = serde_json::json!({
            "model": Self::SPEECH_MODEL,
            "voice": Self::VOICE,
            "input": input,
        });

        let resp = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .timeout(Self::REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAiError::Api { status, message });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

impl SpeechRenderer for OpenAiSpeech {
    type Error = OpenAiError;

    async fn render(&self, script: &str, output_path: &Path) -> Result<(), OpenAiError> {
        let bytes = self
            .send_speech_request(script)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to render speech"))?;

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output_path, bytes).await?;

        Ok(())
    }
}
