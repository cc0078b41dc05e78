use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use distillate_pulse::SpeechRenderer;

#[derive(Clone)]
pub struct MockSpeechRenderer {
    pub calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
    pub fail_with: Option<String>,
}

impl Default for MockSpeechRenderer {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockSpeechRenderer {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl SpeechRenderer for MockSpeechRenderer {
    type Error = anyhow::Error;

    async fn render(&self, script: &str, output_path: &Path) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((script.to_string(), output_path.to_path_buf()));

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        Ok(())
    }
}
