use std::{fmt::Debug, future::Future, path::Path};

pub trait SpeechRenderer {
    type Error: Debug;

    /// Renders the script to an audio artifact at `output_path`.
    fn render(
        &self,
        script: &str,
        output_path: &Path,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
