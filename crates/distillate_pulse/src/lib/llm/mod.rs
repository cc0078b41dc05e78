mod distiller;
pub mod gemini;
pub mod openai;
mod reporter;
mod speech;

pub use distiller::{Distillation, Distiller};
pub use reporter::{ReportGenerator, ReportSections};
pub use speech::SpeechRenderer;
