use std::{fmt::Debug, future::Future};

use serde::Deserialize;

/// Per-item distillation result, as enforced by the structured-output
/// contract.
#[derive(Debug, Clone, Deserialize)]
pub struct Distillation {
    pub category: String,
    pub summary: String,
}

pub trait Distiller {
    type Error: Debug;

    fn distill(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Distillation, Self::Error>> + Send;
}
