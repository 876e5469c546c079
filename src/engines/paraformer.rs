use std::sync::Arc;

use crate::runtime::{AsrModel, GenerateOptions};
use crate::PipelineError;

use super::Transcriber;

/// Secondary model applied for punctuation restoration.
const PUNCTUATION_MODEL: &str = "ct-punc-c";

pub struct Paraformer {
    handle: Arc<dyn AsrModel>,
    options: GenerateOptions,
}

impl Paraformer {
    pub fn new(language: &str, handle: Arc<dyn AsrModel>) -> Self {
        let options = GenerateOptions {
            language: Some(resolve_language(language).to_string()),
            batch_size_s: 300,
            punctuation_model: Some(PUNCTUATION_MODEL.to_string()),
            hotword: Some(String::new()),
            ..GenerateOptions::default()
        };
        Self { handle, options }
    }
}

impl Transcriber for Paraformer {
    fn options(&self) -> &GenerateOptions {
        &self.options
    }

    fn transcribe(&mut self, samples: Vec<f32>) -> Result<String, PipelineError> {
        Ok(self.handle.generate(&samples, &self.options)?)
    }
}

/// Paraformer is Chinese-oriented: every request, `auto` and unsupported
/// codes included, collapses to `zh`.
pub(crate) fn resolve_language(_requested: &str) -> &'static str {
    "zh"
}
