use std::sync::Arc;

use crate::runtime::{AsrModel, GenerateOptions};
use crate::PipelineError;

use super::Transcriber;

/// Priming prompts, keyed by requested language: a short example sentence
/// fed to the decoder to bias its output toward the target language.
const PROMPTS: [(&str, &str); 4] = [
    ("auto", ""),
    ("en", "Tom, There is a Chinese person among them."),
    ("zh", "我是一个台湾人，也是一个中国人。"),
    ("ja", "その中に、一人の日本人がいます。誰だと思いますか？"),
];

pub struct Whisper {
    handle: Arc<dyn AsrModel>,
    options: GenerateOptions,
}

impl Whisper {
    pub fn new(language: &str, handle: Arc<dyn AsrModel>) -> Self {
        let options = GenerateOptions {
            language: resolve_language(language).map(str::to_string),
            task: Some("transcribe".to_string()),
            without_timestamps: true,
            fp16: true,
            batch_size_s: 0,
            prompt: Some(priming_prompt(language).to_string()),
            ..GenerateOptions::default()
        };
        Self { handle, options }
    }
}

impl Transcriber for Whisper {
    fn options(&self) -> &GenerateOptions {
        &self.options
    }

    fn transcribe(&mut self, samples: Vec<f32>) -> Result<String, PipelineError> {
        Ok(self.handle.generate(&samples, &self.options)?)
    }
}

/// `auto` and anything off the allow-list decode with language detection.
pub(crate) fn resolve_language(requested: &str) -> Option<&str> {
    match requested {
        "zh" | "en" | "ja" => Some(requested),
        _ => None,
    }
}

pub(crate) fn priming_prompt(requested: &str) -> &'static str {
    PROMPTS
        .iter()
        .find(|(language, _)| *language == requested)
        .map(|(_, prompt)| *prompt)
        .unwrap_or("")
}
