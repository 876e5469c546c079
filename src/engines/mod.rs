//! Per-model transcription behavior.
//!
//! Every backend shares a slice-in/text-out contract but differs in the
//! inference parameters it wants and the text cleanup its output needs.
//! Each variant here prepares a [`GenerateOptions`] for the job's language
//! and post-processes whatever the opaque model handle returns:
//!
//! - **SenseVoiceSmall** — multilingual, ITN enabled; output is stripped of
//!   rich-annotation markup and emoji, and dense-script languages lose
//!   their whitespace.
//! - **Whisper** — decodes with a per-language priming prompt, timestamps
//!   suppressed; text passes through untouched.
//! - **Paraformer** — Chinese-oriented; punctuation restored by a
//!   secondary model pass.
//!
//! The segmentation driver is written only against [`Transcriber`] and
//! obtains variants exclusively through [`build`].

pub mod paraformer;
pub mod sensevoice;
pub mod whisper;

pub use paraformer::Paraformer;
pub use sensevoice::SenseVoice;
pub use whisper::Whisper;

use std::sync::Arc;

use crate::runtime::{AsrModel, GenerateOptions};
use crate::{ModelKind, PipelineError};

/// Shared contract between the segmentation driver and the model variants.
pub trait Transcriber {
    /// The inference options prepared for this job's language.
    fn options(&self) -> &GenerateOptions;

    /// Transcribe one mono 16 kHz slice into cleaned text.
    fn transcribe(&mut self, samples: Vec<f32>) -> Result<String, PipelineError>;
}

/// Build the transcriber variant for `kind`, resolving `language` against
/// the model's allow-list.
pub fn build(kind: ModelKind, language: &str, handle: Arc<dyn AsrModel>) -> Box<dyn Transcriber> {
    match kind {
        ModelKind::SenseVoiceSmall => Box::new(SenseVoice::new(language, handle)),
        ModelKind::Whisper => Box::new(Whisper::new(language, handle)),
        ModelKind::Paraformer => Box::new(Paraformer::new(language, handle)),
    }
}

/// The language choices the UI offers for each model.
pub fn language_choices(kind: ModelKind) -> &'static [&'static str] {
    match kind {
        ModelKind::SenseVoiceSmall => &["auto", "zh", "en", "yue", "ja", "ko"],
        ModelKind::Whisper => &["auto", "zh", "en", "ja"],
        ModelKind::Paraformer => &["auto", "zh"],
    }
}
