pub mod audio;
pub mod cache;
pub mod engines;
pub mod error;
pub mod locale;
pub mod pipeline;
pub mod runtime;
pub mod session;
pub mod subtitle;

pub use error::PipelineError;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::runtime::DEFAULT_SILENCE_THRESHOLD_MS;

/// The ASR models a job can select between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    SenseVoiceSmall,
    Whisper,
    Paraformer,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::SenseVoiceSmall,
        ModelKind::Whisper,
        ModelKind::Paraformer,
    ];
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::SenseVoiceSmall => "SenseVoiceSmall",
            ModelKind::Whisper => "Whisper",
            ModelKind::Paraformer => "Paraformer",
        };
        f.write_str(name)
    }
}

/// One transcribed speech span of a subtitle document.
///
/// Indices are 1-based and strictly sequential within a single run, and
/// `end_ms` is always greater than `start_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub index: u32,
    pub start_ms: f64,
    pub end_ms: f64,
    pub text: String,
}

/// Everything needed to transcribe one audio file. Created per invocation
/// and never persisted beyond the run.
#[derive(Debug, Clone)]
pub struct TranscriptionJob {
    pub source: PathBuf,
    pub model: ModelKind,
    pub language: String,
    pub silence_threshold_ms: u32,
}

impl TranscriptionJob {
    pub fn new(source: impl Into<PathBuf>, model: ModelKind, language: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            model,
            language: language.into(),
            silence_threshold_ms: DEFAULT_SILENCE_THRESHOLD_MS,
        }
    }
}
