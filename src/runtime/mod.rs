//! Boundary to the external inference backends.
//!
//! The ASR and VAD models themselves are opaque collaborators: this crate
//! only relies on a `generate` contract (samples in, text out for ASR; a
//! file path in, speech spans out for VAD). [`ModelRuntime`] is the seam
//! through which concrete backends are injected, so the pipeline never
//! names a specific inference library.
//!
//! A [`LocalRuntime`] ships with the crate. It serves the Whisper kind via
//! whisper-rs and segments audio with the bundled [`EnergyVad`]; the other
//! model kinds remain reachable through any external `ModelRuntime`
//! implementation.

pub mod local;
pub mod vad;
pub mod whisper;

pub use local::LocalRuntime;
pub use vad::EnergyVad;
pub use whisper::WhisperModel;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ModelKind;

/// Hard cap on the length of a single detected speech segment.
pub const MAX_SEGMENT_MS: u32 = 30_000;

/// Default for the maximum trailing silence before the VAD cuts a segment.
pub const DEFAULT_SILENCE_THRESHOLD_MS: u32 = 800;

/// Upper bound of the silence-threshold slider.
pub const MAX_SILENCE_THRESHOLD_MS: u32 = 6_000;

/// Default RMS amplitude below which a frame counts as silence.
pub const DEFAULT_RMS_THRESHOLD: f32 = 0.01;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The runtime has no backend that can serve this model kind.
    #[error("no backend available for model {0}")]
    ModelUnavailable(ModelKind),

    /// A backend was configured but its model file is missing.
    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),

    /// Any failure raised inside the inference library.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Where a model is constructed: a hardware accelerator when the build
/// carries one, the general-purpose processor otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Accelerator,
    Cpu,
}

impl Device {
    /// Accelerator support is decided at build time (Metal on macOS,
    /// Vulkan on Windows), matching the backend feature tables.
    pub fn detect() -> Self {
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            Device::Accelerator
        } else {
            Device::Cpu
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Accelerator => f.write_str("accelerator"),
            Device::Cpu => f.write_str("cpu"),
        }
    }
}

/// Union of the inference knobs the supported backends understand.
///
/// Each engine variant fills in the fields its backend cares about and
/// leaves the rest at their defaults; backends ignore fields they have no
/// equivalent for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Resolved model-specific language token. `None` means auto-detect.
    pub language: Option<String>,
    /// Inverse text normalization ("twenty three" -> "23").
    pub use_itn: bool,
    /// Merge VAD-internal sub-segments before decoding.
    pub merge_vad: bool,
    pub merge_length_s: u32,
    pub batch_size_s: u32,
    /// Priming prompt used to bias decoding toward a language/style.
    pub prompt: Option<String>,
    pub task: Option<String>,
    /// Suppress backend timestamp emission (timestamps come from the VAD).
    pub without_timestamps: bool,
    pub fp16: bool,
    /// Secondary punctuation-restoration model, when the backend has one.
    pub punctuation_model: Option<String>,
    pub hotword: Option<String>,
}

/// One detected speech range, in milliseconds from the start of the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechSpan {
    pub start_ms: f64,
    pub end_ms: f64,
}

/// Parameters for constructing a VAD instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VadConfig {
    /// Maximum trailing silence before a segment is cut, clamped to
    /// [`MAX_SILENCE_THRESHOLD_MS`].
    pub max_end_silence_ms: u32,
    /// Single-segment length cap, fixed at [`MAX_SEGMENT_MS`].
    pub max_segment_ms: u32,
    /// RMS amplitude below which a frame counts as silence.
    pub rms_threshold: f32,
}

impl VadConfig {
    pub fn new(max_end_silence_ms: u32) -> Self {
        Self {
            max_end_silence_ms: max_end_silence_ms.min(MAX_SILENCE_THRESHOLD_MS),
            max_segment_ms: MAX_SEGMENT_MS,
            rms_threshold: DEFAULT_RMS_THRESHOLD,
        }
    }
}

impl Default for VadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SILENCE_THRESHOLD_MS)
    }
}

/// A loaded ASR model. Handles are immutable after construction and shared
/// across jobs through the model cache.
pub trait AsrModel: Send + Sync {
    /// Transcribe mono 16 kHz samples into raw (un-postprocessed) text.
    fn generate(&self, samples: &[f32], options: &GenerateOptions) -> Result<String, RuntimeError>;
}

/// A loaded VAD model. Constructed fresh for every job because the silence
/// threshold is per-job state.
pub trait VadModel {
    /// Locate the speech-containing time ranges of an audio file, in order.
    fn generate(&self, path: &Path) -> Result<Vec<SpeechSpan>, RuntimeError>;
}

/// Factory for loaded model handles.
pub trait ModelRuntime: Send + Sync {
    fn load_asr(&self, kind: ModelKind, device: Device) -> Result<Arc<dyn AsrModel>, RuntimeError>;

    fn load_vad(&self, config: &VadConfig, device: Device)
        -> Result<Box<dyn VadModel>, RuntimeError>;
}
