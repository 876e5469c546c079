//! The runtime that ships with this crate.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::ModelKind;

use super::whisper::WhisperModel;
use super::{
    AsrModel, Device, EnergyVad, ModelRuntime, RuntimeError, VadConfig, VadModel,
    DEFAULT_RMS_THRESHOLD,
};

/// Serves the Whisper kind from a local GGML file and segments audio with
/// the bundled [`EnergyVad`]. SenseVoice and Paraformer inference engines
/// are external collaborators; asking this runtime for them reports
/// [`RuntimeError::ModelUnavailable`].
pub struct LocalRuntime {
    model_paths: HashMap<ModelKind, PathBuf>,
    rms_threshold: f32,
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self {
            model_paths: HashMap::new(),
            rms_threshold: DEFAULT_RMS_THRESHOLD,
        }
    }
}

impl LocalRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the model file (or directory) backing a model kind.
    pub fn with_model_path(mut self, kind: ModelKind, path: PathBuf) -> Self {
        self.model_paths.insert(kind, path);
        self
    }

    /// Override the VAD's silence/voice RMS boundary.
    pub fn with_rms_threshold(mut self, threshold: f32) -> Self {
        self.rms_threshold = threshold;
        self
    }
}

impl ModelRuntime for LocalRuntime {
    fn load_asr(&self, kind: ModelKind, device: Device) -> Result<Arc<dyn AsrModel>, RuntimeError> {
        match kind {
            ModelKind::Whisper => {
                let path = self
                    .model_paths
                    .get(&kind)
                    .ok_or(RuntimeError::ModelUnavailable(kind))?;
                if !path.exists() {
                    return Err(RuntimeError::ModelNotFound(path.clone()));
                }
                info!("loading {kind} on {device} from {}", path.display());
                Ok(Arc::new(WhisperModel::load(path)?))
            }
            ModelKind::SenseVoiceSmall | ModelKind::Paraformer => {
                Err(RuntimeError::ModelUnavailable(kind))
            }
        }
    }

    fn load_vad(
        &self,
        config: &VadConfig,
        _device: Device,
    ) -> Result<Box<dyn VadModel>, RuntimeError> {
        // The silence threshold is job state; the RMS boundary is runtime
        // configuration and overrides whatever the caller left in place.
        let mut config = *config;
        config.rms_threshold = self.rms_threshold;
        Ok(Box::new(EnergyVad::new(config)))
    }
}
