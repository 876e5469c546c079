//! whisper-rs backed [`AsrModel`] for the Whisper model kind.

use std::path::Path;
use std::sync::Mutex;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{AsrModel, GenerateOptions, RuntimeError};

fn backend_err(err: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::Backend(err.to_string())
}

/// A loaded GGML Whisper model.
///
/// The decode state is not reentrant, so it lives behind a mutex; the
/// handle itself stays shareable across jobs.
pub struct WhisperModel {
    state: Mutex<whisper_rs::WhisperState>,
    _context: WhisperContext,
}

impl WhisperModel {
    pub fn load(model_path: &Path) -> Result<Self, RuntimeError> {
        let path = model_path
            .to_str()
            .ok_or_else(|| backend_err(format!("non-utf8 model path: {}", model_path.display())))?;

        let context =
            WhisperContext::new_with_params(path, WhisperContextParameters::default())
                .map_err(backend_err)?;
        let state = context.create_state().map_err(backend_err)?;

        Ok(Self {
            state: Mutex::new(state),
            _context: context,
        })
    }
}

impl AsrModel for WhisperModel {
    fn generate(&self, samples: &[f32], options: &GenerateOptions) -> Result<String, RuntimeError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| backend_err("whisper decode state poisoned"))?;

        // No beam search: segment timing comes from the VAD, the decoder
        // only has to produce text for one short slice.
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(options.language.as_deref());
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(!options.without_timestamps);
        params.set_suppress_blank(true);
        params.set_suppress_non_speech_tokens(true);
        params.set_no_speech_thold(0.2);
        if let Some(prompt) = options.prompt.as_deref() {
            if !prompt.is_empty() {
                params.set_initial_prompt(prompt);
            }
        }

        state.full(params, samples).map_err(backend_err)?;

        let num_segments = state.full_n_segments().map_err(backend_err)?;
        let mut text = String::new();
        for i in 0..num_segments {
            text.push_str(&state.full_get_segment_text(i).map_err(backend_err)?);
        }

        Ok(text.trim().to_string())
    }
}
