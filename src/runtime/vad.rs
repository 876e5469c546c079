//! Energy-based voice activity detection.
//!
//! Audio is split into 30 ms frames and a frame counts as voice when its
//! RMS amplitude exceeds the configured threshold. A span opens at the
//! first voice frame and closes either when the trailing silence run
//! exceeds `max_end_silence_ms` or when the span reaches the 30 s cap.
//! Trailing silence is dropped from the reported span end, so silence-only
//! audio yields no spans at all.

use std::path::Path;

use crate::audio;

use super::{RuntimeError, SpeechSpan, VadConfig, VadModel};

const FRAME_MS: u32 = 30;
/// 30 ms at 16 kHz.
const FRAME_SAMPLES: usize = 480;

pub struct EnergyVad {
    config: VadConfig,
}

impl EnergyVad {
    pub fn new(config: VadConfig) -> Self {
        Self { config }
    }
}

impl VadModel for EnergyVad {
    fn generate(&self, path: &Path) -> Result<Vec<SpeechSpan>, RuntimeError> {
        let samples =
            audio::read_wav_mono_16k(path).map_err(|err| RuntimeError::Backend(err.to_string()))?;
        Ok(detect_spans(&samples, &self.config))
    }
}

fn frame_is_voice(frame: &[f32], threshold: f32) -> bool {
    if frame.is_empty() {
        return false;
    }
    let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
    mean_sq.sqrt() > threshold
}

/// Assemble ordered speech spans from mono 16 kHz samples.
pub(crate) fn detect_spans(samples: &[f32], config: &VadConfig) -> Vec<SpeechSpan> {
    let total_frames = samples.len().div_ceil(FRAME_SAMPLES);
    let max_silence_frames = (config.max_end_silence_ms / FRAME_MS) as usize;
    let max_segment_frames = (config.max_segment_ms / FRAME_MS) as usize;

    let mut spans = Vec::new();
    let mut span_start: Option<usize> = None;
    let mut last_voice = 0usize;
    let mut silence_run = 0usize;

    for frame in 0..total_frames {
        let lo = frame * FRAME_SAMPLES;
        let hi = ((frame + 1) * FRAME_SAMPLES).min(samples.len());
        let voice = frame_is_voice(&samples[lo..hi], config.rms_threshold);

        match span_start {
            None => {
                if voice {
                    span_start = Some(frame);
                    last_voice = frame;
                    silence_run = 0;
                }
            }
            Some(start) => {
                if voice {
                    last_voice = frame;
                    silence_run = 0;
                } else {
                    silence_run += 1;
                }

                let over_cap = frame + 1 - start >= max_segment_frames;
                if (!voice && silence_run > max_silence_frames) || over_cap {
                    spans.push(close_span(start, last_voice, samples.len()));
                    span_start = None;
                    silence_run = 0;
                }
            }
        }
    }

    if let Some(start) = span_start {
        spans.push(close_span(start, last_voice, samples.len()));
    }

    spans
}

fn close_span(start_frame: usize, last_voice_frame: usize, total_samples: usize) -> SpeechSpan {
    let end_sample = ((last_voice_frame + 1) * FRAME_SAMPLES).min(total_samples);
    SpeechSpan {
        start_ms: (start_frame * FRAME_MS as usize) as f64,
        end_ms: end_sample as f64 * 1000.0 / audio::TARGET_SAMPLE_RATE as f64,
    }
}
