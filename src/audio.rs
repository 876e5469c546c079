//! Audio slicing and normalization.
//!
//! Transcription engines consume mono f32 samples at 16 kHz. This module
//! reads WAV input at whatever rate, channel count, and sample format the
//! file carries and normalizes it: integer samples are scaled to
//! [-1.0, 1.0], channels are averaged down to mono, and anything that is
//! not already 16 kHz is linearly resampled.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::PipelineError;

/// Sample rate every engine expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Extract the `[start_ms, end_ms)` range of an audio file as mono f32
/// samples at 16 kHz.
///
/// Millisecond bounds are converted to frame indices at the file's native
/// rate. The start frame is clamped to zero and the end frame is forced to
/// at least `start_frame + 1`, so a degenerate request still produces a
/// non-empty read as long as the file has frames left at that position.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidRange`] when `end_ms <= start_ms`, or a
/// decode error if the file cannot be read.
pub fn slice_wav(path: &Path, start_ms: f64, end_ms: f64) -> Result<Vec<f32>, PipelineError> {
    if end_ms <= start_ms {
        return Err(PipelineError::InvalidRange { start_ms, end_ms });
    }

    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let total_frames = reader.duration() as u64;

    let native_rate = spec.sample_rate as f64;
    let start_frame = ((start_ms / 1000.0 * native_rate) as i64).max(0) as u64;
    let end_frame = ((end_ms / 1000.0 * native_rate) as u64).max(start_frame + 1);

    let start_frame = start_frame.min(total_frames);
    let frames = end_frame.min(total_frames) - start_frame;

    reader.seek(start_frame as u32)?;
    let interleaved = decode_frames(&mut reader, frames as usize)?;

    let mono = downmix_mono(&interleaved, spec.channels);
    Ok(resample_to_16k(&mono, spec.sample_rate))
}

/// Read an entire audio file normalized to mono f32 at 16 kHz.
///
/// Used by the bundled VAD, which scans whole files rather than slices.
pub fn read_wav_mono_16k(path: &Path) -> Result<Vec<f32>, PipelineError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let frames = reader.duration() as usize;

    let interleaved = decode_frames(&mut reader, frames)?;
    let mono = downmix_mono(&interleaved, spec.channels);
    Ok(resample_to_16k(&mono, spec.sample_rate))
}

/// Decode up to `frames` frames from the reader's current position as f32.
///
/// Integer samples of any supported bit depth are scaled by 2^(bits-1);
/// float samples pass through unchanged.
fn decode_frames(
    reader: &mut hound::WavReader<BufReader<File>>,
    frames: usize,
) -> Result<Vec<f32>, PipelineError> {
    let spec = reader.spec();
    let wanted = frames * spec.channels as usize;
    let mut samples = Vec::with_capacity(wanted);

    match spec.sample_format {
        hound::SampleFormat::Float => {
            for sample in reader.samples::<f32>().take(wanted) {
                samples.push(sample?);
            }
        }
        hound::SampleFormat::Int => {
            let scale = (1u32 << (spec.bits_per_sample - 1)) as f32;
            for sample in reader.samples::<i32>().take(wanted) {
                samples.push(sample? as f32 / scale);
            }
        }
    }

    Ok(samples)
}

/// Collapse interleaved multi-channel samples to mono by averaging the
/// channel values of each frame. Mono input is returned as-is.
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Resample `samples` from `source_rate` to 16 kHz by linear interpolation.
/// Input already at 16 kHz passes through unchanged.
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == TARGET_SAMPLE_RATE {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };
        output.push(sample);
    }

    output
}
