use std::path::{Path, PathBuf};

use vadscribe::audio::slice_wav;
use vadscribe::PipelineError;

fn write_wav_i16(dir: &Path, name: &str, sample_rate: u32, channels: u16, frames: &[i16]) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for &sample in frames {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn slice_returns_requested_range_at_16k() {
    let dir = tempfile::tempdir().unwrap();
    // 1 s of mono 16 kHz audio.
    let frames = vec![3276_i16; 16_000];
    let path = write_wav_i16(dir.path(), "tone.wav", 16_000, 1, &frames);

    let samples = slice_wav(&path, 250.0, 750.0).unwrap();
    assert_eq!(samples.len(), 8_000);
    assert!(samples.iter().all(|&s| (s - 0.1).abs() < 0.01));
}

#[test]
fn slice_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let frames: Vec<i16> = (0..16_000).map(|i| (i % 1000) as i16).collect();
    let path = write_wav_i16(dir.path(), "ramp.wav", 16_000, 1, &frames);

    let first = slice_wav(&path, 100.0, 900.0).unwrap();
    let second = slice_wav(&path, 100.0, 900.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn inverted_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_wav_i16(dir.path(), "short.wav", 16_000, 1, &[0_i16; 1600]);

    let err = slice_wav(&path, 1000.0, 500.0).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidRange {
            start_ms,
            end_ms,
        } if start_ms == 1000.0 && end_ms == 500.0
    ));
}

#[test]
fn degenerate_range_still_reads_one_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_wav_i16(dir.path(), "long.wav", 16_000, 1, &[100_i16; 32_000]);

    // Start and end land on the same frame index; the end clamp forces a
    // single-frame read.
    let samples = slice_wav(&path, 1000.0, 1000.01).unwrap();
    assert_eq!(samples.len(), 1);
}

#[test]
fn stereo_input_is_averaged_to_mono() {
    let dir = tempfile::tempdir().unwrap();
    // Interleaved L/R frames: L = 0.5, R = -0.5 -> mono 0.0.
    let mut frames = Vec::new();
    for _ in 0..16_000 {
        frames.push(i16::MAX / 2);
        frames.push(-(i16::MAX / 2));
    }
    let path = write_wav_i16(dir.path(), "stereo.wav", 16_000, 2, &frames);

    let samples = slice_wav(&path, 0.0, 1000.0).unwrap();
    assert_eq!(samples.len(), 16_000);
    assert!(samples.iter().all(|&s| s.abs() < 1e-4));
}

#[test]
fn non_16k_input_is_resampled() {
    let dir = tempfile::tempdir().unwrap();
    // 1 s at 8 kHz should come back as ~16 000 samples.
    let path = write_wav_i16(dir.path(), "8k.wav", 8_000, 1, &[3276_i16; 8_000]);

    let samples = slice_wav(&path, 0.0, 1000.0).unwrap();
    assert_eq!(samples.len(), 16_000);
    assert!(samples.iter().all(|&s| (s - 0.1).abs() < 0.01));
}

#[test]
fn range_past_the_end_reads_what_exists() {
    let dir = tempfile::tempdir().unwrap();
    // 100 ms file, request 0..500 ms.
    let path = write_wav_i16(dir.path(), "tiny.wav", 16_000, 1, &[50_i16; 1_600]);

    let samples = slice_wav(&path, 0.0, 500.0).unwrap();
    assert_eq!(samples.len(), 1_600);
}

#[test]
fn int_samples_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_wav_i16(dir.path(), "extreme.wav", 16_000, 1, &[i16::MIN, i16::MAX]);

    let samples = slice_wav(&path, 0.0, 1000.0).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0], -1.0);
    assert!((samples[1] - 1.0).abs() < 1e-4);
}
