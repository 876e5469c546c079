//! Subtitle serialization and file handling.
//!
//! Segments are written in two sibling formats next to the source audio
//! file: SRT blocks with `HH:MM:SS,mmm` timestamps, and a plain text file
//! with one raw transcript line per segment. Both are UTF-8 and overwrite
//! whatever already exists at those paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{AudioSegment, PipelineError};

/// Format a position in seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    let millis = (seconds.fract() * 1000.0) as u64;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Serialize segments as SRT blocks.
pub fn to_srt(segments: &[AudioSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            segment.index,
            format_timestamp(segment.start_ms / 1000.0),
            format_timestamp(segment.end_ms / 1000.0),
            segment.text
        ));
    }
    out
}

/// Serialize segments as plain text, one line per segment.
pub fn to_txt(segments: &[AudioSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(&segment.text);
        out.push('\n');
    }
    out
}

/// The `.srt` and `.txt` sibling paths for a source audio file.
pub fn subtitle_paths(source: &Path) -> (PathBuf, PathBuf) {
    (source.with_extension("srt"), source.with_extension("txt"))
}

/// Write both subtitle files next to the source, overwriting existing ones.
pub fn write_subtitle_files(
    source: &Path,
    segments: &[AudioSegment],
) -> Result<(PathBuf, PathBuf), PipelineError> {
    let (srt_path, txt_path) = subtitle_paths(source);
    fs::write(&srt_path, to_srt(segments))?;
    fs::write(&txt_path, to_txt(segments))?;
    Ok((srt_path, txt_path))
}

/// Copy the already-written subtitle pair of `source` into `destination`.
///
/// Fails with [`PipelineError::InvalidSaveDir`] when the destination is
/// blank or not an existing directory, touching nothing on disk.
pub fn save_to_dir(source: &Path, destination: &Path) -> Result<(), PipelineError> {
    let as_text = destination.as_os_str().to_string_lossy();
    if as_text.trim().is_empty() || !destination.is_dir() {
        return Err(PipelineError::InvalidSaveDir(destination.to_path_buf()));
    }

    let (srt_path, txt_path) = subtitle_paths(source);
    copy_into(&srt_path, destination)?;
    copy_into(&txt_path, destination)?;
    Ok(())
}

fn copy_into(file: &Path, dir: &Path) -> Result<(), PipelineError> {
    let name = file.file_name().ok_or_else(|| {
        PipelineError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("source has no file name: {}", file.display()),
        ))
    })?;
    fs::copy(file, dir.join(name))?;
    Ok(())
}
