//! The segmentation driver.
//!
//! Orchestrates one transcription job end to end: obtain the ASR handle
//! from the cache, run a freshly constructed VAD over the whole file,
//! slice and transcribe each detected span in chronological order, then
//! hand the accumulated segments to the subtitle writer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use crate::cache::ModelCache;
use crate::runtime::{Device, ModelRuntime, VadConfig};
use crate::{audio, engines, subtitle, AudioSegment, ModelKind, PipelineError, TranscriptionJob};

pub struct Pipeline {
    runtime: Arc<dyn ModelRuntime>,
    cache: ModelCache,
    device: Device,
}

impl Pipeline {
    pub fn new(runtime: Arc<dyn ModelRuntime>) -> Self {
        let device = Device::detect();
        Self {
            cache: ModelCache::new(Arc::clone(&runtime), device),
            runtime,
            device,
        }
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Transcribe one audio file and write its `.srt`/`.txt` siblings.
    ///
    /// Segments come back in chronological order with 1-based sequential
    /// indices. Zero detected speech is not an error: both subtitle files
    /// are written with empty bodies.
    pub fn transcribe_file(
        &self,
        job: &TranscriptionJob,
    ) -> Result<Vec<AudioSegment>, PipelineError> {
        let handle = self.cache.get(job.model)?;
        let mut transcriber = engines::build(job.model, &job.language, handle);

        // The VAD is rebuilt per job; its silence threshold is job state.
        let vad = self
            .runtime
            .load_vad(&VadConfig::new(job.silence_threshold_ms), self.device)?;
        let spans = vad.generate(&job.source)?;
        if spans.is_empty() {
            info!("no speech detected in {}", job.source.display());
        }

        let mut segments = Vec::with_capacity(spans.len());
        for (i, span) in spans.iter().enumerate() {
            let samples = audio::slice_wav(&job.source, span.start_ms, span.end_ms)?;
            let text = transcriber.transcribe(samples)?;
            segments.push(AudioSegment {
                index: i as u32 + 1,
                start_ms: span.start_ms,
                end_ms: span.end_ms,
                text,
            });
        }

        let (srt_path, txt_path) = subtitle::write_subtitle_files(&job.source, &segments)?;
        info!(
            "transcribed {} ({} segments) -> {}, {}",
            display_name(&job.source),
            segments.len(),
            srt_path.display(),
            txt_path.display()
        );

        Ok(segments)
    }

    /// Transcribe several files one at a time, in order, and return how
    /// many completed. `on_file` observes each file's segments as it
    /// finishes; the first failure aborts the remainder.
    pub fn transcribe_batch<F>(
        &self,
        paths: &[PathBuf],
        model: ModelKind,
        language: &str,
        silence_threshold_ms: u32,
        mut on_file: F,
    ) -> Result<usize, PipelineError>
    where
        F: FnMut(&Path, &[AudioSegment]),
    {
        let mut completed = 0usize;
        for path in paths {
            let job = TranscriptionJob {
                source: path.clone(),
                model,
                language: language.to_string(),
                silence_threshold_ms,
            };
            let segments = self.transcribe_file(&job)?;
            on_file(path, &segments);
            completed += 1;
        }
        Ok(completed)
    }
}

/// Human-facing name of a source file, for notifications.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
