//! JSON message seam between the pipeline and a UI frontend.
//!
//! The frontend drives transcription through tagged JSON requests and
//! receives results plus transient notifications back. Warnings cover the
//! recoverable cases (a bad save destination); backend failures abort the
//! current job but never the session.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::locale::Translator;
use crate::pipeline::{display_name, Pipeline};
use crate::runtime::DEFAULT_SILENCE_THRESHOLD_MS;
use crate::{subtitle, AudioSegment, ModelKind, PipelineError, TranscriptionJob};

fn default_language() -> String {
    "auto".to_string()
}

fn default_silence_threshold() -> u32 {
    DEFAULT_SILENCE_THRESHOLD_MS
}

/// Message format accepted from the frontend.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Transcribe a single audio file.
    Transcribe {
        path: PathBuf,
        model: ModelKind,
        #[serde(default = "default_language")]
        language: String,
        #[serde(default = "default_silence_threshold")]
        silence_threshold_ms: u32,
    },
    /// Transcribe a set of files sequentially.
    TranscribeBatch {
        paths: Vec<PathBuf>,
        model: ModelKind,
        #[serde(default = "default_language")]
        language: String,
        #[serde(default = "default_silence_threshold")]
        silence_threshold_ms: u32,
    },
    /// Copy a file's subtitle pair into a destination directory.
    Save {
        path: PathBuf,
        destination: PathBuf,
    },
    SaveBatch {
        paths: Vec<PathBuf>,
        destination: PathBuf,
    },
}

/// One row of the results table shown by the frontend.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TableRow {
    pub index: u32,
    pub start: String,
    pub end: String,
    pub text: String,
}

impl From<&AudioSegment> for TableRow {
    fn from(segment: &AudioSegment) -> Self {
        Self {
            index: segment.index,
            start: subtitle::format_timestamp(segment.start_ms / 1000.0),
            end: subtitle::format_timestamp(segment.end_ms / 1000.0),
            text: segment.text.clone(),
        }
    }
}

/// Outbound message format produced by the session.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ready {
        language: String,
    },
    Table {
        path: PathBuf,
        rows: Vec<TableRow>,
    },
    Info {
        message: String,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
    },
}

pub struct Session {
    pipeline: Pipeline,
    translator: Translator,
}

impl Session {
    pub fn new(pipeline: Pipeline, translator: Translator) -> Self {
        Self {
            pipeline,
            translator,
        }
    }

    /// Startup message announcing the active display language.
    pub fn ready(&self) -> Response {
        Response::Ready {
            language: self.translator.current_language().to_string(),
        }
    }

    /// Handle one inbound request and return the resulting messages.
    pub fn handle(&self, request: Request) -> Vec<Response> {
        match request {
            Request::Transcribe {
                path,
                model,
                language,
                silence_threshold_ms,
            } => {
                let job = TranscriptionJob {
                    source: path,
                    model,
                    language,
                    silence_threshold_ms,
                };
                self.transcribe_one(&job)
            }
            Request::TranscribeBatch {
                paths,
                model,
                language,
                silence_threshold_ms,
            } => {
                let mut responses = Vec::new();
                let outcome = self.pipeline.transcribe_batch(
                    &paths,
                    model,
                    &language,
                    silence_threshold_ms,
                    |path, segments| {
                        responses.push(Response::Info {
                            message: self.translator.format(
                                "transcript_completed",
                                &[("filename", &display_name(path))],
                            ),
                        });
                        responses.push(Response::Table {
                            path: path.to_path_buf(),
                            rows: segments.iter().map(TableRow::from).collect(),
                        });
                    },
                );
                match outcome {
                    Ok(completed) => responses.push(Response::Info {
                        message: self
                            .translator
                            .format("total_transcriptions", &[("num", &completed.to_string())]),
                    }),
                    Err(err) => {
                        warn!("batch transcription failed: {err}");
                        responses.push(Response::Error {
                            message: err.to_string(),
                        });
                    }
                }
                responses
            }
            Request::Save { path, destination } => vec![self.save_one(&path, &destination)],
            Request::SaveBatch {
                paths,
                destination,
            } => paths
                .iter()
                .map(|path| self.save_one(path, &destination))
                .collect(),
        }
    }

    fn transcribe_one(&self, job: &TranscriptionJob) -> Vec<Response> {
        match self.pipeline.transcribe_file(job) {
            Ok(segments) => {
                let rows = segments.iter().map(TableRow::from).collect();
                vec![
                    Response::Info {
                        message: self.translator.format(
                            "transcript_completed",
                            &[("filename", &display_name(&job.source))],
                        ),
                    },
                    Response::Table {
                        path: job.source.clone(),
                        rows,
                    },
                ]
            }
            Err(err) => {
                warn!("transcription failed for {}: {err}", job.source.display());
                vec![Response::Error {
                    message: err.to_string(),
                }]
            }
        }
    }

    fn save_one(&self, path: &Path, destination: &Path) -> Response {
        match subtitle::save_to_dir(path, destination) {
            Ok(()) => {
                let (srt_path, txt_path) = subtitle::subtitle_paths(path);
                Response::Info {
                    message: self.translator.format(
                        "files_saved",
                        &[
                            ("srt_file", &display_name(&srt_path)),
                            ("txt_file", &display_name(&txt_path)),
                        ],
                    ),
                }
            }
            Err(PipelineError::InvalidSaveDir(_)) => Response::Warning {
                message: self.translator.format("invalid_folder", &[]),
            },
            Err(err) => Response::Warning {
                message: self
                    .translator
                    .format("save_error", &[("error", &err.to_string())]),
            },
        }
    }
}
