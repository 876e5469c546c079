use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use vadscribe::locale::Translator;
use vadscribe::pipeline::Pipeline;
use vadscribe::runtime::{
    AsrModel, Device, GenerateOptions, ModelRuntime, RuntimeError, SpeechSpan, VadConfig, VadModel,
};
use vadscribe::session::{Request, Response, Session};
use vadscribe::ModelKind;

/// Runtime whose single model answers every slice with a fixed text.
struct FixedRuntime {
    text: &'static str,
    spans: Vec<SpeechSpan>,
    fail: bool,
}

struct FixedModel {
    text: &'static str,
    fail: bool,
}

impl AsrModel for FixedModel {
    fn generate(&self, _samples: &[f32], _options: &GenerateOptions) -> Result<String, RuntimeError> {
        if self.fail {
            return Err(RuntimeError::Backend("inference exploded".to_string()));
        }
        Ok(self.text.to_string())
    }
}

struct FixedVad {
    spans: Vec<SpeechSpan>,
}

impl VadModel for FixedVad {
    fn generate(&self, _path: &Path) -> Result<Vec<SpeechSpan>, RuntimeError> {
        Ok(self.spans.clone())
    }
}

impl ModelRuntime for FixedRuntime {
    fn load_asr(&self, _kind: ModelKind, _device: Device) -> Result<Arc<dyn AsrModel>, RuntimeError> {
        Ok(Arc::new(FixedModel {
            text: self.text,
            fail: self.fail,
        }))
    }

    fn load_vad(
        &self,
        _config: &VadConfig,
        _device: Device,
    ) -> Result<Box<dyn VadModel>, RuntimeError> {
        Ok(Box::new(FixedVad {
            spans: self.spans.clone(),
        }))
    }
}

fn translator() -> Translator {
    let mut tables = HashMap::new();
    tables.insert(
        "en".to_string(),
        json!({
            "transcript_completed": "Transcription complete: {filename}",
            "invalid_folder": "The save path is not an existing folder",
            "files_saved": "Saved {srt_file} and {txt_file}",
            "save_error": "Failed to save subtitles: {error}",
            "total_transcriptions": "Transcribed {num} files"
        }),
    );
    Translator::from_tables(tables, "en")
}

fn session(runtime: FixedRuntime) -> Session {
    Session::new(Pipeline::new(Arc::new(runtime)), translator())
}

fn write_test_wav(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..16_000 {
        writer.write_sample(3276_i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn transcribe_produces_info_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_test_wav(dir.path(), "talk.wav");

    let session = session(FixedRuntime {
        text: "hello",
        spans: vec![SpeechSpan {
            start_ms: 0.0,
            end_ms: 500.0,
        }],
        fail: false,
    });

    let responses = session.handle(Request::Transcribe {
        path: source.clone(),
        model: ModelKind::Whisper,
        language: "en".to_string(),
        silence_threshold_ms: 800,
    });

    assert_eq!(responses.len(), 2);
    assert_eq!(
        responses[0],
        Response::Info {
            message: "Transcription complete: talk.wav".to_string()
        }
    );
    match &responses[1] {
        Response::Table { path, rows } => {
            assert_eq!(path, &source);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].index, 1);
            assert_eq!(rows[0].start, "00:00:00,000");
            assert_eq!(rows[0].end, "00:00:00,500");
            assert_eq!(rows[0].text, "hello");
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn batch_reports_the_total_count() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_test_wav(dir.path(), "one.wav");
    let second = write_test_wav(dir.path(), "two.wav");

    let session = session(FixedRuntime {
        text: "hi",
        spans: vec![SpeechSpan {
            start_ms: 0.0,
            end_ms: 500.0,
        }],
        fail: false,
    });

    let responses = session.handle(Request::TranscribeBatch {
        paths: vec![first, second],
        model: ModelKind::SenseVoiceSmall,
        language: "auto".to_string(),
        silence_threshold_ms: 800,
    });

    assert_eq!(
        responses.last(),
        Some(&Response::Info {
            message: "Transcribed 2 files".to_string()
        })
    );
}

#[test]
fn backend_failure_becomes_an_error_response_and_session_survives() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_test_wav(dir.path(), "broken.wav");
    std::fs::write(source.with_extension("srt"), "old srt").unwrap();
    std::fs::write(source.with_extension("txt"), "old txt").unwrap();

    let session = session(FixedRuntime {
        text: "",
        spans: vec![SpeechSpan {
            start_ms: 0.0,
            end_ms: 500.0,
        }],
        fail: true,
    });

    let responses = session.handle(Request::Transcribe {
        path: source.clone(),
        model: ModelKind::Whisper,
        language: "auto".to_string(),
        silence_threshold_ms: 800,
    });
    assert_eq!(responses.len(), 1);
    assert!(matches!(responses[0], Response::Error { .. }));

    // The session still answers the next request.
    let dest = tempfile::tempdir().unwrap();
    let responses = session.handle(Request::Save {
        path: source,
        destination: dest.path().to_path_buf(),
    });
    assert!(matches!(responses[0], Response::Info { .. }));
}

#[test]
fn save_to_invalid_destination_warns() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_test_wav(dir.path(), "talk.wav");
    std::fs::write(source.with_extension("srt"), "srt").unwrap();
    std::fs::write(source.with_extension("txt"), "txt").unwrap();

    let session = session(FixedRuntime {
        text: "",
        spans: Vec::new(),
        fail: false,
    });

    let responses = session.handle(Request::Save {
        path: source,
        destination: dir.path().join("missing"),
    });

    assert_eq!(
        responses,
        vec![Response::Warning {
            message: "The save path is not an existing folder".to_string()
        }]
    );
}

#[test]
fn requests_deserialize_from_the_wire_format() {
    let request: Request = serde_json::from_str(
        r#"{"type":"transcribe","path":"talk.wav","model":"Whisper","language":"ja"}"#,
    )
    .unwrap();

    assert_eq!(
        request,
        Request::Transcribe {
            path: PathBuf::from("talk.wav"),
            model: ModelKind::Whisper,
            language: "ja".to_string(),
            silence_threshold_ms: 800,
        }
    );
}

#[test]
fn ready_announces_the_display_language() {
    let session = session(FixedRuntime {
        text: "",
        spans: Vec::new(),
        fail: false,
    });
    assert_eq!(
        session.ready(),
        Response::Ready {
            language: "en".to_string()
        }
    );
}
