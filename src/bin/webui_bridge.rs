use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use vadscribe::locale::{self, Translator};
use vadscribe::pipeline::Pipeline;
use vadscribe::runtime::{LocalRuntime, DEFAULT_RMS_THRESHOLD};
use vadscribe::session::{Request, Response, Session};
use vadscribe::ModelKind;

#[derive(Parser, Debug)]
#[command(about = "Subtitle transcription bridge for the web UI frontend", version)]
struct Args {
    /// Display language for notifications (en, zh, ja); unrecognized
    /// values fall back to the default
    #[arg(long)]
    lang: Option<String>,

    /// Directory containing the per-language JSON locale tables
    #[arg(long, default_value = "locales")]
    locales_dir: PathBuf,

    /// Path to a GGML Whisper model file
    #[arg(long)]
    whisper_model: Option<PathBuf>,

    /// RMS amplitude below which the bundled VAD counts a frame as silence
    #[arg(long, default_value_t = DEFAULT_RMS_THRESHOLD)]
    rms_threshold: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let ui_language = locale::resolve_ui_language(args.lang.as_deref());
    let mut translator = Translator::load(&args.locales_dir, locale::DEFAULT_UI_LANGUAGE);
    translator.set_language(ui_language);

    let mut runtime = LocalRuntime::new().with_rms_threshold(args.rms_threshold);
    if let Some(path) = args.whisper_model {
        runtime = runtime.with_model_path(ModelKind::Whisper, path);
    }

    let session = Session::new(Pipeline::new(Arc::new(runtime)), translator);
    send_message(&session.ready())?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                for response in session.handle(request) {
                    send_message(&response)?;
                }
            }
            Err(err) => {
                send_message(&Response::Error {
                    message: format!("failed to parse message: {err}"),
                })?;
            }
        }
    }

    Ok(())
}

fn send_message(message: &Response) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, message)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
