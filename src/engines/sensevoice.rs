use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::runtime::{AsrModel, GenerateOptions};
use crate::PipelineError;

use super::Transcriber;

/// `<|zh|>`-style rich-annotation markers SenseVoice wraps around its
/// output (language, emotion, and audio-event tags).
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\|[^|]*\|>").unwrap());

/// Languages whose scripts are space-delimited; everything else SenseVoice
/// emits is dense and gets its whitespace removed.
const SPACED_SCRIPTS: [&str; 2] = ["en", "ko"];

pub struct SenseVoice {
    handle: Arc<dyn AsrModel>,
    language: String,
    options: GenerateOptions,
}

impl SenseVoice {
    pub fn new(language: &str, handle: Arc<dyn AsrModel>) -> Self {
        let language = resolve_language(language).to_string();
        let options = GenerateOptions {
            language: Some(language.clone()),
            use_itn: true,
            merge_vad: true,
            merge_length_s: 15,
            batch_size_s: 60,
            ..GenerateOptions::default()
        };
        Self {
            handle,
            language,
            options,
        }
    }
}

impl Transcriber for SenseVoice {
    fn options(&self) -> &GenerateOptions {
        &self.options
    }

    fn transcribe(&mut self, samples: Vec<f32>) -> Result<String, PipelineError> {
        let raw = self.handle.generate(&samples, &self.options)?;
        Ok(clean_text(&raw, &self.language))
    }
}

/// Unsupported languages fall back to auto-detection.
pub(crate) fn resolve_language(requested: &str) -> &str {
    match requested {
        "auto" | "zh" | "en" | "yue" | "ja" | "ko" | "nospeech" => requested,
        _ => "auto",
    }
}

/// Strip annotation markup and emoji; drop whitespace entirely for
/// dense-script languages.
pub(crate) fn clean_text(raw: &str, language: &str) -> String {
    let stripped = MARKUP.replace_all(raw, "");
    let without_emoji: String = stripped.chars().filter(|c| !is_emoji(*c)).collect();

    if SPACED_SCRIPTS.contains(&language) {
        without_emoji.trim().to_string()
    } else {
        without_emoji.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

// Covers the emoji-capable blocks that show up in speech-model output.
// Skin-tone sequences decompose into the pictograph plus a modifier, both
// inside these ranges; flag sequences are pairs of regional indicators.
fn is_emoji(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F000..=0x1FAFF   // emoticons, pictographs, transport, supplemental
        | 0x2600..=0x27BF   // misc symbols and dingbats
        | 0x2B00..=0x2BFF   // stars and misc arrows
        | 0x2190..=0x21FF   // arrows
        | 0x2300..=0x23FF   // misc technical (hourglass, media controls)
        | 0x25A0..=0x25FF   // geometric shapes
        | 0x3030 | 0x303D   // wavy dash, part alternation mark
        | 0x3297 | 0x3299   // circled ideographs
        | 0x24C2            // circled M
        | 0xFE0F            // emoji variation selector
        | 0x200D            // zero-width joiner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_script_loses_emoji_and_whitespace() {
        let raw = "<|zh|><|NEUTRAL|><|Speech|>你好 😀 世界";
        assert_eq!(clean_text(raw, "zh"), "你好世界");
    }

    #[test]
    fn english_keeps_spaces_but_not_emoji() {
        let raw = "<|en|><|HAPPY|>hello 😀world";
        assert_eq!(clean_text(raw, "en"), "hello world");
    }

    #[test]
    fn arrows_and_enclosed_marks_count_as_emoji() {
        assert_eq!(clean_text("→㊗Ⓜ〰你好⏰", "zh"), "你好");
    }

    #[test]
    fn korean_is_space_delimited() {
        assert_eq!(clean_text("안녕 하세요", "ko"), "안녕 하세요");
    }

    #[test]
    fn unsupported_language_falls_back_to_auto() {
        assert_eq!(resolve_language("fr"), "auto");
        assert_eq!(resolve_language("yue"), "yue");
    }

    #[test]
    fn options_enable_itn_and_vad_merge() {
        let handle = crate::engines::testutil::null_handle();
        let engine = SenseVoice::new("ja", handle);
        let options = engine.options();
        assert!(options.use_itn);
        assert!(options.merge_vad);
        assert_eq!(options.merge_length_s, 15);
        assert_eq!(options.language.as_deref(), Some("ja"));
    }
}
