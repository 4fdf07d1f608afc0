pub mod phrases;
pub mod segmenter;
pub mod speaker;

use crate::error::Result;
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub use phrases::PhraseOccurrence;
pub use segmenter::RawSegment;
pub use speaker::SpeakerType;

/// One message parsed out of a transcript file, ready for storage.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub tag: String,
    pub speaker_type: SpeakerType,
    /// 0-based order within the transcript.
    pub position: usize,
    pub name: Option<String>,
    pub role: Option<String>,
    pub text: String,
    /// Whitespace-token count of `text`. Coarser than the phrase
    /// tokenizer's word count; used only for length analytics.
    pub word_count: u32,
}

/// The full parse result for one transcript file: the transcript record,
/// its ordered messages, and one phrase-occurrence list per message.
#[derive(Debug, Clone)]
pub struct ParsedTranscript {
    pub filepath: String,
    pub timestamp: Option<NaiveDateTime>,
    pub messages: Vec<ParsedMessage>,
    pub phrases_per_message: Vec<Vec<PhraseOccurrence>>,
}

impl ParsedTranscript {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{8}-\d{6}").expect("invalid timestamp regex"))
}

/// Pull an optional `YYYYMMDD-HHMMSS` timestamp out of a filepath.
/// Absent or unparseable patterns yield None rather than an error.
pub fn timestamp_from_path(filepath: &str) -> Option<NaiveDateTime> {
    let m = timestamp_regex().find(filepath)?;
    NaiveDateTime::parse_from_str(m.as_str(), "%Y%m%d-%H%M%S").ok()
}

/// Parse one transcript file into structured records.
///
/// The file is read as raw bytes and lossy-decoded, so invalid UTF-8
/// never aborts ingestion. A file with zero tags parses to zero messages.
pub fn parse_file(path: &Path) -> Result<ParsedTranscript> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(parse_text(&path.to_string_lossy(), &text))
}

/// Parse already-decoded transcript text attributed to `filepath`.
pub fn parse_text(filepath: &str, text: &str) -> ParsedTranscript {
    let segments = segmenter::segment(text);

    let mut messages = Vec::with_capacity(segments.len());
    let mut phrases_per_message = Vec::with_capacity(segments.len());

    for segment in segments {
        phrases_per_message.push(phrases::extract(&segment.text));
        messages.push(ParsedMessage {
            speaker_type: SpeakerType::classify(&segment.tag),
            word_count: segment.text.split_whitespace().count() as u32,
            tag: segment.tag,
            position: segment.position,
            name: None,
            role: None,
            text: segment.text,
        });
    }

    ParsedTranscript {
        filepath: filepath.to_string(),
        timestamp: timestamp_from_path(filepath),
        messages,
        phrases_per_message,
    }
}
