use crate::parser::SpeakerType;
use serde::{Deserialize, Serialize};

/// One ingested transcript row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRow {
    pub id: i64,
    pub filepath: String,
    /// Filename-derived timestamp, `%Y-%m-%d %H:%M:%S`, if present.
    pub timestamp: Option<String>,
    pub message_count: i64,
}

/// One stored message row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRow {
    pub id: i64,
    pub transcript_id: i64,
    pub tag: String,
    pub speaker_type: SpeakerType,
    pub position: i64,
    pub name: Option<String>,
    pub role: Option<String>,
    pub text: String,
    pub word_count: i64,
}

/// Key percentiles of the word_count distribution. All fields are None
/// when no messages match the filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: Option<f64>,
    pub p10: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub p90: Option<f64>,
    pub p95: Option<f64>,
}

impl Percentiles {
    pub fn empty() -> Self {
        Self {
            p5: None,
            p10: None,
            p25: None,
            p50: None,
            p75: None,
            p90: None,
            p95: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.p50.is_none()
    }
}

/// One phrase with its occurrence count among matching messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseFrequency {
    pub text: String,
    pub count: i64,
}
