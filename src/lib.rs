//! Ingestion and analytics core for Lyra conversation transcripts.
//!
//! A folder of tagged plain-text transcripts is segmented into messages,
//! each message attributed to a speaker and broken into word/bigram
//! phrase occurrences, and everything is persisted into a relational
//! SQLite schema. On top of that schema sits a small read-only analytics
//! layer: word-count percentiles, above-percentile message retrieval, and
//! top phrase frequencies.
//!
//! The four entry points a presentation shell needs:
//!
//! - [`pipeline::ingest_folder`] (or [`pipeline::ingest_with_config`])
//! - [`database::Database::percentiles`]
//! - [`database::Database::messages_above_percentile`]
//! - [`database::Database::top_phrases`]

pub mod config;
pub mod database;
pub mod error;
pub mod parser;
pub mod pipeline;

pub use config::AppConfig;
pub use database::{Database, Percentiles, PhraseFrequency};
pub use error::{Error, Result};
pub use parser::SpeakerType;
pub use pipeline::{ingest_folder, ingest_with_config, IngestSummary};
