pub mod models;

mod analytics;


use crate::config::DEFAULT_RAW_HISTORY_TAG;
use crate::error::{is_unique_violation, Error, Result};
use crate::parser::ParsedTranscript;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub use models::*;

/// Long-lived handle over the relational store.
///
/// One logical writer: all access goes through the shared connection
/// mutex, which also keeps analytics reads from observing an in-progress
/// ingestion write.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    in_memory: bool,
    raw_history_tag: String,
}

impl Database {
    /// Open (or create) a file-backed database.
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(db_path)?, false)
    }

    /// Open a transient in-memory database. Callers persist it with
    /// [`Database::persist_to`] once ingestion completes.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, true)
    }

    fn from_connection(conn: Connection, in_memory: bool) -> Result<Self> {
        // foreign_keys is off by default in SQLite; without it the
        // cascade clauses on messages and phrases are ignored.
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            PRAGMA temp_store=MEMORY;
        ",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            in_memory,
            raw_history_tag: DEFAULT_RAW_HISTORY_TAG.to_string(),
        };

        db.init_schema()?;

        Ok(db)
    }

    /// Override the tag that marks raw-history dumps.
    pub fn with_raw_history_tag(mut self, tag: impl Into<String>) -> Self {
        self.raw_history_tag = tag.into();
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    pub(crate) fn raw_history_tag(&self) -> &str {
        &self.raw_history_tag
    }

    pub(crate) fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transcripts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filepath TEXT UNIQUE NOT NULL,
                timestamp TIMESTAMP,
                message_count INTEGER
            );

            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transcript_id INTEGER NOT NULL REFERENCES transcripts(id) ON DELETE CASCADE,
                tag TEXT,
                speaker_type TEXT NOT NULL CHECK(speaker_type IN ('lyra', 'user', 'unknown')),
                position INTEGER,
                name TEXT,
                role TEXT,
                text TEXT,
                word_count INTEGER,
                UNIQUE (transcript_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_messages_transcript ON messages(transcript_id);
            CREATE INDEX IF NOT EXISTS idx_messages_speaker ON messages(speaker_type);

            CREATE TABLE IF NOT EXISTS phrases (
                text TEXT,
                num_words INTEGER,
                filepath TEXT,
                message_id INTEGER NOT NULL REFERENCES messages(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_phrases_message ON phrases(message_id);
            CREATE INDEX IF NOT EXISTS idx_phrases_num_words ON phrases(num_words);
        "#,
        )?;
        Ok(())
    }

    /// Drop and recreate all three tables. Used only for a full re-ingest.
    pub fn reset(&self) -> Result<()> {
        {
            let conn = self.conn();
            conn.execute_batch(
                "
                DROP TABLE IF EXISTS phrases;
                DROP TABLE IF EXISTS messages;
                DROP TABLE IF EXISTS transcripts;
            ",
            )?;
        }
        self.init_schema()
    }

    // =========================================================================
    // Transactional writes
    // =========================================================================

    /// Write one parsed transcript, its messages, and their phrase
    /// occurrences as a single transaction.
    ///
    /// Either everything commits or nothing does; a filepath that was
    /// already ingested yields [`Error::DuplicateTranscript`] and leaves
    /// the store untouched. Returns the assigned transcript id.
    pub fn write_transcript(&self, parsed: &ParsedTranscript) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn.transaction().map_err(Error::from)?;

        let timestamp = parsed
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string());

        tx.execute(
            "INSERT INTO transcripts (filepath, timestamp, message_count) VALUES (?, ?, ?)",
            params![parsed.filepath, timestamp, parsed.message_count() as i64],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateTranscript(parsed.filepath.clone())
            } else {
                Error::from(e)
            }
        })?;
        let transcript_id = tx.last_insert_rowid();

        {
            let mut insert_message = tx.prepare(
                "INSERT INTO messages
                 (transcript_id, tag, speaker_type, position, name, role, text, word_count)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            let mut insert_phrase = tx.prepare(
                "INSERT INTO phrases (text, num_words, filepath, message_id) VALUES (?, ?, ?, ?)",
            )?;

            for (message, phrases) in parsed.messages.iter().zip(&parsed.phrases_per_message) {
                insert_message.execute(params![
                    transcript_id,
                    message.tag,
                    message.speaker_type.as_str(),
                    message.position as i64,
                    message.name,
                    message.role,
                    message.text,
                    message.word_count as i64,
                ])?;
                let message_id = tx.last_insert_rowid();

                for phrase in phrases {
                    insert_phrase.execute(params![
                        phrase.text,
                        phrase.num_words as i64,
                        parsed.filepath,
                        message_id,
                    ])?;
                }
            }
        }

        tx.commit()?;
        Ok(transcript_id)
    }

    /// Delete a transcript by filepath; cascades to its messages and
    /// their phrases. Returns true if a row was deleted.
    pub fn delete_transcript(&self, filepath: &str) -> Result<bool> {
        let conn = self.conn();
        let deleted = conn.execute(
            "DELETE FROM transcripts WHERE filepath = ?",
            params![filepath],
        )?;
        Ok(deleted > 0)
    }

    /// Snapshot the live database into a file database, overwriting its
    /// contents. This is how an in-memory ingestion run becomes durable.
    pub fn persist_to(&self, db_path: &Path) -> Result<()> {
        let src = self.conn();
        let mut dst = Connection::open(db_path)?;
        let backup = rusqlite::backup::Backup::new(&src, &mut dst)?;
        backup.run_to_completion(100, std::time::Duration::from_millis(50), None)?;
        Ok(())
    }

    // =========================================================================
    // Read helpers
    // =========================================================================

    pub fn transcript_count(&self) -> Result<i64> {
        let conn = self.conn();
        let count = conn.query_row("SELECT COUNT(*) FROM transcripts", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn message_count(&self) -> Result<i64> {
        let conn = self.conn();
        let count = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_transcript_by_filepath(&self, filepath: &str) -> Result<Option<TranscriptRow>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT id, filepath, timestamp, message_count
                 FROM transcripts WHERE filepath = ?",
                params![filepath],
                |row| {
                    Ok(TranscriptRow {
                        id: row.get(0)?,
                        filepath: row.get(1)?,
                        timestamp: row.get(2)?,
                        message_count: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Messages of one transcript in position order, mainly for tests and
    /// transcript views.
    pub fn get_messages(&self, transcript_id: i64) -> Result<Vec<MessageRow>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, transcript_id, tag, speaker_type, position, name, role, text, word_count
             FROM messages WHERE transcript_id = ? ORDER BY position ASC",
        )?;
        let messages = stmt
            .query_map(params![transcript_id], |row| {
                Ok(MessageRow {
                    id: row.get(0)?,
                    transcript_id: row.get(1)?,
                    tag: row.get(2)?,
                    speaker_type: row
                        .get::<_, String>(3)?
                        .parse()
                        .unwrap_or(crate::parser::SpeakerType::Unknown),
                    position: row.get(4)?,
                    name: row.get(5)?,
                    role: row.get(6)?,
                    text: row.get(7)?,
                    word_count: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(messages)
    }
}
