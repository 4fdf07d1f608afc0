//! Folder ingestion: parse every `.txt` transcript in a folder and write
//! each one to the store, one file at a time. A bad file is recorded and
//! skipped; it never aborts the batch.

use crate::config::AppConfig;
use crate::database::Database;
use crate::error::Result;
use crate::parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One file that failed to parse or write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    pub filepath: String,
    pub error: String,
}

/// Per-folder ingestion outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub messages_written: usize,
    pub failures: Vec<IngestFailure>,
}

/// Plain-text transcript files in a folder, non-recursive, sorted by
/// path so runs are reproducible.
fn list_transcript_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Ingest every transcript file in `folder` into `db`.
///
/// Returns a summary of per-file outcomes; only a folder that cannot be
/// listed at all is an error.
pub fn ingest_folder(db: &Database, folder: &Path) -> Result<IngestSummary> {
    let files = list_transcript_files(folder)?;
    log::info!("Ingesting {} transcript files from {:?}", files.len(), folder);

    let mut summary = IngestSummary {
        succeeded: 0,
        failed: 0,
        messages_written: 0,
        failures: Vec::new(),
    };

    for path in files {
        let filepath = path.to_string_lossy().to_string();
        let outcome = parser::parse_file(&path).and_then(|parsed| {
            let message_count = parsed.message_count();
            db.write_transcript(&parsed)?;
            Ok(message_count)
        });

        match outcome {
            Ok(message_count) => {
                summary.succeeded += 1;
                summary.messages_written += message_count;
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", filepath, e);
                summary.failed += 1;
                summary.failures.push(IngestFailure {
                    filepath,
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Ingestion complete: {} succeeded, {} failed, {} messages",
        summary.succeeded,
        summary.failed,
        summary.messages_written
    );
    Ok(summary)
}

/// Full config-driven run: fresh in-memory store, ingest the configured
/// folder, then snapshot to the configured database file.
///
/// Returns the live handle (still in memory) alongside the summary so the
/// shell can run analytics without reopening the snapshot.
pub fn ingest_with_config(config: &AppConfig) -> Result<(Database, IngestSummary)> {
    let db = Database::open_in_memory()?.with_raw_history_tag(config.raw_history_tag.clone());
    let summary = ingest_folder(&db, &config.transcripts_dir)?;

    if db.is_in_memory() {
        db.persist_to(&config.database_path)?;
        log::info!("Snapshot written to {:?}", config.database_path);
    }

    Ok((db, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_ingest_folder_happy_path() {
        let folder = TempDir::new().unwrap();
        write_file(
            folder.path(),
            "a_20240101-120000.txt",
            b"x\n[STT Input]\nhello world\n[LLM Response]\nhi there friend",
        );
        write_file(folder.path(), "b.txt", b"x\n[System]\nboot");

        let db = Database::open_in_memory().unwrap();
        let summary = ingest_folder(&db, folder.path()).unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.messages_written, 3);
        assert_eq!(db.transcript_count().unwrap(), 2);
        assert_eq!(db.message_count().unwrap(), 3);
    }

    #[test]
    fn test_ingest_skips_non_txt_and_subdirs() {
        let folder = TempDir::new().unwrap();
        write_file(folder.path(), "keep.txt", b"x\n[A]\nhello");
        write_file(folder.path(), "skip.md", b"x\n[A]\nignored");
        std::fs::create_dir(folder.path().join("nested")).unwrap();
        write_file(
            &folder.path().join("nested"),
            "deep.txt",
            b"x\n[A]\nignored too",
        );

        let db = Database::open_in_memory().unwrap();
        let summary = ingest_folder(&db, folder.path()).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(db.transcript_count().unwrap(), 1);
    }

    #[test]
    fn test_one_bad_file_does_not_abort_batch() {
        let folder = TempDir::new().unwrap();
        let good = write_file(folder.path(), "good.txt", b"x\n[STT Input]\nstill here");
        write_file(folder.path(), "dupe.txt", b"x\n[A]\nfirst copy");

        let db = Database::open_in_memory().unwrap();
        // Pre-ingest dupe.txt so the batch hits a duplicate on it.
        let parsed = parser::parse_file(&folder.path().join("dupe.txt")).unwrap();
        db.write_transcript(&parsed).unwrap();

        let summary = ingest_folder(&db, folder.path()).unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].filepath.ends_with("dupe.txt"));
        assert!(summary.failures[0].error.contains("already ingested"));

        // The good file made it in.
        let row = db
            .get_transcript_by_filepath(&good.to_string_lossy())
            .unwrap();
        assert!(row.is_some());
    }

    #[test]
    fn test_invalid_utf8_file_still_ingests() {
        let folder = TempDir::new().unwrap();
        write_file(folder.path(), "weird.txt", b"x\n[STT Input]\nbad \xFF bytes");

        let db = Database::open_in_memory().unwrap();
        let summary = ingest_folder(&db, folder.path()).unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let db = Database::open_in_memory().unwrap();
        assert!(ingest_folder(&db, Path::new("/nonexistent/folder")).is_err());
    }

    #[test]
    fn test_ingest_with_config_snapshots_to_disk() -> anyhow::Result<()> {
        let folder = TempDir::new()?;
        write_file(folder.path(), "t.txt", b"x\n[STT Input]\none two three");
        let out = TempDir::new()?;
        let snapshot = out.path().join("lyra.db");

        let config = AppConfig {
            transcripts_dir: folder.path().to_path_buf(),
            database_path: snapshot.clone(),
            ..AppConfig::default()
        };

        let (db, summary) = ingest_with_config(&config)?;
        assert_eq!(summary.succeeded, 1);
        assert_eq!(db.transcript_count()?, 1);

        // The snapshot is a complete copy readable on its own.
        let reopened = Database::open(&snapshot)?;
        assert_eq!(reopened.transcript_count()?, 1);
        assert_eq!(reopened.message_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_summary_serializes_for_the_shell() {
        let summary = IngestSummary {
            succeeded: 2,
            failed: 1,
            messages_written: 40,
            failures: vec![IngestFailure {
                filepath: "/data/bad.txt".into(),
                error: "transcript already ingested: /data/bad.txt".into(),
            }],
        };
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["succeeded"], 2);
        assert_eq!(json["failures"][0]["filepath"], "/data/bad.txt");
    }
}
