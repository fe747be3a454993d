//! SQLite-backed response store
//!
//! Records live in a `responses` table; artifact bytes are written to
//! files under the media directory and referenced by relative path.
//! Uses a connection-per-call pattern with WAL mode, so concurrent
//! readers never block the interview loop.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags};
use tokio::fs;

use crate::application::ports::{NewResponse, ResponseStore, StoreError};
use crate::domain::interview::ResponseRecord;
use crate::domain::media::RecordingArtifact;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL,
    text_response TEXT NOT NULL DEFAULT '',
    audio_file TEXT NOT NULL,
    video_file TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Response store rooted at a data directory:
/// `<data_dir>/responses.db` plus artifact files under `<data_dir>/media/`
pub struct SqliteResponseStore {
    db_path: PathBuf,
    media_dir: PathBuf,
    /// Disambiguates artifact file names within one millisecond
    seq: std::sync::atomic::AtomicU64,
}

impl SqliteResponseStore {
    /// Open the store, creating the directory, schema, and media
    /// directory on first use.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let media_dir = data_dir.join("media");
        fs::create_dir_all(&media_dir)
            .await
            .map_err(|e| StoreError::Open(e.to_string()))?;

        let store = Self {
            db_path: data_dir.join("responses.db"),
            media_dir,
            seq: std::sync::atomic::AtomicU64::new(0),
        };

        let db_path = store.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::conn(&db_path)?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| StoreError::Open(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::Open(format!("Task join error: {}", e)))??;

        Ok(store)
    }

    /// Fresh connection with WAL mode and a busy timeout
    fn conn(db_path: &Path) -> Result<Connection, StoreError> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Open(e.to_string()))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA busy_timeout = 5000;
        ",
        )
        .map_err(|e| StoreError::Open(e.to_string()))?;

        Ok(conn)
    }

    /// Write one artifact to the media directory, returning its
    /// reference relative to the data directory. Empty artifacts from
    /// degraded tracks are still written so the record stays complete.
    async fn write_artifact(
        &self,
        artifact: &RecordingArtifact,
        stamp: i64,
        seq: u64,
    ) -> Result<String, StoreError> {
        let file_name = format!("{}-{}.{}", stamp, seq, artifact.kind().extension());
        let path = self.media_dir.join(&file_name);
        fs::write(&path, artifact.data())
            .await
            .map_err(|e| StoreError::Append(e.to_string()))?;
        Ok(format!("media/{}", file_name))
    }
}

#[async_trait]
impl ResponseStore for SqliteResponseStore {
    async fn append(&self, response: NewResponse) -> Result<ResponseRecord, StoreError> {
        let created_at = Utc::now();
        let stamp = created_at.timestamp_millis();
        let seq = self.seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        // Artifacts first so a row never points at missing files
        let video_file = self
            .write_artifact(&response.capture.video, stamp, seq)
            .await?;
        let audio_file = self
            .write_artifact(&response.capture.audio, stamp, seq)
            .await?;

        let db_path = self.db_path.clone();
        let record = ResponseRecord {
            id: None,
            question: response.question,
            text_response: response.text_response,
            audio_file,
            video_file,
            created_at,
        };

        let insert = record.clone();
        let id = tokio::task::spawn_blocking(move || -> Result<i64, StoreError> {
            let conn = Self::conn(&db_path)?;
            conn.execute(
                "INSERT INTO responses (question, text_response, audio_file, video_file, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    insert.question,
                    insert.text_response,
                    insert.audio_file,
                    insert.video_file,
                    insert.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::Append(e.to_string()))?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(|e| StoreError::Append(format!("Task join error: {}", e)))??;

        Ok(ResponseRecord {
            id: Some(id),
            ..record
        })
    }

    async fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<Vec<ResponseRecord>, StoreError> {
            let conn = Self::conn(&db_path)?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, question, text_response, audio_file, video_file, created_at
                     FROM responses ORDER BY id ASC",
                )
                .map_err(|e| StoreError::List(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    let created_at: String = row.get(5)?;
                    Ok(ResponseRecord {
                        id: Some(row.get(0)?),
                        question: row.get(1)?,
                        text_response: row.get(2)?,
                        audio_file: row.get(3)?,
                        video_file: row.get(4)?,
                        created_at: DateTime::parse_from_rfc3339(&created_at)
                            .map(|dt| dt.with_timezone(&Utc))
                            .unwrap_or_default(),
                    })
                })
                .map_err(|e| StoreError::List(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row.map_err(|e| StoreError::List(e.to_string()))?);
            }
            Ok(records)
        })
        .await
        .map_err(|e| StoreError::List(format!("Task join error: {}", e)))?
    }
}
