//! SQLite record store.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{FolioError, FolioResult};
use crate::traits::DocumentStore;
use crate::types::{ContentRecord, RecordUpdate};

type RawRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
);

/// Record store persisted in a single SQLite table.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Open (or create) the database at `db_path`; `:memory:` opens a transient one.
    pub fn new(db_path: impl AsRef<Path>) -> FolioResult<Self> {
        let path = db_path.as_ref();
        let conn = if path.to_str() == Some(":memory:") {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(path)?
        };

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.create_table()?;
        Ok(store)
    }

    /// Open a transient in-memory database.
    pub fn in_memory() -> FolioResult<Self> {
        Self::new(":memory:")
    }

    fn conn(&self) -> FolioResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| FolioError::database("SQLite connection lock poisoned"))
    }

    fn create_table(&self) -> FolioResult<()> {
        self.conn()?.execute(
            r#"
            CREATE TABLE IF NOT EXISTS content_records (
                id                           TEXT PRIMARY KEY,
                file_urls                    TEXT NOT NULL DEFAULT '[]',
                content_text                 TEXT,
                text_extracted_at            TEXT,
                text_extraction_error        TEXT,
                text_extraction_attempted_at TEXT,
                metadata                     TEXT NOT NULL DEFAULT '{}'
            )
            "#,
            [],
        )?;
        Ok(())
    }

    fn parse_time(raw: Option<String>) -> FolioResult<Option<DateTime<Utc>>> {
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| FolioError::database(format!("Invalid timestamp '{}': {}", s, e)))
        })
        .transpose()
    }

    fn into_record(row: RawRow) -> FolioResult<ContentRecord> {
        let (id, file_urls, content_text, extracted_at, error, attempted_at, metadata) = row;
        Ok(ContentRecord {
            id,
            file_urls: serde_json::from_str(&file_urls)?,
            content_text,
            text_extracted_at: Self::parse_time(extracted_at)?,
            text_extraction_error: error,
            text_extraction_attempted_at: Self::parse_time(attempted_at)?,
            metadata: serde_json::from_str(&metadata)?,
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, id: &str) -> FolioResult<Option<ContentRecord>> {
        let row: Option<RawRow> = self
            .conn()?
            .query_row(
                r#"
                SELECT id, file_urls, content_text, text_extracted_at,
                       text_extraction_error, text_extraction_attempted_at, metadata
                FROM content_records WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )
            .optional()?;

        row.map(Self::into_record).transpose()
    }

    async fn put(&self, record: ContentRecord) -> FolioResult<()> {
        let file_urls = serde_json::to_string(&record.file_urls)?;
        let metadata = serde_json::to_string(&record.metadata)?;

        self.conn()?.execute(
            r#"
            INSERT INTO content_records (
                id, file_urls, content_text, text_extracted_at,
                text_extraction_error, text_extraction_attempted_at, metadata
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                file_urls = excluded.file_urls,
                content_text = excluded.content_text,
                text_extracted_at = excluded.text_extracted_at,
                text_extraction_error = excluded.text_extraction_error,
                text_extraction_attempted_at = excluded.text_extraction_attempted_at,
                metadata = excluded.metadata
            "#,
            params![
                record.id,
                file_urls,
                record.content_text,
                record.text_extracted_at.map(|t| t.to_rfc3339()),
                record.text_extraction_error,
                record.text_extraction_attempted_at.map(|t| t.to_rfc3339()),
                metadata,
            ],
        )?;
        Ok(())
    }

    async fn update(&self, id: &str, update: RecordUpdate) -> FolioResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;

        let changed = match update {
            RecordUpdate::Extracted { content_text } => conn.execute(
                "UPDATE content_records
                 SET content_text = ?1, text_extracted_at = ?2
                 WHERE id = ?3",
                params![content_text, now, id],
            )?,
            RecordUpdate::ExtractionFailed { error } => conn.execute(
                "UPDATE content_records
                 SET text_extraction_error = ?1, text_extraction_attempted_at = ?2
                 WHERE id = ?3",
                params![error, now, id],
            )?,
        };

        if changed == 0 {
            return Err(FolioError::not_found(id));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
