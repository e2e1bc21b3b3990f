// Repository pattern - isolates all database side effects
use async_trait::async_trait;
use rusqlite::params;
use thiserror::Error;

use crate::sections::SectionRecord;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Summary row for the admin index.
#[derive(Debug, Clone)]
pub struct StoredSection {
    pub page: String,
    pub section: String,
    pub title: String,
    pub is_active: bool,
    pub updated_at: String,
}

/// All persistence operations for section records. "Create" and "update"
/// are the same save: the row appears on first upsert.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Load a section by page/section key.
    async fn get(&self, page: &str, section: &str)
        -> Result<Option<SectionRecord>, RepositoryError>;

    /// Idempotent upsert. Returns the persisted record, id included.
    async fn upsert(
        &self,
        page: &str,
        section: &str,
        record: &SectionRecord,
    ) -> Result<SectionRecord, RepositoryError>;

    /// Every stored section, for the admin index.
    async fn list(&self) -> Result<Vec<StoredSection>, RepositoryError>;
}

/// SQLite implementation
pub struct SqliteSectionRepository {
    pool: DbPool,
}

impl SqliteSectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(SectionRecord, String)> {
    let slides_json: String = row.get(7)?;
    Ok((
        SectionRecord {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            subtitle: row.get(2)?,
            description: row.get(3)?,
            content: row.get(4)?,
            image_url: row.get(5)?,
            is_active: row.get(6)?,
            slides: Vec::new(),
        },
        slides_json,
    ))
}

const SELECT_COLUMNS: &str =
    "rowid, title, subtitle, description, content, image_url, is_active, slides_json";

#[async_trait]
impl SectionRepository for SqliteSectionRepository {
    async fn get(
        &self,
        page: &str,
        section: &str,
    ) -> Result<Option<SectionRecord>, RepositoryError> {
        let conn = self.pool.get()?;

        let result = conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM sections WHERE page = ?1 AND section = ?2"),
            params![page, section],
            row_to_record,
        );

        match result {
            Ok((mut record, slides_json)) => {
                record.slides = serde_json::from_str(&slides_json)?;
                Ok(Some(record))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(
        &self,
        page: &str,
        section: &str,
        record: &SectionRecord,
    ) -> Result<SectionRecord, RepositoryError> {
        let conn = self.pool.get()?;

        let slides_json = serde_json::to_string(&record.slides)?;
        conn.execute(
            "INSERT INTO sections
                (page, section, title, subtitle, description, content, image_url,
                 slides_json, is_active, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))
             ON CONFLICT(page, section) DO UPDATE SET
               title = excluded.title,
               subtitle = excluded.subtitle,
               description = excluded.description,
               content = excluded.content,
               image_url = excluded.image_url,
               slides_json = excluded.slides_json,
               is_active = excluded.is_active,
               updated_at = excluded.updated_at",
            params![
                page,
                section,
                record.title,
                record.subtitle,
                record.description,
                record.content,
                record.image_url,
                slides_json,
                record.is_active,
            ],
        )?;

        // Read back so the caller sees the record exactly as stored
        let (mut persisted, slides_json) = conn.query_row(
            &format!("SELECT {SELECT_COLUMNS} FROM sections WHERE page = ?1 AND section = ?2"),
            params![page, section],
            row_to_record,
        )?;
        persisted.slides = serde_json::from_str(&slides_json)?;

        Ok(persisted)
    }

    async fn list(&self) -> Result<Vec<StoredSection>, RepositoryError> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT page, section, title, is_active, updated_at
             FROM sections ORDER BY page, section",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredSection {
                    page: row.get(0)?,
                    section: row.get(1)?,
                    title: row.get(2)?,
                    is_active: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
