//! SQLite repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use snipbin_core::snippet::{NewSnippet, Snippet};
use snipbin_core::storage::{RepositoryError, Result, SnippetRepository};

use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Maps a failed `call` into the repository error taxonomy. Malformed rows
/// (bad timestamps) surface as `InvalidData`, everything else as
/// `QueryFailed`.
fn map_call_error(err: tokio_rusqlite::Error) -> RepositoryError {
    match err {
        tokio_rusqlite::Error::Other(inner) => RepositoryError::InvalidData(inner.to_string()),
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, tokio_rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| tokio_rusqlite::Error::Other(format!("invalid timestamp {raw:?}: {e}").into()))
}

fn row_to_snippet(row: &Row<'_>) -> std::result::Result<Snippet, tokio_rusqlite::Error> {
    let created: String = row.get(3).map_err(wrap_err)?;
    let expires: String = row.get(4).map_err(wrap_err)?;

    Ok(Snippet {
        id: row.get(0).map_err(wrap_err)?,
        title: row.get(1).map_err(wrap_err)?,
        content: row.get(2).map_err(wrap_err)?,
        created: parse_timestamp(&created)?,
        expires: parse_timestamp(&expires)?,
    })
}

/// SQLite-based snippet repository.
///
/// Timestamps are stored as RFC 3339 text, which compares correctly as
/// strings, so expiry filtering happens in SQL.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist. Schema tables
    /// are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl SnippetRepository for SqliteRepository {
    async fn insert(&self, snippet: &NewSnippet) -> Result<i64> {
        let snippet = snippet.clone();

        self.conn
            .call(move |conn| {
                let created = Utc::now();
                let expires = snippet.expiry_from(created);

                conn.execute(
                    "INSERT INTO snippets (title, content, created, expires)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        snippet.title,
                        snippet.content,
                        created.to_rfc3339(),
                        expires.to_rfc3339(),
                    ],
                )
                .map_err(wrap_err)?;

                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_call_error)
    }

    async fn get(&self, id: i64) -> Result<Option<Snippet>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, title, content, created, expires FROM snippets
                         WHERE expires > ?1 AND id = ?2",
                    )
                    .map_err(wrap_err)?;

                let mut rows = stmt
                    .query(params![Utc::now().to_rfc3339(), id])
                    .map_err(wrap_err)?;

                match rows.next().map_err(wrap_err)? {
                    Some(row) => Ok(Some(row_to_snippet(row)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(map_call_error)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>> {
        let limit = limit as i64;

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, title, content, created, expires FROM snippets
                         WHERE expires > ?1 ORDER BY id DESC LIMIT ?2",
                    )
                    .map_err(wrap_err)?;

                let mut rows = stmt
                    .query(params![Utc::now().to_rfc3339(), limit])
                    .map_err(wrap_err)?;

                let mut snippets = Vec::new();
                while let Some(row) = rows.next().map_err(wrap_err)? {
                    snippets.push(row_to_snippet(row)?);
                }

                Ok(snippets)
            })
            .await
            .map_err(map_call_error)
    }
}
