//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `diagramchat-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reads on the reader
//! pool and writes on the writer pool.

use chrono::{DateTime, SecondsFormat, Utc};
use diagramchat_core::chat::repository::ChatRepository;
use diagramchat_types::chat::{ChatMessage, ChatSession, MessageRole, SessionSummary};
use diagramchat_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    created_at: String,
    updated_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        Ok(ChatSession {
            id: self.id,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ChatMessageRow {
    id: i64,
    chat_id: String,
    role: String,
    content: String,
    timestamp: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(RepositoryError::Query)?;

        Ok(ChatMessage {
            id: self.id,
            session_id: self.chat_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.timestamp)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so lexical order in SQLite matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn message_count_from(count: i64) -> Result<u32, RepositoryError> {
    u32::try_from(count)
        .map_err(|e| RepositoryError::Query(format!("invalid message count {count}: {e}")))
}

fn messages_from_rows(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let msg_row = ChatMessageRow::from_row(row).map_err(query_error)?;
        messages.push(msg_row.into_message()?);
    }
    Ok(messages)
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            "INSERT OR IGNORE INTO chat_sessions (id, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(session_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT id, created_at, updated_at FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row).map_err(query_error)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let created_at = Utc::now();
        let timestamp = format_datetime(&created_at);

        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let touched = sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
            .bind(&timestamp)
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        if touched.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let inserted = sqlx::query(
            "INSERT INTO messages (chat_id, role, content, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(role.to_string())
        .bind(content)
        .bind(&timestamp)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;

        Ok(ChatMessage {
            id: inserted.last_insert_rowid(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn read_history(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, chat_id, role, content, timestamp
               FROM messages
               WHERE chat_id = ?
               ORDER BY timestamp ASC, id ASC
               LIMIT ?"#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        messages_from_rows(&rows)
    }

    async fn recent_messages(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, chat_id, role, content, timestamp
               FROM messages
               WHERE chat_id = ?
               ORDER BY timestamp DESC, id DESC
               LIMIT ?"#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = messages_from_rows(&rows)?;
        messages.reverse();
        Ok(messages)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT s.id, s.created_at, s.updated_at, COUNT(m.id) AS message_count
               FROM chat_sessions s
               LEFT JOIN messages m ON m.chat_id = s.id
               GROUP BY s.id
               ORDER BY s.updated_at DESC"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row = ChatSessionRow::from_row(row).map_err(query_error)?;
            let message_count: i64 = row.try_get("message_count").map_err(query_error)?;
            let message_count = message_count_from(message_count)?;
            sessions.push(SessionSummary {
                session: session_row.into_session()?,
                message_count,
            });
        }

        Ok(sessions)
    }
}
