// src/agent/conversation_store.rs
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::chat::Conversation;

#[derive(Error, Debug)]
pub enum ConversationStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Append-only log of completed chat turns, one row per `POST /chat`.
/// Rows are never updated or deleted.
pub struct ConversationStore {
    db_pool: SqlitePool,
}

impl ConversationStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Create the conversations table schema
    pub async fn initialize_schema(&self) -> Result<(), ConversationStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                message TEXT NOT NULL,
                response TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
        "#,
        )
        .execute(&self.db_pool)
        .await?;

        // Create the index separately (SQLx doesn't allow multiple commands in one prepared statement)
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversations_user_id ON conversations(user_id)",
        )
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    /// Persist one completed turn and return the stored row.
    pub async fn record(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
    ) -> Result<Conversation, ConversationStoreError> {
        tracing::debug!("💾 Saving conversation turn for user {}", user_id);

        let created_at = Utc::now();
        let row = sqlx::query_as::<_, (i64,)>(
            "INSERT INTO conversations (user_id, message, response, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )
        .bind(user_id)
        .bind(message)
        .bind(response)
        .bind(created_at)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(Conversation {
            id: row.0,
            user_id: user_id.to_string(),
            message: message.to_string(),
            response: response.to_string(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_store() -> ConversationStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = ConversationStore::new(pool);
        store.initialize_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn schema_initialization_is_idempotent() {
        let store = test_store().await;
        store.initialize_schema().await.unwrap();
    }

    #[tokio::test]
    async fn record_persists_turns_verbatim_in_order() {
        let store = test_store().await;

        let first = store.record("u1", "hello", "Welcome to Dukaan!").await.unwrap();
        let second = store.record("u1", "rooms under 100?", "The Standard fits.").await.unwrap();
        assert!(second.id > first.id);

        let rows = sqlx::query_as::<_, Conversation>(
            "SELECT id, user_id, message, response, created_at
             FROM conversations WHERE user_id = ?1 ORDER BY id ASC",
        )
        .bind("u1")
        .fetch_all(&store.db_pool)
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].message, "hello");
        assert_eq!(rows[0].response, "Welcome to Dukaan!");
        assert_eq!(rows[1].message, "rooms under 100?");
        assert_eq!(rows[1].user_id, "u1");
    }
}
