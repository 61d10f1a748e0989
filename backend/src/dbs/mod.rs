use async_trait::async_trait;
use shared::models::{Character, ChatHistoryEntry};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod postgres;
pub mod sqlite;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug, PartialEq)]
pub enum DatabaseConfig {
    Sqlite { url: String },
    Postgres { url: String },
}

impl DatabaseConfig {
    /// Pick the backend from the URL scheme; anything that is not postgres is sqlite
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Self::Postgres {
                url: url.to_string(),
            }
        } else {
            Self::Sqlite {
                url: url.to_string(),
            }
        }
    }

    pub async fn connect(&self) -> DbResult<Arc<dyn Database>> {
        Ok(match self {
            Self::Sqlite { url } => Arc::new(sqlite::SqliteDatabase::new(url).await?),
            Self::Postgres { url } => Arc::new(postgres::PostgresDatabase::new(url).await?),
        })
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error()
            && db_err.is_unique_violation()
        {
            return DbError::Conflict(db_err.message().to_string());
        }
        DbError::Sqlx(e)
    }
}

#[async_trait]
pub trait Database: Send + Sync {
    /// All characters, alphabetical by name
    async fn get_characters(&self) -> DbResult<Vec<Character>>;
    async fn get_character(&self, character_id: Uuid) -> DbResult<Character>;
    /// Case-insensitive exact match on the name
    async fn find_character_by_name(&self, name: &str) -> DbResult<Option<Character>>;
    async fn create_character(&self, character: Character) -> DbResult<()>;
    async fn update_character(&self, character: Character) -> DbResult<()>;
    async fn append_history(&self, entry: ChatHistoryEntry) -> DbResult<()>;
    /// Newest first, optionally restricted to names containing `character`
    /// (case-insensitive), at most `limit` entries
    async fn get_history(
        &self,
        character: Option<&str>,
        limit: usize,
    ) -> DbResult<Vec<ChatHistoryEntry>>;
}
