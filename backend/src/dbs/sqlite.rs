use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use shared::models::{Character, ChatHistoryEntry};
use sqlx::{
    Pool, Row, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;
use uuid::Uuid;

const CHARACTER_COLUMNS: &str = "id, name, era, birth_date, death_date, nationality, occupation, \
    description, persona, major_achievements, historical_context, famous_quotes, auto_generated, \
    created_at, updated_at";

/// SQLite store. Ids and timestamps are kept as TEXT; timestamps use a fixed
/// width RFC 3339 form so that text ordering matches time ordering.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to :memory: opens its own database, and closing it drops the data
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    pub async fn in_memory() -> DbResult<Self> {
        Self::new("sqlite::memory:").await
    }

    async fn init(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                era TEXT NOT NULL DEFAULT '',
                birth_date TEXT NOT NULL DEFAULT '',
                death_date TEXT NOT NULL DEFAULT '',
                nationality TEXT NOT NULL DEFAULT '',
                occupation TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                persona TEXT NOT NULL DEFAULT '',
                major_achievements TEXT NOT NULL DEFAULT '',
                historical_context TEXT NOT NULL DEFAULT '',
                famous_quotes TEXT NOT NULL DEFAULT '',
                auto_generated BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_history (
                id TEXT PRIMARY KEY,
                character_name TEXT NOT NULL,
                user_question TEXT NOT NULL,
                bot_response TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS chat_history_timestamp ON chat_history (timestamp)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(raw: &str) -> DbResult<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| DbError::Internal(format!("Bad timestamp {raw:?}: {e}")))
}

fn decode_id(raw: &str) -> DbResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DbError::Internal(format!("Bad id {raw:?}: {e}")))
}

fn character_from_row(row: &SqliteRow) -> DbResult<Character> {
    Ok(Character {
        id: decode_id(row.get("id"))?,
        name: row.get("name"),
        era: row.get("era"),
        birth_date: row.get("birth_date"),
        death_date: row.get("death_date"),
        nationality: row.get("nationality"),
        occupation: row.get("occupation"),
        description: row.get("description"),
        persona: row.get("persona"),
        major_achievements: row.get("major_achievements"),
        historical_context: row.get("historical_context"),
        famous_quotes: row.get("famous_quotes"),
        auto_generated: row.get("auto_generated"),
        created_at: decode_time(row.get("created_at"))?,
        updated_at: decode_time(row.get("updated_at"))?,
    })
}

fn history_from_row(row: &SqliteRow) -> DbResult<ChatHistoryEntry> {
    Ok(ChatHistoryEntry {
        id: decode_id(row.get("id"))?,
        character_name: row.get("character_name"),
        user_question: row.get("user_question"),
        bot_response: row.get("bot_response"),
        timestamp: decode_time(row.get("timestamp"))?,
    })
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn get_characters(&self) -> DbResult<Vec<Character>> {
        let rows = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(character_from_row).collect()
    }

    async fn get_character(&self, character_id: Uuid) -> DbResult<Character> {
        let row = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = ?1"
        ))
        .bind(character_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => character_from_row(&row),
            None => Err(DbError::NotFound(format!(
                "Character {} not found",
                character_id
            ))),
        }
    }

    async fn find_character_by_name(&self, name: &str) -> DbResult<Option<Character>> {
        // The name column is declared COLLATE NOCASE
        let row = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(character_from_row).transpose()
    }

    async fn create_character(&self, character: Character) -> DbResult<()> {
        sqlx::query(&format!(
            "INSERT INTO characters ({CHARACTER_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ))
        .bind(character.id.to_string())
        .bind(character.name)
        .bind(character.era)
        .bind(character.birth_date)
        .bind(character.death_date)
        .bind(character.nationality)
        .bind(character.occupation)
        .bind(character.description)
        .bind(character.persona)
        .bind(character.major_achievements)
        .bind(character.historical_context)
        .bind(character.famous_quotes)
        .bind(character.auto_generated)
        .bind(encode_time(&character.created_at))
        .bind(encode_time(&character.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_character(&self, character: Character) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE characters SET name = ?1, era = ?2, birth_date = ?3, death_date = ?4, \
             nationality = ?5, occupation = ?6, description = ?7, persona = ?8, \
             major_achievements = ?9, historical_context = ?10, famous_quotes = ?11, \
             auto_generated = ?12, updated_at = ?13 WHERE id = ?14",
        )
        .bind(character.name)
        .bind(character.era)
        .bind(character.birth_date)
        .bind(character.death_date)
        .bind(character.nationality)
        .bind(character.occupation)
        .bind(character.description)
        .bind(character.persona)
        .bind(character.major_achievements)
        .bind(character.historical_context)
        .bind(character.famous_quotes)
        .bind(character.auto_generated)
        .bind(encode_time(&character.updated_at))
        .bind(character.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!(
                "Character {} not found",
                character.id
            )));
        }
        Ok(())
    }

    async fn append_history(&self, entry: ChatHistoryEntry) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO chat_history (id, character_name, user_question, bot_response, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(entry.id.to_string())
        .bind(entry.character_name)
        .bind(entry.user_question)
        .bind(entry.bot_response)
        .bind(encode_time(&entry.timestamp))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_history(
        &self,
        character: Option<&str>,
        limit: usize,
    ) -> DbResult<Vec<ChatHistoryEntry>> {
        // instr() instead of LIKE so that % and _ in the filter stay literal
        let rows = sqlx::query(
            "SELECT id, character_name, user_question, bot_response, timestamp FROM chat_history \
             WHERE ?1 IS NULL OR instr(lower(character_name), lower(?1)) > 0 \
             ORDER BY timestamp DESC, id DESC LIMIT ?2",
        )
        .bind(character)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(history_from_row).collect()
    }
}
