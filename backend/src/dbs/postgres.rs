use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use shared::models::{Character, ChatHistoryEntry};
use sqlx::{Pool, Postgres, Row, postgres::PgPoolOptions, postgres::PgRow};
use uuid::Uuid;

const CHARACTER_COLUMNS: &str = "id, name, era, birth_date, death_date, nationality, occupation, \
    description, persona, major_achievements, historical_context, famous_quotes, auto_generated, \
    created_at, updated_at";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
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
                auto_generated BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        // Names are unique regardless of case, matching the chat lookup
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS characters_name_lower ON characters (LOWER(name))",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_history (
                id UUID PRIMARY KEY,
                character_name TEXT NOT NULL,
                user_question TEXT NOT NULL,
                bot_response TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL
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

fn character_from_row(row: &PgRow) -> Character {
    Character {
        id: row.get("id"),
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
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn get_characters(&self) -> DbResult<Vec<Character>> {
        let rows = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(character_from_row).collect())
    }

    async fn get_character(&self, character_id: Uuid) -> DbResult<Character> {
        let row = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = $1"
        ))
        .bind(character_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(character_from_row(&row)),
            None => Err(DbError::NotFound(format!(
                "Character {} not found",
                character_id
            ))),
        }
    }

    async fn find_character_by_name(&self, name: &str) -> DbResult<Option<Character>> {
        let row = sqlx::query(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE LOWER(name) = LOWER($1)"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(character_from_row))
    }

    async fn create_character(&self, character: Character) -> DbResult<()> {
        sqlx::query(&format!(
            "INSERT INTO characters ({CHARACTER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
        ))
        .bind(character.id)
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
        .bind(character.created_at)
        .bind(character.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_character(&self, character: Character) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE characters SET name = $1, era = $2, birth_date = $3, death_date = $4, \
             nationality = $5, occupation = $6, description = $7, persona = $8, \
             major_achievements = $9, historical_context = $10, famous_quotes = $11, \
             auto_generated = $12, updated_at = $13 WHERE id = $14",
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
        .bind(character.updated_at)
        .bind(character.id)
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
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.id)
        .bind(entry.character_name)
        .bind(entry.user_question)
        .bind(entry.bot_response)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_history(
        &self,
        character: Option<&str>,
        limit: usize,
    ) -> DbResult<Vec<ChatHistoryEntry>> {
        let rows = sqlx::query(
            "SELECT id, character_name, user_question, bot_response, timestamp FROM chat_history \
             WHERE $1::TEXT IS NULL OR strpos(LOWER(character_name), LOWER($1)) > 0 \
             ORDER BY timestamp DESC, id DESC LIMIT $2",
        )
        .bind(character)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChatHistoryEntry {
                id: row.get("id"),
                character_name: row.get("character_name"),
                user_question: row.get("user_question"),
                bot_response: row.get("bot_response"),
                timestamp: row.get("timestamp"),
            })
            .collect())
    }
}
