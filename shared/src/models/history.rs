use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the number of entries a history query returns
pub const HISTORY_LIMIT: usize = 50;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub id: Uuid,
    /// Denormalized copy of the character's name at the time of the exchange
    pub character_name: String,
    pub user_question: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatHistoryEntry {
    pub fn new(
        character_name: impl Into<String>,
        user_question: impl Into<String>,
        bot_response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            character_name: character_name.into(),
            user_question: user_question.into(),
            bot_response: bot_response.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HistoryQuery {
    /// Case-insensitive substring of the character name
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatHistoryPage {
    pub chat_history: Vec<ChatHistoryEntry>,
    pub total_count: usize,
}
