use crate::dbs::{Database, DbError};
use crate::llm::{CompletionRequest, LanguageModel, LlmError};
use shared::models::{ChatHistoryEntry, ChatReply, ChatRequest};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("No message provided.")]
    MissingMessage,
    #[error("No character specified.")]
    MissingCharacter,
    #[error("Character '{name}' not found. Available characters: {}", .available.join(", "))]
    UnknownCharacter { name: String, available: Vec<String> },
    #[error("{0}")]
    Upstream(#[from] LlmError),
    #[error(transparent)]
    Database(#[from] DbError),
}

pub struct ChatService {
    db: Arc<dyn Database>,
    llm: Arc<dyn LanguageModel>,
}

impl ChatService {
    pub fn new(db: Arc<dyn Database>, llm: Arc<dyn LanguageModel>) -> Self {
        Self { db, llm }
    }

    /// One exchange with a character. The history entry is only written once
    /// the model has replied.
    pub async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let message = request
            .message
            .filter(|m| !m.is_empty())
            .ok_or(ChatError::MissingMessage)?;
        let name = request.character.unwrap_or_default();
        let name = name.trim();
        if name.is_empty() {
            return Err(ChatError::MissingCharacter);
        }

        let Some(character) = self.db.find_character_by_name(name).await? else {
            let available = self
                .db
                .get_characters()
                .await?
                .into_iter()
                .map(|c| c.name)
                .collect();
            return Err(ChatError::UnknownCharacter {
                name: name.to_string(),
                available,
            });
        };

        let mut completion = CompletionRequest::new(message.clone());
        if !character.persona.is_empty() {
            completion = completion.system(character.persona.clone());
        }

        tracing::debug!("Chatting with {}", character.name);
        let reply = self.llm.complete(completion).await.map_err(|e| {
            tracing::error!("Chat with {} failed: {}", character.name, e);
            e
        })?;

        self.db
            .append_history(ChatHistoryEntry::new(&character.name, message, &reply))
            .await?;

        Ok(ChatReply {
            character: character.name,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbs::sqlite::SqliteDatabase;
    use crate::testing::FakeModel;
    use shared::models::Character;

    async fn service(model: Arc<FakeModel>) -> (ChatService, Arc<dyn Database>) {
        let db: Arc<dyn Database> = Arc::new(SqliteDatabase::in_memory().await.unwrap());
        let mut gandhi = Character::new("Mahatma Gandhi");
        gandhi.persona = "You are Mahatma Gandhi.".to_string();
        db.create_character(gandhi).await.unwrap();
        db.create_character(Character::new("Marie Curie"))
            .await
            .unwrap();
        (ChatService::new(db.clone(), model), db)
    }

    fn request(character: &str, message: &str) -> ChatRequest {
        ChatRequest {
            character: Some(character.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn reply_is_logged_under_the_stored_name() {
        let model = Arc::new(FakeModel::replying(["Truth is God, my friend."]));
        let (service, db) = service(model.clone()).await;

        let reply = service
            .send(request("  mahatma gandhi ", "What is truth?"))
            .await
            .unwrap();
        assert_eq!(reply.character, "Mahatma Gandhi");
        assert_eq!(reply.reply, "Truth is God, my friend.");

        let history = db.get_history(None, 50).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].character_name, "Mahatma Gandhi");
        assert_eq!(history[0].user_question, "What is truth?");

        let sent = &model.requests()[0];
        assert_eq!(sent.system.as_deref(), Some("You are Mahatma Gandhi."));
        assert_eq!(sent.user, "What is truth?");
    }

    #[tokio::test]
    async fn empty_persona_sends_no_system_message() {
        let model = Arc::new(FakeModel::replying(["Bonjour."]));
        let (service, _) = service(model.clone()).await;

        service
            .send(request("Marie Curie", "Hello"))
            .await
            .unwrap();
        assert_eq!(model.requests()[0].system, None);
    }

    #[tokio::test]
    async fn missing_inputs_are_rejected_before_any_call() {
        let model = Arc::new(FakeModel::replying(["unused"]));
        let (service, _) = service(model.clone()).await;

        let err = service
            .send(ChatRequest {
                character: Some("Marie Curie".to_string()),
                message: Some(String::new()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingMessage));

        let err = service.send(request("   ", "Hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::MissingCharacter));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_character_lists_the_available_names() {
        let (service, _) = service(Arc::new(FakeModel::failing())).await;

        let err = service.send(request("Nobody", "Hi")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Character 'Nobody' not found. Available characters: Mahatma Gandhi, Marie Curie"
        );
    }

    #[tokio::test]
    async fn upstream_failure_saves_nothing() {
        let model = Arc::new(FakeModel::scripted([Err("rate limited".to_string())]));
        let (service, db) = service(model).await;

        let err = service
            .send(request("Marie Curie", "Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        assert!(db.get_history(None, 50).await.unwrap().is_empty());
    }
}
