pub mod config;
pub mod dbs;
pub mod error;
mod handlers;
pub mod llm;
pub mod services;

#[cfg(test)]
mod testing;

use crate::config::Config;
use crate::dbs::{Database, DatabaseConfig, DbError};
use crate::handlers::{
    auto_populate, chat_history, create_character, duplicate_characters, get_character,
    list_characters, regenerate_persona, send_message, update_character,
};
use crate::llm::{LanguageModel, OpenAiModel};
use crate::services::biography::BiographyError;
use crate::services::{AutoPopulator, BiographySource, CharacterAdmin, ChatService, WikipediaClient};
use axum::{
    Router,
    routing::{MethodRouter, get, post},
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to open the database: {0}")]
    Database(#[from] DbError),
    #[error("Failed to build the encyclopedia client: {0}")]
    Encyclopedia(#[from] BiographyError),
}

/// Shared services handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub chat: Arc<ChatService>,
    pub admin: Arc<CharacterAdmin>,
}

impl AppState {
    pub fn from_parts(
        db: Arc<dyn Database>,
        llm: Arc<dyn LanguageModel>,
        source: Arc<dyn BiographySource>,
    ) -> Self {
        let populator = Arc::new(AutoPopulator::new(source, llm.clone()));
        Self {
            chat: Arc::new(ChatService::new(db.clone(), llm)),
            admin: Arc::new(CharacterAdmin::new(db.clone(), populator)),
            db,
        }
    }

    /// Connects the store and builds the outbound clients described by `config`
    pub async fn from_config(config: &Config) -> Result<Self, InitError> {
        let db = DatabaseConfig::from_url(&config.database_url).connect().await?;

        if config.llm_api_key.is_empty() {
            tracing::warn!("GROQ_API_KEY is not set; language model calls will fail");
        }
        let llm = Arc::new(OpenAiModel::new(
            config.llm_api_key.clone(),
            config.llm_api_base.clone(),
            config.llm_model.clone(),
            config.llm_timeout,
        ));
        let source = Arc::new(WikipediaClient::new(config.encyclopedia_url.clone())?);

        Ok(Self::from_parts(db, llm, source))
    }
}

/// Registers `path` both with and without a trailing slash
fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

pub fn init(router: Router<AppState>, state: AppState) -> Router<()> {
    let router = route_both(router, "/api/chat", post(send_message));
    let router = route_both(router, "/api/chat-history", get(chat_history));
    let router = route_both(router, "/api/characters", get(list_characters));
    let router = route_both(router, "/api/admin/characters", post(create_character));

    router
        .route(
            "/api/admin/characters/{character_id}",
            get(get_character).put(update_character),
        )
        .route("/api/admin/characters/auto-populate", post(auto_populate))
        .route(
            "/api/admin/characters/regenerate-persona",
            post(regenerate_persona),
        )
        .route("/api/admin/characters/duplicate", post(duplicate_characters))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
