use crate::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use shared::models::{ChatHistoryPage, ChatReply, ChatRequest, HISTORY_LIMIT, HistoryQuery};

pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let reply = state.chat.send(request).await?;
    Ok(Json(reply))
}

pub async fn chat_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ChatHistoryPage>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = query.character.as_deref().filter(|c| !c.is_empty());
    let chat_history = state.db.get_history(filter, HISTORY_LIMIT).await?;

    Ok(Json(ChatHistoryPage {
        total_count: chat_history.len(),
        chat_history,
    }))
}
