use crate::AppState;
use crate::error::ApiError;
use axum::{Json, extract::State};
use shared::models::{CharacterList, CharacterSummary};

pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<CharacterList>, ApiError> {
    let characters: Vec<CharacterSummary> = state
        .db
        .get_characters()
        .await?
        .iter()
        .map(CharacterSummary::from)
        .collect();

    Ok(Json(CharacterList {
        total_count: characters.len(),
        characters,
    }))
}
