use crate::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use shared::models::{
    BatchReport, BatchRequest, Character, CreateCharacterRequest, CreatedCharacter,
    UpdateCharacterRequest,
};
use uuid::Uuid;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn character_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

pub async fn create_character(
    State(state): State<AppState>,
    payload: Result<Json<CreateCharacterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedCharacter>), ApiError> {
    let created = state.admin.create(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_character(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Character>, ApiError> {
    Ok(Json(state.admin.get(character_id(path)?).await?))
}

pub async fn update_character(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCharacterRequest>, JsonRejection>,
) -> Result<Json<Character>, ApiError> {
    let id = character_id(path)?;
    let character = state.admin.update(id, body(payload)?).await?;
    Ok(Json(character))
}

pub async fn auto_populate(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchReport>, ApiError> {
    let request = body(payload)?;
    Ok(Json(state.admin.auto_populate(&request.ids).await))
}

pub async fn regenerate_persona(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchReport>, ApiError> {
    let request = body(payload)?;
    Ok(Json(state.admin.regenerate_persona(&request.ids).await))
}

pub async fn duplicate_characters(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchReport>, ApiError> {
    let request = body(payload)?;
    Ok(Json(state.admin.duplicate(&request.ids).await))
}
