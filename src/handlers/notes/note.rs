use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::NoteWithCategory;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::note_service::UpdateNote;
use crate::services::NoteService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    /// Category id; the "General" default is resolved when absent
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
}

/// GET /api/notes - list the caller's notes
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<NoteWithCategory>>, ApiError> {
    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let notes = service.list_notes().await?;

    Ok(Json(notes))
}

/// GET /api/notes/:id - show a single owned note
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteWithCategory>, ApiError> {
    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let note = service.get_note(id).await?;

    Ok(Json(note))
}

/// POST /api/notes - create a note owned by the caller
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteWithCategory>), ApiError> {
    let title = body.title.trim();
    let content = body.content.trim();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request("Title and content are required"));
    }

    let category_id = parse_category_id(body.category.as_deref())?;

    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let note = service.create_note(title, content, category_id).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/:id - overwrite the supplied fields of an owned note
pub async fn put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<Json<NoteWithCategory>, ApiError> {
    let changes = UpdateNote {
        title: body.title,
        content: body.content,
        category_id: parse_category_id(body.category_id.as_deref())?,
    };

    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let note = service.update_note(id, changes).await?;

    Ok(Json(note))
}

/// DELETE /api/notes/:id - remove an owned note
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    service.delete_note(id).await?;

    Ok(Json(json!({ "message": "Note deleted successfully" })))
}

/// Parse an optional category id out of a request body, surfacing a
/// validation error rather than a store miss for malformed input.
fn parse_category_id(raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| ApiError::bad_request("Invalid categoryId format")),
    }
}
