use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Category, NoteWithCategory};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::NoteService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// GET /api/notes/category - list all categories
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let categories = service.list_categories().await?;

    Ok(Json(categories))
}

/// POST /api/notes/category - create a category (global, unique by name)
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Category name is required"));
    }

    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let category = service.create_category(name).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/notes/category/:categoryId - the caller's notes in a category
pub async fn notes_in(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<NoteWithCategory>>, ApiError> {
    // Parsed by hand so a malformed id is a validation error, not a 404
    let category_id = Uuid::parse_str(&category_id)
        .map_err(|_| ApiError::bad_request("Invalid categoryId format"))?;

    let service = NoteService::new(state.pool.clone(), auth_user.user_id);
    let notes = service.list_by_category(category_id).await?;

    Ok(Json(notes))
}
