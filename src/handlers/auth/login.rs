use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/auth/login - exchange credentials for an identity token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let service = AuthService::new(state.pool.clone());
    let token = service.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse { token }))
}
