use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::AuthService;
use crate::state::AppState;

use super::utils;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub data: RegisteredProfile,
    pub token: String,
}

/// Created profile, excluding everything credential-related.
#[derive(Debug, Serialize)]
pub struct RegisteredProfile {
    pub username: String,
    pub email: String,
}

/// POST /api/auth/register - create an account and issue an identity token
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    utils::validate_username_format(&body.username).map_err(ApiError::bad_request)?;
    utils::validate_email_format(&body.email).map_err(ApiError::bad_request)?;
    utils::validate_password_strength(&body.password).map_err(ApiError::bad_request)?;

    let service = AuthService::new(state.pool.clone());
    let (user, token) = service
        .register(&body.username, &body.email, &body.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            data: RegisteredProfile {
                username: user.username,
                email: user.email,
            },
            token,
        }),
    ))
}
