//! Account registration, login, and identity handlers.
//!
//! Endpoints:
//! - POST /register - Create an account
//! - POST /login    - Exchange credentials for a bearer token
//! - GET  /me       - The authenticated caller's public record

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use confab_types::user::{NewUser, PublicUser};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Request body for POST /register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for POST /login.
///
/// `chat_id` is the caller's oldest chat so clients can resume it, null
/// for an account with no chats yet.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user_id: Uuid,
    pub chat_id: Option<Uuid>,
}

/// POST /register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let user = state
        .auth_service
        .register(NewUser {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

/// POST /login - Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) = state.auth_service.login(&body.email, &body.password).await?;
    let chat_id = state.chat_service.first_chat(&user.id).await?;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer",
        user_id: user.id,
        chat_id,
    }))
}

/// GET /me - The authenticated caller's public record.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(user))
}
