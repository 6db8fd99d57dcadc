//! Authentication handlers (register, login, logout, current user).

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::session::{CurrentUser, begin_session, clear_session_cookie};
use crate::api::AppState;
use crate::crypto::hash_password;
use crate::models::{NewUser, UserResponse};

/// Request body for POST /api/register.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for POST /api/login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::Validation(
            "Please enter a valid email address".into(),
        ));
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if req.password != req.confirm_password {
        return Err(ApiError::Validation("Passwords don't match".into()));
    }
    Ok(())
}

/// POST /api/register
///
/// Create an account and open a session for it. Duplicate email or
/// username answers 409.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&req)?;

    let password_hash = hash_password(&req.password)?;
    let user = state.storage.create_user(&NewUser {
        username: req.username.trim().to_string(),
        email: req.email.trim().to_string(),
        password_hash,
    })?;

    tracing::info!("Registered user '{}' (id: {})", user.username, user.id);

    let cookie = begin_session(state.storage.as_ref(), user.id)?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(&user)),
    ))
}

/// POST /api/login
///
/// Verify credentials and open a session. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .storage
        .get_user_by_email(req.email.trim())?
        .ok_or(ApiError::WrongCredentials)?;

    if !user.verify_password(&req.password) {
        return Err(ApiError::WrongCredentials);
    }

    let cookie = begin_session(state.storage.as_ref(), user.id)?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(&user)),
    ))
}

/// POST /api/logout
///
/// Destroy the current session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    state.storage.session_store().destroy(&auth.sid)?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out" })),
    ))
}

/// GET /api/user
///
/// The user behind the current session.
pub async fn get_current_user(auth: CurrentUser) -> impl IntoResponse {
    Json(UserResponse::from(&auth.user))
}
