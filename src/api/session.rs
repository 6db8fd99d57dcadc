//! Session-cookie authentication.
//!
//! A login writes a random session id to the backend's session store and
//! hands it to the browser as an HttpOnly cookie. The [`CurrentUser`]
//! extractor reads the cookie back, loads the session blob, and resolves
//! the user; handlers that take a `CurrentUser` are authenticated by
//! construction.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use crate::models::User;
use crate::storage::Storage;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "cardj.sid";

/// Session lifetime: 7 days.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Payload stored in the session blob.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionData {
    user_id: i32,
}

/// Generate a random session id (32 bytes, hex encoded).
fn generate_session_id() -> String {
    use rand_core::{OsRng, RngCore};

    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Open a session for `user_id` and return the `Set-Cookie` value.
pub fn begin_session(storage: &dyn Storage, user_id: i32) -> Result<String, ApiError> {
    let sid = generate_session_id();
    let data = serde_json::to_string(&SessionData { user_id })
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let expires_at = Utc::now().naive_utc() + Duration::seconds(SESSION_TTL_SECS);

    storage.session_store().save(&sid, &data, expires_at)?;

    Ok(format!(
        "{SESSION_COOKIE}={sid}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}"
    ))
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract a named cookie from a `Cookie` header value.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// The authenticated user for the current request.
pub struct CurrentUser {
    pub user: User,
    /// Session id, kept so logout can destroy the session.
    pub sid: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let sid = cookie_value(header, SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;

        let blob = state
            .storage
            .session_store()
            .load(sid)?
            .ok_or(ApiError::Unauthorized)?;

        let data: SessionData =
            serde_json::from_str(&blob).map_err(|_| ApiError::Unauthorized)?;

        let user = state
            .storage
            .get_user(data.user_id)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser {
            user,
            sid: sid.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_parsing() {
        let header = "theme=dark; cardj.sid=abc123; lang=en";
        assert_eq!(cookie_value(header, "cardj.sid"), Some("abc123"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_begin_session_persists_blob() {
        use crate::storage::MemoryStorage;

        let storage = MemoryStorage::new();
        let cookie = begin_session(&storage, 42).unwrap();
        assert!(cookie.starts_with("cardj.sid="));

        let sid = cookie
            .strip_prefix("cardj.sid=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let blob = storage.session_store().load(sid).unwrap().unwrap();
        assert_eq!(blob, "{\"userId\":42}");
    }
}
