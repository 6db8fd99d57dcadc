//! Session storage contract.
//!
//! Each backend exposes a session store alongside its entity storage: a
//! key/value map from session id to a serialized session blob with an
//! expiry. The persistent backend keeps sessions in a `sessions` table so
//! logins survive restarts; the in-memory backend keeps them in-process
//! and relies on a fixed-interval prune task (see `main`).

use chrono::NaiveDateTime;

use super::StorageError;

/// Capability contract for session persistence.
pub trait SessionStore: Send + Sync {
    /// Load the session blob for `sid`. Expired sessions read as absent.
    fn load(&self, sid: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the session blob for `sid`.
    fn save(&self, sid: &str, data: &str, expires_at: NaiveDateTime) -> Result<(), StorageError>;

    /// Remove the session for `sid`, if any.
    fn destroy(&self, sid: &str) -> Result<(), StorageError>;

    /// Remove all expired sessions, returning how many were removed.
    fn prune_expired(&self) -> Result<usize, StorageError>;
}
