//! CarDJ REST API module.

pub mod error;
pub mod handlers;
pub mod session;

use std::sync::Arc;

use crate::storage::Storage;

pub use error::ApiError;
pub use session::CurrentUser;

/// Application state shared across all handlers. The storage backend is
/// selected once at startup and injected here; handlers never reach for
/// a global.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}
