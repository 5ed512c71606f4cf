//! Application state for dependency injection.

use std::sync::Arc;

use crate::service::AuthService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self { auth }
    }
}
