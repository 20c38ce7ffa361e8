use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::service::UserService;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub admin_token: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: UserService, admin_token: Option<String>) -> Self {
        Self {
            service: Arc::new(service),
            admin_token,
            started_at: Utc::now(),
        }
    }
}
