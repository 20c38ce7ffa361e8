//! Zekompanion server library
//!
//! User records and profile imagery behind a bearer-token gate. Authorized
//! callers address users by UUID; everyone else by list position.

pub mod auth;
pub mod config;
pub mod error;
pub mod generator;
pub mod routes;
pub mod service;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use generator::{ContentGenerator, OfflineGenerator};
pub use routes::create_router;
pub use service::UserService;
pub use state::AppState;
