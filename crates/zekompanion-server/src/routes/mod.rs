pub mod health;
pub mod users;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the HTTP router
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health))
        // Users
        .route(
            "/api/user",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/user/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Profile imagery
        .route("/api/user/{id}/png", get(users::get_original_image))
        .route("/api/user/{id}/{size}/png", get(users::get_resized_image))
        .route("/api/user/{id}/badge", get(users::get_badge))
        .route("/api/user/{id}/b64", get(users::get_profile_b64))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}
