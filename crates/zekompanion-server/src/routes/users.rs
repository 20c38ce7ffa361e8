use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use user_identity::User;

use crate::auth::Authorized;
use crate::error::AppError;
use crate::state::AppState;

fn image_response(content_type: &'static str, data: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type)], data).into_response()
}

pub async fn create_user(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.service.create_user(authorized).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.service.list_users(authorized).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.service.fetch_user(&id, authorized).await?))
}

/// Update answers 406 for any unresolvable target, including a missing user
pub async fn update_user(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path(id): Path<String>,
    Json(payload): Json<User>,
) -> Result<&'static str, AppError> {
    state
        .service
        .update_user(&id, authorized, payload)
        .await
        .map_err(|e| match e {
            AppError::NotFound(msg) => AppError::InvalidPayload(msg),
            other => other,
        })?;
    Ok("OK")
}

pub async fn delete_user(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    Ok(Json(state.service.delete_user(&id, authorized).await?))
}

pub async fn get_original_image(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let data = state.service.fetch_original_image(&id, authorized).await?;
    Ok(image_response("image/png", data))
}

pub async fn get_resized_image(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path((id, size)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let data = state
        .service
        .fetch_resized_image(&id, authorized, &size)
        .await?;
    Ok(image_response("image/png", data))
}

pub async fn get_badge(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let data = state.service.fetch_badge(&id, authorized).await?;
    Ok(image_response("image/bmp", data))
}

pub async fn get_profile_b64(
    State(state): State<AppState>,
    Authorized(authorized): Authorized,
    Path(id): Path<String>,
) -> Result<String, AppError> {
    state.service.fetch_profile_b64(&id, authorized).await
}

#[cfg(test)]
mod tests {
    use crate::routes::create_router;
    use crate::service::tests::{portrait_png, service_with};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use image::GenericImageView;
    use tower::ServiceExt;
    use user_identity::User;

    const TOKEN: &str = "s3cret";

    fn app() -> Router {
        let (_, service) = service_with("Ada Lovelace");
        create_router(
            AppState::new(service, Some(TOKEN.to_string())),
            &["*".to_string()],
        )
    }

    fn request(method: &str, uri: &str, admin: bool) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        if admin {
            builder.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        } else {
            builder
        }
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn create(app: &Router) -> User {
        let response = app
            .clone()
            .oneshot(request("POST", "/api/user", true).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app();
        create(&app).await;

        let response = app
            .oneshot(request("GET", "/health", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].as_u64().is_some());
        assert_eq!(json["users"], 1);
        assert_eq!(json["store"]["writes"], 1);
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let app = app();
        let response = app
            .oneshot(request("POST", "/api/user", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_hides_uuid_without_token() {
        let app = app();
        let created = create(&app).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/user", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(!body.contains(&created.uuid));
        assert!(body.contains("\"uuid\":\"0\""));

        let response = app
            .oneshot(request("GET", "/api/user", true).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.contains(&created.uuid));
    }

    #[tokio::test]
    async fn test_fetch_by_index_and_uuid() {
        let app = app();
        let created = create(&app).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/user/0", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let user: User = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(user.uuid, "0");

        // A UUID means nothing to an unauthorized caller.
        let uri = format!("/api/user/{}", created.uuid);
        let response = app
            .clone()
            .oneshot(request("GET", &uri, false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request("GET", &uri, true).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_image_routes() {
        let app = app();
        create(&app).await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/user/0/png", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(body_bytes(response).await, portrait_png());

        let response = app
            .clone()
            .oneshot(
                request("GET", "/api/user/0/48x48/png", false)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let resized = image::load_from_memory(&body_bytes(response).await).unwrap();
        assert_eq!(resized.dimensions(), (48, 48));

        let response = app
            .clone()
            .oneshot(
                request("GET", "/api/user/0/100/png", false)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/user/0/badge", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/bmp");
        let badge = image::load_from_memory(&body_bytes(response).await).unwrap();
        assert_eq!(badge.dimensions(), (296, 128));

        let response = app
            .oneshot(request("GET", "/api/user/7/badge", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_statuses() {
        let app = app();
        let created = create(&app).await;

        let mut payload = created.with_identifier("0");
        payload.name = "Ada King".to_string();
        let response = app
            .clone()
            .oneshot(
                request("PUT", "/api/user/0", false)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");

        for bad in ["not-an-index", "5"] {
            let payload = created.with_identifier(bad);
            let response = app
                .clone()
                .oneshot(
                    request("PUT", "/api/user/0", false)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        }
    }

    #[tokio::test]
    async fn test_delete_is_admin_only() {
        let app = app();
        let created = create(&app).await;
        let uri = format!("/api/user/{}", created.uuid);

        let response = app
            .clone()
            .oneshot(request("DELETE", "/api/user/0", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, true).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"true");

        let response = app
            .oneshot(request("GET", "/api/user/0/b64", false).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
