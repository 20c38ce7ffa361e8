use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use profile_imagery::ImageryError;
use serde_json::json;
use tracing::{error, warn};
use user_identity::ResolveError;

/// Application error type that converts to HTTP responses.
///
/// Every variant is logged when it is turned into a response.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    UnsupportedSize(String),
    InvalidPayload(String),
    Unauthorized,
    Forbidden(String),
    /// Artifact store read/write failure, reported to the caller as not found
    Io(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => {
                warn!(reason = %msg, "Not found");
                (StatusCode::NOT_FOUND, "Not Found.".to_string())
            }
            AppError::UnsupportedSize(msg) => {
                warn!(reason = %msg, "Unsupported image size");
                (StatusCode::NOT_FOUND, "Image size not supported.".to_string())
            }
            AppError::InvalidPayload(msg) => {
                warn!(reason = %msg, "Invalid payload");
                (StatusCode::NOT_ACCEPTABLE, msg)
            }
            AppError::Unauthorized => {
                warn!("Unauthorized request to admin endpoint");
                (StatusCode::UNAUTHORIZED, "Authentication required".into())
            }
            AppError::Forbidden(msg) => {
                warn!(reason = %msg, "Forbidden");
                (StatusCode::FORBIDDEN, msg)
            }
            AppError::Io(msg) => {
                error!(error = %msg, "Artifact store error");
                (StatusCode::NOT_FOUND, "Not Found.".to_string())
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound => AppError::NotFound(e.to_string()),
            ResolveError::InvalidPayload(msg) => AppError::InvalidPayload(msg),
            ResolveError::Repository(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ImageryError> for AppError {
    fn from(e: ImageryError) -> Self {
        match e {
            ImageryError::NotFound(_) | ImageryError::Image(_) => {
                AppError::NotFound(e.to_string())
            }
            ImageryError::UnsupportedSize { .. } => AppError::UnsupportedSize(e.to_string()),
            ImageryError::Store(_) | ImageryError::Task(_) => AppError::Io(e.to_string()),
        }
    }
}

impl From<user_identity::RepositoryError> for AppError {
    fn from(e: user_identity::RepositoryError) -> Self {
        AppError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_store::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::UnsupportedSize("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidPayload("x".into()), StatusCode::NOT_ACCEPTABLE),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::Io("disk full".into()), StatusCode::NOT_FOUND),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_resolve_error_conversion() {
        assert!(matches!(
            AppError::from(ResolveError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ResolveError::InvalidPayload("invalid index".into())),
            AppError::InvalidPayload(msg) if msg == "invalid index"
        ));
    }

    #[test]
    fn test_imagery_error_conversion() {
        assert!(matches!(
            AppError::from(ImageryError::UnsupportedSize {
                width: 100,
                height: 100
            }),
            AppError::UnsupportedSize(_)
        ));
        assert!(matches!(
            AppError::from(ImageryError::Store(StoreError::InvalidKey("..".into()))),
            AppError::Io(_)
        ));
        assert!(matches!(
            AppError::from(ImageryError::Image("bad png".into())),
            AppError::NotFound(_)
        ));
    }
}
