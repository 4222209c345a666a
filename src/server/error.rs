use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` is required")]
    Missing(&'static str),
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Every failure a handler can report. Rendered as
/// `{"success": false, "error": <status>, "message": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The store refused a write, e.g. a foreign key violation.
    #[error("store rejected write: {0}")]
    Rejected(#[source] sqlx::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Validation(_) | Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::BadRequest(_) => {
                tracing::debug!("{self}");
                self.to_string()
            }
            Self::NotFound | Self::MethodNotAllowed => self.to_string(),
            Self::Validation(e) => e.to_string(),
            Self::Rejected(_) => {
                tracing::error!("{self}");
                "unprocessable entity".to_owned()
            }
            Self::Database(_) | Self::Internal(_) => {
                tracing::error!("{self}");
                "internal server error".to_owned()
            }
        };

        let body = json!({
            "success": false,
            "error": status.as_u16(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
