use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wrapweb_core::config::NotFoundStatus;
use wrapweb_core::webhook::HookRejection;
use wrapweb_core::WrapError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const GENERATION_FAILED_MESSAGE: &str = "Wrap generation failed.";

/// Every failure a handler can return. Rendered as the
/// `{"output": "notok", "error": ...}` envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Unknown project, version or artifact.
    NotFound {
        message: &'static str,
        status: NotFoundStatus,
    },
    /// A webhook stopped at one of the verification gates.
    Rejected(HookRejection),
    /// The updater ran and failed. The cause is logged, not returned.
    GenerationFailed,
    /// Anything unexpected. Logged; the body carries a generic message.
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn not_found(status: NotFoundStatus, message: &'static str) -> Self {
        Self::NotFound { message, status }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { status, .. } => status_from(status.code()),
            ApiError::Rejected(r) => status_from(r.status_code()),
            ApiError::GenerationFailed | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound { message, .. } => (*message).to_string(),
            ApiError::Rejected(r) => r.to_string(),
            ApiError::GenerationFailed => GENERATION_FAILED_MESSAGE.to_string(),
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// JSON error envelope with an explicit status.
pub fn notok(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "output": "notok", "error": message });
    (status, axum::Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), "request failed");
        }
        notok(self.status(), &self.message())
    }
}

impl From<WrapError> for ApiError {
    fn from(err: WrapError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<HookRejection> for ApiError {
    fn from(rejection: HookRejection) -> Self {
        Self::Rejected(rejection)
    }
}
