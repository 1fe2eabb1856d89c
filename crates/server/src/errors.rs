use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::observability::{NOT_FOUND_TOTAL, VALIDATION_ERRORS_TOTAL};

/// Error returned by handlers; rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Model(_) => {
                VALIDATION_ERRORS_TOTAL.inc();
                Self::new(StatusCode::BAD_REQUEST, e.to_string())
            }
            ServiceError::NotFound(msg) => {
                NOT_FOUND_TOTAL.inc();
                Self::new(StatusCode::NOT_FOUND, msg)
            }
        }
    }
}

/// Body read failures, e.g. 413 once the body passes the default size limit.
impl From<BytesRejection> for JsonApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
