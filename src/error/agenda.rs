use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;
use tracing::{debug, error};

use super::{ApiErrorBody, ApiErrorObject, MediaError, StoreError};

#[derive(Debug, ThisError)]
pub enum AgendaError {
    #[error("Request rejected: {message}")]
    RequestRejected {
        status: StatusCode,
        code: &'static str,
        message: String,
        debug_message: Option<String>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl AgendaError {
    pub(crate) fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        AgendaError::RequestRejected {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
            debug_message: None,
        }
    }

    fn rejected(status: StatusCode, code: &'static str, message: &str, debug: String) -> Self {
        AgendaError::RequestRejected {
            status,
            code,
            message: message.to_string(),
            debug_message: Some(debug),
        }
    }
}

impl From<JsonRejection> for AgendaError {
    fn from(rejection: JsonRejection) -> Self {
        let debug_message = rejection.body_text();
        match rejection {
            JsonRejection::JsonSyntaxError(_) => AgendaError::rejected(
                StatusCode::BAD_REQUEST,
                "INVALID_JSON",
                "invalid JSON",
                debug_message,
            ),
            JsonRejection::JsonDataError(_) => AgendaError::rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_CONTACT",
                "request body is not a valid contact",
                debug_message,
            ),
            JsonRejection::MissingJsonContentType(_) => AgendaError::rejected(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "INVALID_CONTENT_TYPE",
                "expected `Content-Type: application/json`",
                debug_message,
            ),
            other => AgendaError::rejected(
                other.status(),
                "INVALID_REQUEST",
                "invalid request",
                debug_message,
            ),
        }
    }
}

impl From<QueryRejection> for AgendaError {
    fn from(rejection: QueryRejection) -> Self {
        AgendaError::rejected(
            StatusCode::BAD_REQUEST,
            "INVALID_QUERY",
            "invalid or missing query parameters",
            rejection.body_text(),
        )
    }
}

impl From<PathRejection> for AgendaError {
    fn from(rejection: PathRejection) -> Self {
        AgendaError::rejected(
            StatusCode::BAD_REQUEST,
            "INVALID_PATH",
            "invalid path parameter",
            rejection.body_text(),
        )
    }
}

impl From<MultipartRejection> for AgendaError {
    fn from(rejection: MultipartRejection) -> Self {
        AgendaError::rejected(
            rejection.status(),
            "INVALID_UPLOAD",
            "expected a multipart/form-data upload",
            rejection.body_text(),
        )
    }
}

impl From<MultipartError> for AgendaError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "UPLOAD_TOO_LARGE"
        } else {
            "INVALID_UPLOAD"
        };
        AgendaError::rejected(status, code, "failed to read upload", err.body_text())
    }
}

fn internal_error() -> (StatusCode, ApiErrorObject) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiErrorObject {
            code: "INTERNAL_ERROR".to_string(),
            message: "An internal server error occurred.".to_string(),
        },
    )
}

impl IntoResponse for AgendaError {
    fn into_response(self) -> Response {
        let (status, error_body) = match &self {
            AgendaError::RequestRejected {
                status,
                code,
                message,
                debug_message,
            } => {
                if let Some(detail) = debug_message {
                    debug!(code = %code, detail = %detail, "Request rejected");
                }
                (
                    *status,
                    ApiErrorObject {
                        code: (*code).to_string(),
                        message: message.clone(),
                    },
                )
            }

            AgendaError::Store(StoreError::NotFound(id)) => {
                debug!(id, "Contact not found");
                (
                    StatusCode::NOT_FOUND,
                    ApiErrorObject {
                        code: "NOT_FOUND".to_string(),
                        message: format!("Contact {id} not found."),
                    },
                )
            }

            AgendaError::Store(StoreError::Unavailable { .. }) => {
                error!(error = %self, "Contact store unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorObject {
                        code: "STORAGE_UNAVAILABLE".to_string(),
                        message: "The contact store is unavailable.".to_string(),
                    },
                )
            }

            AgendaError::Store(StoreError::Corrupt { .. }) => {
                error!(error = %self, "Contact store corrupt");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorObject {
                        code: "STORAGE_CORRUPT".to_string(),
                        message: "The contact store could not be parsed.".to_string(),
                    },
                )
            }

            AgendaError::Media(media) if media.is_client_error() => {
                debug!(error = %media, "Media request rejected");
                let code = match media {
                    MediaError::EmptyQrData | MediaError::QrEncode(_) => "INVALID_QR_DATA",
                    MediaError::InvalidCrop(_) | MediaError::CropOutOfBounds { .. } => {
                        "INVALID_CROP"
                    }
                    _ => "INVALID_IMAGE",
                };
                (
                    StatusCode::BAD_REQUEST,
                    ApiErrorObject {
                        code: code.to_string(),
                        message: media.to_string(),
                    },
                )
            }

            AgendaError::Store(StoreError::Task(_))
            | AgendaError::Media(_)
            | AgendaError::IoError(_)
            | AgendaError::UnexpectedError(_) => {
                error!(error = %self, "Internal error");
                internal_error()
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}
