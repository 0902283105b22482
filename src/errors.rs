use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Completion service request failed{}: {body}", status_suffix(.status))]
    Transport { status: Option<u16>, body: String },

    #[error("Completion service returned an error: {0}")]
    Upstream(String),

    #[error("The model response was cut off at the output length limit. Try a shorter discharge summary.")]
    Truncated,

    #[error("Unexpected completion response shape: {0}")]
    ResponseShape(String),

    #[error("No JSON found in model response: {preview}")]
    NoJsonFound { preview: String },

    #[error("Incomplete JSON in model response: {preview}")]
    IncompleteJson { preview: String },

    #[error("Failed to parse model JSON: {message} (near: {preview})")]
    JsonParse { message: String, preview: String },

    #[error("Mail is not configured: {0}")]
    MailConfiguration(String),

    #[error("Failed to send email: {0}")]
    MailDelivery(String),

    #[error("Failed to render PDF: {0}")]
    PdfRender(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {}", s))
        .unwrap_or_default()
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            AppError::Transport { .. } => "COMPLETION_TRANSPORT_ERROR",
            AppError::Upstream(_) => "COMPLETION_UPSTREAM_ERROR",
            AppError::Truncated => "COMPLETION_TRUNCATED",
            AppError::ResponseShape(_) => "COMPLETION_RESPONSE_SHAPE",
            AppError::NoJsonFound { .. } => "NO_JSON_FOUND",
            AppError::IncompleteJson { .. } => "INCOMPLETE_JSON",
            AppError::JsonParse { .. } => "JSON_PARSE_ERROR",
            AppError::MailConfiguration(_) => "MAIL_NOT_CONFIGURED",
            AppError::MailDelivery(_) => "MAIL_DELIVERY_ERROR",
            AppError::PdfRender(_) => "PDF_RENDER_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Truncated => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Transport { .. }
            | AppError::Upstream(_)
            | AppError::ResponseShape(_)
            | AppError::NoJsonFound { .. }
            | AppError::IncompleteJson { .. }
            | AppError::JsonParse { .. } => StatusCode::BAD_GATEWAY,
            AppError::MailConfiguration(_)
            | AppError::MailDelivery(_)
            | AppError::PdfRender(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            kind: self.error_code(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MethodNotAllowed("GET".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Truncated.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Transport {
                status: Some(503),
                body: "unavailable".into()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::MailConfiguration("missing".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transport_message_includes_status_and_body() {
        let err = AppError::Transport {
            status: Some(429),
            body: "quota exceeded".into(),
        };
        assert_eq!(
            err.to_string(),
            "Completion service request failed with status 429: quota exceeded"
        );

        let err = AppError::Transport {
            status: None,
            body: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "Completion service request failed: connection refused"
        );
    }

    #[test]
    fn test_truncation_message_suggests_shorter_input() {
        assert!(AppError::Truncated.to_string().contains("shorter"));
    }

    #[test]
    fn test_parse_error_carries_preview() {
        let err = AppError::JsonParse {
            message: "expected value at line 1 column 2".into(),
            preview: "{oops".into(),
        };
        let message = err.to_string();
        assert!(message.contains("expected value"));
        assert!(message.contains("{oops"));
    }
}
