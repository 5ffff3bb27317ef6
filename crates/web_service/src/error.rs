use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use quiz_core::QuizError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    #[error("Telephony error: {0}")]
    TelephonyError(#[from] twilio_client::TwilioError),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NotFound => AppError::NotFound("record not found".to_string()),
            QuizError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            QuizError::UpstreamUnavailable(msg) => AppError::UpstreamError(msg),
            QuizError::SerializationError(e) => AppError::InternalError(e.into()),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // 503 so the transport layer may redeliver the event.
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::TelephonyError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: "api_error".to_string(),
            },
        };
        HttpResponse::build(status_code).json(error_response)
    }
}
