use crate::domain::error::AppError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// Message safe to show to the caller. Upstream bodies and internal
    /// details only go to the log.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::ValidationError(msg)
            | AppError::UploadError(msg) => msg.clone(),
            AppError::CredentialRejected(_) => "API key is invalid or expired".to_string(),
            AppError::ParseError(_) => "AI response format error, please retry".to_string(),
            AppError::LLMError(_) => "Generation failed, please try again later".to_string(),
            AppError::Internal(_) | AppError::ConfigError(_) | AppError::IoError(_) => {
                "Server error".to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) | AppError::CredentialRejected(_) => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) | AppError::UploadError(_) => StatusCode::BAD_REQUEST,
            AppError::ParseError(_) | AppError::LLMError(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) | AppError::ConfigError(_) | AppError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.client_message(),
        })
    }
}
