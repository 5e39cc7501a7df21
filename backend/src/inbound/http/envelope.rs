//! Response envelope and HTTP error mapping.
//!
//! Every outcome, success or failure, is wrapped in the fixed JSON shape
//! `{success, message?, data?, count?, error?}`. Domain errors are mapped to
//! status codes here; raw datastore detail is withheld unless the deployment
//! opts into verbose diagnostics with `VERBOSE_ERRORS=1`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Success envelope wrapping a payload of type `T`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Failure envelope; `error` carries internal detail only in verbose mode.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Schema stand-in for confirmation-only success envelopes.
#[derive(Debug, Serialize, ToSchema)]
pub struct Confirmation {
    pub success: bool,
    pub message: String,
}

/// 200 with a collection payload and its count.
pub fn ok_list<T: Serialize>(data: Vec<T>) -> HttpResponse {
    let count = data.len();
    HttpResponse::Ok().json(Envelope {
        success: true,
        message: None,
        data: Some(data),
        count: Some(count),
    })
}

/// 200 with a single record payload.
pub fn ok_record<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        success: true,
        message: None,
        data: Some(data),
        count: None,
    })
}

/// 200 with a confirmation message and no payload.
pub fn ok_message(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::<()> {
        success: true,
        message: Some(message.into()),
        data: None,
        count: None,
    })
}

/// 200 with a confirmation message and the updated record.
pub fn ok_updated<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        success: true,
        message: Some(message.into()),
        data: Some(data),
        count: None,
    })
}

/// 201 with a confirmation message and the created record.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope {
        success: true,
        message: Some(message.into()),
        data: Some(data),
        count: None,
    })
}

fn verbose_errors() -> bool {
    std::env::var("VERBOSE_ERRORS").is_ok_and(|value| value == "1" || value == "true")
}

/// Domain error carried through an actix handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError(Error);

impl ApiError {
    /// The wrapped domain error.
    pub fn inner(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

/// Outcome-to-status mapping for the error taxonomy.
fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::ReferentialBlock => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.0.code(), detail = %self.0.message(), "request failed");
            let message = match self.0.code() {
                ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
                _ => "Internal server error",
            };
            let detail = verbose_errors().then(|| self.0.message().to_owned());
            return HttpResponse::build(status).json(ErrorEnvelope {
                success: false,
                message: message.to_owned(),
                error: detail,
            });
        }
        HttpResponse::build(status).json(ErrorEnvelope {
            success: false,
            message: self.0.message().to_owned(),
            error: None,
        })
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
