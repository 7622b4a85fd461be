//! HTTP mapping for domain errors.
//!
//! The domain error stays transport-agnostic; this module picks the status
//! code, redacts server-side failures, and keeps the legacy `messege` field
//! that existing clients read on 401 and 403 responses.

use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode};
use crate::middleware::TRACE_ID_HEADER;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Replace server-side messages with a generic one; details are dropped too.
fn redact(error: &Error) -> Error {
    let code = error.code();
    if !matches!(code, ErrorCode::InternalError | ErrorCode::ServiceUnavailable) {
        return error.clone();
    }
    let replacement = Error::new(code, code.fallback_message());
    match error.trace_id() {
        Some(id) => replacement.with_trace_id(id.to_owned()),
        None => replacement,
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(flatten)]
    error: &'a Error,
    #[serde(skip_serializing_if = "Option::is_none")]
    messege: Option<&'a str>,
}

impl<'a> ErrorBody<'a> {
    fn new(error: &'a Error) -> Self {
        let messege = matches!(error.code(), ErrorCode::Unauthorized | ErrorCode::Forbidden)
            .then(|| error.message());
        Self { error, messege }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            match HeaderValue::from_str(id) {
                Ok(value) => {
                    builder.insert_header((HeaderName::from_static(TRACE_ID_HEADER), value));
                }
                Err(err) => warn!(%err, "trace id is not a valid header value"),
            }
        }

        let body = redact(self);
        builder.json(ErrorBody::new(&body))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(ErrorCode::InternalError.fallback_message())
    }
}
