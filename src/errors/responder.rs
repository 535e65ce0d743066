use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::failure::{Failure, Origin};
use super::logger::{ErrorLogger, LogContext};
use super::response::{ErrorPayload, INTERNAL_ERROR_MESSAGE};
use crate::config::Environment;

/// Message of the log record emitted for every non-validation failure
pub const UNHANDLED_LOG_MESSAGE: &str = "Unhandled exception";

/// Turns failures into `(status, payload)` pairs.
///
/// Validation failures are answered with 400 and never logged. Every other
/// failure is logged once; HTTP failures keep their status and message,
/// the rest become a 500 whose message is redacted outside `dev`. Source
/// detail is only attached in `dev`.
#[derive(Clone)]
pub struct ErrorResponder {
    environment: Environment,
    logger: Arc<dyn ErrorLogger>,
}

impl ErrorResponder {
    pub fn new(environment: Environment, logger: Arc<dyn ErrorLogger>) -> Self {
        Self {
            environment,
            logger,
        }
    }

    pub fn respond(&self, failure: Failure) -> (StatusCode, ErrorPayload) {
        match failure {
            Failure::Validation(violations) => {
                (StatusCode::BAD_REQUEST, ErrorPayload::validation(violations))
            }
            Failure::Http {
                status,
                message,
                origin,
            } => self.respond_unhandled(Some(status), message, &origin),
            Failure::Unclassified { message, origin } => {
                self.respond_unhandled(None, message, &origin)
            }
        }
    }

    /// `respond` rendered as an `application/json` response
    pub fn render(&self, failure: Failure) -> Response {
        let (status, payload) = self.respond(failure);
        (status, Json(payload)).into_response()
    }

    fn respond_unhandled(
        &self,
        status: Option<StatusCode>,
        message: String,
        origin: &Origin,
    ) -> (StatusCode, ErrorPayload) {
        self.logger
            .error(UNHANDLED_LOG_MESSAGE, &LogContext::new(message.as_str(), origin));

        let dev = self.environment.is_dev();
        let (status, message) = match status {
            Some(status) => (status, message),
            None if dev => (StatusCode::INTERNAL_SERVER_ERROR, message),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        };

        let payload = ErrorPayload::new(message);
        if dev {
            (status, payload.with_exception(origin))
        } else {
            (status, payload)
        }
    }
}
