use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::{type_name, Any};
use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::panic::Location;
use std::sync::Arc;

use super::kind::FailureKind;
use super::violation::FieldViolation;

/// Class reported for failures raised from a caught panic
pub const PANIC_CLASS: &str = "panic";

/// Where a failure was raised: class, source location and stack trace
#[derive(Debug, Clone)]
pub struct Origin {
    class: Cow<'static, str>,
    file: Cow<'static, str>,
    line: u32,
    trace: Arc<Backtrace>,
}

impl Origin {
    /// Record the caller's location and stack under the given class name.
    ///
    /// The trace honours `RUST_BACKTRACE`; when backtraces are disabled the
    /// rendered trace reads `disabled backtrace`.
    #[track_caller]
    pub fn capture(class: impl Into<Cow<'static, str>>) -> Self {
        let location = Location::caller();
        Self {
            class: class.into(),
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            trace: Arc::new(Backtrace::capture()),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn trace(&self) -> String {
        self.trace.to_string()
    }
}

/// A failure surfaced by a request handler.
///
/// Returning a `Failure` from a handler produces a placeholder response that
/// carries the failure in its extensions; the failure middleware hands it to
/// the [`ErrorResponder`](super::ErrorResponder) which writes the real body.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Failure {
    /// Input rejected field by field
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// Intentional failure with its own status and a client-safe message
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        origin: Origin,
    },

    /// Any other failure
    #[error("{message}")]
    Unclassified { message: String, origin: Origin },
}

impl Failure {
    pub fn validation<I, V>(violations: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldViolation>,
    {
        Self::Validation(violations.into_iter().map(Into::into).collect())
    }

    #[track_caller]
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            origin: Origin::capture(type_name::<Self>()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(StatusCode::NOT_FOUND, message)
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Unclassified {
            message: message.into(),
            origin: Origin::capture(type_name::<Self>()),
        }
    }

    /// Wrap an arbitrary error; its type name becomes the failure class.
    ///
    /// Passed as a function value (`map_err(Failure::from_error)`) the
    /// recorded location is lost; use [`ResultExt::or_failure`] instead.
    #[track_caller]
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + 'static,
    {
        Self::Unclassified {
            message: error.to_string(),
            origin: Origin::capture(type_name::<E>()),
        }
    }

    /// Convert a caught panic payload. Only `&str` and `String` payloads
    /// carry a readable message.
    #[track_caller]
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "handler panicked with a non-string payload".to_string()
        };

        Self::Unclassified {
            message,
            origin: Origin::capture(PANIC_CLASS),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::Http { .. } => FailureKind::Http,
            Self::Unclassified { .. } => FailureKind::Unclassified,
        }
    }

    /// Status the failure will be answered with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Http { status, .. } => *status,
            Self::Unclassified { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Validation failures have no origin
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            Self::Validation(_) => None,
            Self::Http { origin, .. } | Self::Unclassified { origin, .. } => Some(origin),
        }
    }

    /// Point the origin at another source location. No-op for validation
    /// failures.
    pub fn located_at(mut self, file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        if let Self::Http { origin, .. } | Self::Unclassified { origin, .. } = &mut self {
            origin.file = file.into();
            origin.line = line;
        }
        self
    }
}

/// Convert any `Result` error into a [`Failure`] located at the caller
pub trait ResultExt<T> {
    fn or_failure(self) -> Result<T, Failure>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + 'static,
{
    #[track_caller]
    fn or_failure(self) -> Result<T, Failure> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Failure::from_error(error)),
        }
    }
}

impl From<anyhow::Error> for Failure {
    #[track_caller]
    fn from(error: anyhow::Error) -> Self {
        Self::Unclassified {
            // Alternate formatting keeps the whole context chain
            message: format!("{error:#}"),
            origin: Origin::capture(type_name::<anyhow::Error>()),
        }
    }
}

impl From<JsonRejection> for Failure {
    #[track_caller]
    fn from(rejection: JsonRejection) -> Self {
        Self::Http {
            status: rejection.status(),
            message: rejection.body_text(),
            origin: Origin::capture(type_name::<JsonRejection>()),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}
