//! Failure handling: from a handler's failure value to a structured JSON response

pub mod failure;
pub mod kind;
pub mod logger;
pub mod responder;
pub mod response;
pub mod violation;

pub use failure::{Failure, Origin, ResultExt};
pub use kind::FailureKind;
pub use logger::{ErrorLogger, LogContext, TracingLogger};
pub use responder::ErrorResponder;
pub use response::{ErrorPayload, ExceptionDetail};
pub use violation::FieldViolation;
