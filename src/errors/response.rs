use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::failure::Origin;
use super::violation::FieldViolation;

/// Message returned for every validation failure
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Message returned for unclassified failures outside `dev`
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorPayload {
    /// Always true
    pub error: bool,
    /// Human-readable error message
    pub message: String,
    /// Per-field detail (validation failures only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
    /// Internal detail (`dev` environment only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionDetail>,
}

/// Where the failure was raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExceptionDetail {
    pub class: String,
    pub file: String,
    pub line: u32,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            violations: None,
            exception: None,
        }
    }

    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self {
            violations: Some(violations),
            ..Self::new(VALIDATION_FAILED_MESSAGE)
        }
    }

    pub fn with_exception(mut self, origin: &Origin) -> Self {
        self.exception = Some(ExceptionDetail::from(origin));
        self
    }
}

impl From<&Origin> for ExceptionDetail {
    fn from(origin: &Origin) -> Self {
        Self {
            class: origin.class().to_string(),
            file: origin.file().to_string(),
            line: origin.line(),
        }
    }
}
