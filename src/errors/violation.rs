use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A single input-validation complaint tied to one field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// Property path of the offending field (e.g. `address.zip`)
    pub field: String,
    /// Human-readable reason the value was rejected
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl<F, M> From<(F, M)> for FieldViolation
where
    F: Into<String>,
    M: Into<String>,
{
    fn from((field, message): (F, M)) -> Self {
        Self::new(field, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let violation = FieldViolation::new("email", "This value is not a valid email address.");
        assert_eq!(
            violation.to_string(),
            "email: This value is not a valid email address."
        );
    }

    #[test]
    fn test_from_tuple() {
        let violation: FieldViolation = ("field1", "Error 1").into();
        assert_eq!(violation, FieldViolation::new("field1", "Error 1"));
    }
}
