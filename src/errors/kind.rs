use serde::Serialize;
use std::fmt;

/// The three shapes a failure can take, in dispatch priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input rejected field by field
    Validation,

    /// Carries its own HTTP status and a client-safe message
    Http,

    /// Anything else; rendered as a 500
    Unclassified,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Http => "http",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(FailureKind::Validation.to_string(), "validation");
        assert_eq!(FailureKind::Http.to_string(), "http");
        assert_eq!(FailureKind::Unclassified.to_string(), "unclassified");
    }

    #[test]
    fn test_kind_serializes_as_label() {
        let json = serde_json::to_string(&FailureKind::Unclassified).unwrap();
        assert_eq!(json, "\"unclassified\"");
    }
}
