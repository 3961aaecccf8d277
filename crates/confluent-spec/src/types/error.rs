use thiserror::Error;

use super::literal::LiteralKind;

// ── Error code constants ──

pub const E_TYPE_MISMATCH: &str = "E_TYPE_MISMATCH";
pub const E_DUPLICATE_PROPERTY: &str = "E_DUPLICATE_PROPERTY";
pub const E_UNRESOLVED_INCLUDE: &str = "E_UNRESOLVED_INCLUDE";
pub const E_CYCLIC_REFERENCE: &str = "E_CYCLIC_REFERENCE";
pub const E_UNRESOLVED_REFERENCE: &str = "E_UNRESOLVED_REFERENCE";
pub const E_INCLUDE_CYCLE: &str = "E_INCLUDE_CYCLE";
pub const E_INVALID_NAME: &str = "E_INVALID_NAME";
pub const E_INVALID_EXPRESSION: &str = "E_INVALID_EXPRESSION";
pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_SCHEMA_VIOLATION: &str = "E_SCHEMA_VIOLATION";
pub const E_UNKNOWN_LANGUAGE: &str = "E_UNKNOWN_LANGUAGE";
pub const E_INVALID_OPTION: &str = "E_INVALID_OPTION";
pub const E_MISSING_OPTION: &str = "E_MISSING_OPTION";
pub const E_INVALID_FILE_NAME: &str = "E_INVALID_FILE_NAME";
pub const E_IO: &str = "E_IO";

/// Errors raised while reading a single definition source into typed values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("value '{value}' cannot be used as {expected}")]
    TypeMismatch { expected: LiteralKind, value: String },

    #[error("'{0}' is not a valid property name")]
    InvalidName(String),

    #[error("failed to parse {source_id}: {message}")]
    Parse { source_id: String, message: String },

    #[error("{source_id} does not match the definition schema: {}", .violations.join("; "))]
    SchemaViolation {
        source_id: String,
        violations: Vec<String>,
    },

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
}

impl SpecError {
    /// Stable machine-readable code of this error.
    pub fn code(&self) -> &'static str {
        match self {
            SpecError::TypeMismatch { .. } => E_TYPE_MISMATCH,
            SpecError::InvalidName(_) => E_INVALID_NAME,
            SpecError::Parse { .. } => E_PARSE_ERROR,
            SpecError::SchemaViolation { .. } => E_SCHEMA_VIOLATION,
            SpecError::UnknownLanguage(_) => E_UNKNOWN_LANGUAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = SpecError::TypeMismatch {
            expected: LiteralKind::Integer,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "value 'abc' cannot be used as int");
        assert_eq!(err.code(), E_TYPE_MISMATCH);
    }

    #[test]
    fn test_schema_violation_joins_entries() {
        let err = SpecError::SchemaViolation {
            source_id: "config.yaml".to_string(),
            violations: vec!["$/a: first".to_string(), "$/b: second".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "config.yaml does not match the definition schema: $/a: first; $/b: second"
        );
        assert_eq!(err.code(), E_SCHEMA_VIOLATION);
    }
}
