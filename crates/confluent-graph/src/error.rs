use thiserror::Error;

use confluent_spec::types::error::{
    E_CYCLIC_REFERENCE, E_DUPLICATE_PROPERTY, E_INCLUDE_CYCLE, E_INVALID_EXPRESSION,
    E_TYPE_MISMATCH, E_UNRESOLVED_REFERENCE,
};
use confluent_spec::{LoadError, Origin, SpecError};

/// Errors raised while merging definition sources into a property graph.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{error} (in {source_id})")]
    InvalidSource {
        source_id: String,
        #[source]
        error: SpecError,
    },

    #[error("cannot resolve include '{reference}' from {included_from}")]
    UnresolvedInclude {
        reference: String,
        included_from: String,
        #[source]
        error: LoadError,
    },

    #[error("include cycle: {}", .path.join(" -> "))]
    IncludeCycle { path: Vec<String> },

    #[error("include '{reference}' exceeds the maximum include depth of {limit}")]
    IncludeTooDeep { reference: String, limit: usize },

    #[error("property '{name}' is defined twice ({first} and {second}) without override")]
    DuplicateProperty {
        name: String,
        first: Origin,
        second: Origin,
    },
}

impl BuildError {
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::InvalidSource { error, .. } => error.code(),
            BuildError::UnresolvedInclude { error, .. } => error.code(),
            BuildError::IncludeCycle { .. } | BuildError::IncludeTooDeep { .. } => E_INCLUDE_CYCLE,
            BuildError::DuplicateProperty { .. } => E_DUPLICATE_PROPERTY,
        }
    }
}

/// Errors raised while evaluating a property graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("cyclic reference: {}", .cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    #[error("property '{property}' references unknown property '{reference}'")]
    UnresolvedReference { property: String, reference: String },

    #[error("property '{property}': {message}")]
    TypeMismatch { property: String, message: String },

    #[error("property '{property}' has an invalid expression: {message}")]
    InvalidExpression { property: String, message: String },
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::CyclicReference { .. } => E_CYCLIC_REFERENCE,
            ResolveError::UnresolvedReference { .. } => E_UNRESOLVED_REFERENCE,
            ResolveError::TypeMismatch { .. } => E_TYPE_MISMATCH,
            ResolveError::InvalidExpression { .. } => E_INVALID_EXPRESSION,
        }
    }
}
