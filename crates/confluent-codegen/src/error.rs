use thiserror::Error;

use confluent_graph::{BuildError, ResolveError};
use confluent_spec::types::error::{
    E_INVALID_FILE_NAME, E_INVALID_OPTION, E_IO, E_MISSING_OPTION, E_TYPE_MISMATCH,
};
use confluent_spec::Language;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("{language}: missing required option '{option}'")]
    MissingOption {
        language: Language,
        option: &'static str,
    },

    #[error("invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    #[error("{language}: property '{property}' {message}")]
    TypeMismatch {
        language: Language,
        property: String,
        message: String,
    },

    #[error("{language}: file name '{file_name}' must match the type name '{type_name}'")]
    InvalidFileName {
        language: Language,
        file_name: String,
        type_name: String,
    },

    #[error("IO error writing {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
}

impl CodegenError {
    pub fn code(&self) -> &'static str {
        match self {
            CodegenError::MissingOption { .. } => E_MISSING_OPTION,
            CodegenError::InvalidOption { .. } => E_INVALID_OPTION,
            CodegenError::TypeMismatch { .. } => E_TYPE_MISMATCH,
            CodegenError::InvalidFileName { .. } => E_INVALID_FILE_NAME,
            CodegenError::Io { .. } => E_IO,
        }
    }

    pub(crate) fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        CodegenError::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}

/// First failure of a generation run, tagged with the stage it came from.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl GenerateError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Build(e) => e.code(),
            GenerateError::Resolve(e) => e.code(),
            GenerateError::Codegen(e) => e.code(),
        }
    }
}
