pub mod context;
pub mod error;
pub mod generator;
pub mod render;
pub mod traits;

// Language emitters
pub mod emitters;

// Re-exports
pub use context::{EmitContext, Field, Module};
pub use error::{CodegenError, GenerateError};
pub use generator::{
    generate, write_artifacts, GeneratedArtifact, Generator, PropertyOrder, Provenance,
};
pub use traits::LanguageEmitter;
