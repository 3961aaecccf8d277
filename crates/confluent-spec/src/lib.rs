//! Definition sources for confluent: the literal type system, the YAML source
//! format and its JSON schema, naming conventions, and the source-loader
//! interface used to resolve includes.

pub mod loader;
pub mod naming;
pub mod parser;
pub mod schema_def;
pub mod types;

pub use loader::{FileSourceLoader, LoadError, MemorySourceLoader, ReadError, SourceLoader, SourceText};
pub use types::{
    ExportStyle, Language, LanguageConfig, LiteralKind, NamingConvention, Origin, Part, Property,
    PropertySpec, RawValue, Source, SourceDocument, SourceId, SpecError, Value, ValueExpr,
};
