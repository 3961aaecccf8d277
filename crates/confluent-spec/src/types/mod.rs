pub mod error;
pub mod language;
pub mod literal;
pub mod property;
pub mod source;

pub use error::SpecError;
pub use language::{ExportStyle, Language, LanguageConfig, NamingConvention};
pub use literal::{LiteralKind, RawValue, Value};
pub use property::{Origin, Part, Property, PropertySpec, ValueExpr};
pub use source::{IncludeSpec, Source, SourceDocument, SourceId};
