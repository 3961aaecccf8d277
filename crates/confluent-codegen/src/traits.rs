use confluent_spec::{Language, NamingConvention};

use crate::context::{EmitContext, Module};
use crate::error::CodegenError;

/// Optional `LanguageConfig` keys that only some languages accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageOption {
    Package,
    Export,
}

impl LanguageOption {
    pub fn key(self) -> &'static str {
        match self {
            LanguageOption::Package => "package",
            LanguageOption::Export => "export",
        }
    }
}

/// Language-specific code emitter.
///
/// Each target language implements this trait to render a resolved property
/// set as one source module holding a single aggregate declaration.
/// Emitters hold no state, so one instance can serve concurrent runs.
pub trait LanguageEmitter: Send + Sync {
    /// Which language this emitter targets.
    fn language(&self) -> Language;

    /// File extension for this language (e.g., "ts", "rs", "py", "go").
    fn file_extension(&self) -> &'static str;

    /// File naming used when the language config does not set one.
    fn default_file_naming(&self) -> NamingConvention;

    /// Field naming used when the language config does not set one.
    /// `None` keeps property names as declared.
    fn default_property_naming(&self) -> Option<NamingConvention> {
        None
    }

    /// Words that cannot name a field of the generated declaration.
    fn reserved_words(&self) -> &'static [&'static str] {
        &[]
    }

    /// Field name for a (converted) property name. Reserved words get a
    /// trailing `_`.
    fn field_name(&self, name: &str) -> String {
        if self.reserved_words().contains(&name) {
            format!("{name}_")
        } else {
            name.to_string()
        }
    }

    /// Optional config keys this language understands.
    fn options(&self) -> &'static [LanguageOption] {
        &[]
    }

    /// Render the module into `ctx`.
    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError>;
}
