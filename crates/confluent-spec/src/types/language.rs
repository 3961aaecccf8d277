use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::SpecError;

/// Target programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Javascript,
    Typescript,
    Python,
    Go,
    C,
    Rust,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Java,
        Language::Javascript,
        Language::Typescript,
        Language::Python,
        Language::Go,
        Language::C,
        Language::Rust,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
            Language::C => "c",
            Language::Rust => "rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "javascript" | "js" => Ok(Language::Javascript),
            "typescript" | "ts" => Ok(Language::Typescript),
            "python" | "py" => Ok(Language::Python),
            "go" | "golang" => Ok(Language::Go),
            "c" => Ok(Language::C),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(SpecError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Case convention applied to file, type, and property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    Snake,
    ScreamingSnake,
    Camel,
    Pascal,
    Kebap,
}

/// How a JavaScript module exposes its generated class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    /// `module.exports = TestConfig`
    #[default]
    Common,
    /// `export default TestConfig`
    Esm,
    None,
}

/// Per-target generation settings, as listed under `languages` in a
/// definition source or supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    pub language: Language,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_naming: Option<NamingConvention>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_naming: Option<NamingConvention>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_naming: Option<NamingConvention>,

    /// Spaces per indentation level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,

    /// Java or Go package of the generated module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// JavaScript export style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportStyle>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore: bool,
}

impl LanguageConfig {
    pub const DEFAULT_INDENT: usize = 4;

    pub fn new(language: Language) -> Self {
        Self {
            language,
            file_naming: None,
            type_naming: None,
            property_naming: None,
            indent: None,
            package: None,
            export: None,
            ignore: false,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn with_property_naming(mut self, convention: NamingConvention) -> Self {
        self.property_naming = Some(convention);
        self
    }

    pub fn indent_width(&self) -> usize {
        self.indent.unwrap_or(Self::DEFAULT_INDENT)
    }
}
