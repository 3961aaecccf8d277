use std::fmt;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::SpecError;
use super::language::LanguageConfig;
use super::property::PropertySpec;
use crate::loader::SourceText;
use crate::parser;

/// Identifies a definition source (a file path for file-backed sources).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without directories and without the last extension,
    /// e.g. `config/test-config.yaml` → `test-config`.
    pub fn stem(&self) -> &str {
        let file_name = self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0);
        match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&Path> for SourceId {
    fn from(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

/// An `includes` entry naming another definition source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct IncludeSpec {
    /// Include reference, resolved by the source loader (relative paths are
    /// relative to the including source)
    pub path: String,

    /// Included properties may replace earlier definitions of the same name
    #[serde(default, rename = "override", skip_serializing_if = "std::ops::Not::not")]
    pub overrides: bool,

    /// Included properties are resolved but not emitted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore: bool,
}

/// The structured content of one definition source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SourceDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<IncludeSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageConfig>,

    /// Explicit field order for emitted artifacts; unlisted properties follow
    /// in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,

    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// A parsed definition source together with its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: SourceId,
    pub document: SourceDocument,
}

impl Source {
    pub fn new(id: SourceId, document: SourceDocument) -> Self {
        Self { id, document }
    }

    /// Parse loaded source text.
    pub fn parse(text: SourceText) -> Result<Self, SpecError> {
        let document = parser::parse_source(&text.content, &text.id)?;
        Ok(Self {
            id: text.id,
            document,
        })
    }

    /// Languages that are not marked as ignored.
    pub fn active_languages(&self) -> impl Iterator<Item = &LanguageConfig> {
        self.document.languages.iter().filter(|l| !l.ignore)
    }
}
