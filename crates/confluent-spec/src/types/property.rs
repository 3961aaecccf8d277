use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::SpecError;
use super::literal::{LiteralKind, RawValue, Value};
use super::source::SourceId;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(_|[a-zA-Z])\w*$").unwrap());

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());

/// A single entry of a source's `properties` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub kind: LiteralKind,

    pub name: String,

    /// Literal value, or text with `${name}` substitutions
    pub value: RawValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Resolved and usable in substitutions, but not emitted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    /// Replace an earlier definition with the same name instead of failing
    #[serde(default, rename = "override", skip_serializing_if = "std::ops::Not::not")]
    pub overrides: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore: bool,
}

/// Where a property was declared: the source and its position in that
/// source's `properties` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Origin {
    pub source: SourceId,
    pub index: usize,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#properties[{}]", self.source, self.index)
    }
}

/// One fragment of a composite value expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Part {
    Text(String),
    Reference(String),
}

/// The value side of a property before resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueExpr {
    Literal(Value),
    Composite(Vec<Part>),
}

impl ValueExpr {
    /// Build the expression for a raw value declared with `kind`.
    ///
    /// Text containing at least one `${name}` token becomes a composite; any
    /// other value is coerced to `kind` right away.
    pub fn from_raw(kind: LiteralKind, raw: &RawValue) -> Result<Self, SpecError> {
        match raw {
            RawValue::Text(text) if REFERENCE_PATTERN.is_match(text) => {
                Ok(ValueExpr::Composite(split_parts(text)))
            }
            _ => kind.coerce(raw).map(ValueExpr::Literal),
        }
    }

    /// Names referenced by this expression, in order of appearance.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        let parts: &[Part] = match self {
            ValueExpr::Literal(_) => &[],
            ValueExpr::Composite(parts) => parts,
        };
        parts.iter().filter_map(|part| match part {
            Part::Reference(name) => Some(name.as_str()),
            Part::Text(_) => None,
        })
    }
}

fn split_parts(text: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut last = 0;

    for captures in REFERENCE_PATTERN.captures_iter(text) {
        let whole = captures.get(0).unwrap();
        if whole.start() > last {
            parts.push(Part::Text(text[last..whole.start()].to_string()));
        }
        parts.push(Part::Reference(captures[1].to_string()));
        last = whole.end();
    }
    if last < text.len() {
        parts.push(Part::Text(text[last..].to_string()));
    }
    parts
}

/// A typed property node of the property graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub kind: LiteralKind,
    pub value: ValueExpr,
    pub comment: Option<String>,
    pub hidden: bool,
    pub origin: Origin,
}

impl Property {
    pub fn from_spec(spec: &PropertySpec, origin: Origin) -> Result<Self, SpecError> {
        if !is_valid_name(&spec.name) {
            return Err(SpecError::InvalidName(spec.name.clone()));
        }

        Ok(Self {
            name: spec.name.clone(),
            kind: spec.kind,
            value: ValueExpr::from_raw(spec.kind, &spec.value)?,
            comment: spec.comment.clone(),
            hidden: spec.hidden,
            origin,
        })
    }
}

/// Property names must be usable as identifiers in every target language.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}
