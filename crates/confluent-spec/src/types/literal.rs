use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::SpecError;

/// Closed set of value kinds a property can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum LiteralKind {
    #[serde(rename = "bool")]
    Boolean,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "string")]
    String,
    /// A string that documents itself as a regular expression. Emitters may
    /// render it with a regex literal where the target language has one.
    #[serde(rename = "regex")]
    Regex,
}

impl LiteralKind {
    /// Validate a raw source value against this kind and normalize it.
    pub fn coerce(self, raw: &RawValue) -> Result<Value, SpecError> {
        match (self, raw) {
            (LiteralKind::Boolean, RawValue::Bool(b)) => Ok(Value::Boolean(*b)),
            (LiteralKind::Boolean, RawValue::Integer(0)) => Ok(Value::Boolean(false)),
            (LiteralKind::Boolean, RawValue::Integer(1)) => Ok(Value::Boolean(true)),
            (LiteralKind::Integer, RawValue::Integer(i)) => Ok(Value::Integer(*i)),
            (LiteralKind::Integer, RawValue::Float(f))
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Ok(Value::Integer(*f as i64))
            }
            (LiteralKind::Float | LiteralKind::Double, RawValue::Integer(i)) => {
                self.from_f64(*i as f64, &raw.text())
            }
            (LiteralKind::Float | LiteralKind::Double, RawValue::Float(f)) => {
                self.from_f64(*f, &raw.text())
            }
            (LiteralKind::String | LiteralKind::Regex, raw) => Ok(Value::String(raw.text())),
            (kind, RawValue::Text(text)) => kind.parse_text(text),
            (kind, raw) => Err(SpecError::TypeMismatch {
                expected: kind,
                value: raw.text(),
            }),
        }
    }

    /// Parse a textual representation (as written in a source or produced by
    /// substitution) into a value of this kind.
    pub fn parse_text(self, text: &str) -> Result<Value, SpecError> {
        let mismatch = || SpecError::TypeMismatch {
            expected: self,
            value: text.to_string(),
        };
        let trimmed = text.trim();

        match self {
            LiteralKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Boolean(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
            LiteralKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| mismatch()),
            LiteralKind::Float | LiteralKind::Double => {
                // Rust accepts "inf"/"nan" spellings; only decimal notation is allowed here.
                if !trimmed
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
                {
                    return Err(mismatch());
                }
                let parsed = trimmed.parse::<f64>().map_err(|_| mismatch())?;
                self.from_f64(parsed, text)
            }
            LiteralKind::String | LiteralKind::Regex => Ok(Value::String(text.to_string())),
        }
    }

    /// Store a computed floating point number as this kind.
    pub fn from_f64(self, value: f64, original: &str) -> Result<Value, SpecError> {
        let mismatch = || SpecError::TypeMismatch {
            expected: self,
            value: original.to_string(),
        };
        if !value.is_finite() {
            return Err(mismatch());
        }
        match self {
            LiteralKind::Float => {
                let narrowed = value as f32;
                if narrowed.is_finite() {
                    Ok(Value::Float(narrowed))
                } else {
                    Err(mismatch())
                }
            }
            LiteralKind::Double => Ok(Value::Double(value)),
            _ => Err(mismatch()),
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::Boolean => "bool",
            LiteralKind::Integer => "int",
            LiteralKind::Float => "float",
            LiteralKind::Double => "double",
            LiteralKind::String => "string",
            LiteralKind::Regex => "regex",
        };
        f.write_str(name)
    }
}

/// A value exactly as written in a definition source, before it is checked
/// against the declared kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Canonical text of the raw value.
    pub fn text(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Integer(i) => i.to_string(),
            RawValue::Float(f) => format_double(*f),
            RawValue::Text(s) => s.clone(),
        }
    }
}

/// Canonical in-memory representation of a literal.
///
/// Regex properties carry a `String` value; the distinction lives on the
/// property's declared kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Value {
    /// Render the value as plain text, the form used when it is substituted
    /// into a string.
    pub fn canonical_text(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Double(d) => format_double(*d),
            Value::String(s) => s.clone(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
        }
    }
}

/// Shortest round-trip decimal form of a single-precision float, always with
/// a decimal point (`322.0`, `233.9`).
pub fn format_float(value: f32) -> String {
    ensure_decimal_point(value.to_string())
}

/// Shortest round-trip decimal form of a double-precision float, always with
/// a decimal point.
pub fn format_double(value: f64) -> String {
    ensure_decimal_point(value.to_string())
}

fn ensure_decimal_point(text: String) -> String {
    if text.contains(['.', 'e', 'E']) || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{text}.0")
    }
}
