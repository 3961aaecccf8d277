use crate::schema_def;
use crate::types::error::SpecError;
use crate::types::source::{SourceDocument, SourceId};

/// Parse a YAML definition source.
///
/// The document is first checked against the source JSON schema so that
/// unknown keys, unknown types, and missing fields are reported together,
/// then deserialized into a [`SourceDocument`].
pub fn parse_source(content: &str, source_id: &SourceId) -> Result<SourceDocument, SpecError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| yaml_error_to_spec(e, source_id))?;

    let json = serde_json::to_value(&yaml).map_err(|e| SpecError::Parse {
        source_id: source_id.to_string(),
        message: format!("unsupported YAML structure: {e}"),
    })?;

    let violations = schema_def::validate_source(&json);
    if !violations.is_empty() {
        return Err(SpecError::SchemaViolation {
            source_id: source_id.to_string(),
            violations,
        });
    }

    // Deserialize from the YAML tree so that integers and floats keep the
    // distinction they had in the source.
    let document: SourceDocument =
        serde_yaml::from_value(yaml).map_err(|e| yaml_error_to_spec(e, source_id))?;

    tracing::debug!(
        source = %source_id,
        properties = document.properties.len(),
        includes = document.includes.len(),
        languages = document.languages.len(),
        "parsed definition source"
    );
    Ok(document)
}

fn yaml_error_to_spec(err: serde_yaml::Error, source_id: &SourceId) -> SpecError {
    let message = match err.location() {
        Some(loc) => format!("line {} column {}: {err}", loc.line(), loc.column()),
        None => err.to_string(),
    };
    SpecError::Parse {
        source_id: source_id.to_string(),
        message,
    }
}
