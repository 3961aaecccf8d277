use std::sync::LazyLock;

use jsonschema::Validator;
use schemars::schema_for;

use crate::types::source::SourceDocument;

static SOURCE_VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    Validator::new(&generate_source_schema()).expect("generated source schema should compile")
});

/// Generate a JSON Schema for definition sources.
pub fn generate_source_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(SourceDocument)).expect("schema serialization should not fail")
}

/// Validate a definition source (converted to JSON) against the source schema.
///
/// Each violation is reported as `<path>: <message>`, with `$` standing for
/// the document root.
pub fn validate_source(value: &serde_json::Value) -> Vec<String> {
    SOURCE_VALIDATOR
        .iter_errors(value)
        .map(|err| {
            let instance_path = err.instance_path.as_str();
            let path = if instance_path.is_empty() {
                "$".to_string()
            } else {
                format!("${instance_path}")
            };
            format!("{path}: {err}")
        })
        .collect()
}
