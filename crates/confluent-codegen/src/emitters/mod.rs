pub mod c_lang;
pub mod go_lang;
pub mod java;
pub mod javascript;
pub mod python;
pub mod rust_lang;
pub mod typescript;

use confluent_spec::Language;

use crate::context::Field;
use crate::error::CodegenError;
use crate::traits::LanguageEmitter;

/// Create the appropriate language emitter for the given language.
pub fn create_emitter(language: Language) -> Box<dyn LanguageEmitter> {
    match language {
        Language::Java => Box::new(java::JavaEmitter),
        Language::Javascript => Box::new(javascript::JavaScriptEmitter),
        Language::Typescript => Box::new(typescript::TypeScriptEmitter),
        Language::Python => Box::new(python::PythonEmitter),
        Language::Go => Box::new(go_lang::GoEmitter),
        Language::C => Box::new(c_lang::CEmitter),
        Language::Rust => Box::new(rust_lang::RustEmitter),
    }
}

/// Integer value of a field whose target type is a 32-bit `int`.
pub(crate) fn int32(language: Language, field: &Field<'_>, value: i64) -> Result<i32, CodegenError> {
    i32::try_from(value).map_err(|_| CodegenError::TypeMismatch {
        language,
        property: field.property.name.clone(),
        message: format!("value {value} does not fit in a 32-bit int"),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use confluent_graph::ResolvedProperty;
    use confluent_spec::{LanguageConfig, LiteralKind, Origin, SourceId, Value};

    use crate::context::{EmitContext, Field, Module};
    use crate::error::CodegenError;
    use crate::traits::LanguageEmitter;

    pub fn property(kind: LiteralKind, name: &str, value: Value) -> ResolvedProperty {
        ResolvedProperty {
            name: name.to_string(),
            kind,
            value,
            comment: None,
            hidden: false,
            origin: Origin {
                source: SourceId::from("test-config.yaml"),
                index: 0,
            },
        }
    }

    /// The visible properties of the reduced test configuration.
    pub fn sample() -> Vec<ResolvedProperty> {
        let mut regex = property(
            LiteralKind::Regex,
            "myRegex",
            Value::String("Test Reg(E|e)x".into()),
        );
        regex.comment = Some("Just another RegEx.".into());
        vec![
            property(LiteralKind::Boolean, "myBoolean", Value::Boolean(true)),
            property(LiteralKind::Integer, "myInteger", Value::Integer(142)),
            property(LiteralKind::Float, "myFloat", Value::Float(322.0)),
            property(LiteralKind::Double, "myDouble", Value::Double(233.9)),
            regex,
            property(
                LiteralKind::String,
                "mySubstitutedString",
                Value::String("Sometimes I just want to scream Hello World!".into()),
            ),
        ]
    }

    /// Render `properties` with field names kept as declared, apart from
    /// reserved-word escaping.
    pub fn render(
        emitter: &dyn LanguageEmitter,
        config: &LanguageConfig,
        properties: &[ResolvedProperty],
        type_name: &str,
        file_stem: &str,
    ) -> Result<String, CodegenError> {
        let module = Module {
            config,
            type_name: type_name.to_string(),
            file_stem: file_stem.to_string(),
            header: "Generated with confluent v0.1.0 (https://github.com/monstermichl/confluent)."
                .to_string(),
            fields: properties
                .iter()
                .map(|property| Field {
                    name: emitter.field_name(&property.name),
                    property,
                })
                .collect(),
        };
        let mut ctx = EmitContext::new(config.indent_width());
        emitter.emit_module(&module, &mut ctx)?;
        Ok(ctx.finish())
    }
}
