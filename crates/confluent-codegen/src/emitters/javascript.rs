use confluent_spec::{ExportStyle, Language, LiteralKind, NamingConvention, Value};

use crate::context::{EmitContext, Field, Module};
use crate::error::CodegenError;
use crate::render;
use crate::traits::{LanguageEmitter, LanguageOption};

/// Largest integer a JavaScript number holds exactly (`Number.MAX_SAFE_INTEGER`).
const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// A static member named `prototype` is a syntax error in a class body.
const RESERVED: &[&str] = &["prototype"];

/// JavaScript language emitter: a class of static getters.
pub struct JavaScriptEmitter;

impl LanguageEmitter for JavaScriptEmitter {
    fn language(&self) -> Language {
        Language::Javascript
    }

    fn file_extension(&self) -> &'static str {
        "js"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Kebap
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn options(&self) -> &'static [LanguageOption] {
        &[LanguageOption::Export]
    }

    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError> {
        ctx.line(format!("// {}", module.header));
        ctx.line(format!("class {} {{", module.type_name));
        ctx.push_indent();
        for field in &module.fields {
            let comment = match &field.property.comment {
                Some(text) => format!(" // {}", render::inline_comment(text)),
                None => String::new(),
            };
            ctx.line(format!(
                "static get {}() {{ return {}; }}{comment}",
                field.name,
                literal(self.language(), field)?
            ));
        }
        ctx.pop_indent();
        ctx.line("}");

        match module.config.export.unwrap_or_default() {
            ExportStyle::Common => ctx.line(format!("module.exports = {};", module.type_name)),
            ExportStyle::Esm => ctx.line(format!("export default {};", module.type_name)),
            ExportStyle::None => {}
        }
        Ok(())
    }
}

/// JavaScript literal syntax, shared with the TypeScript emitter. Integers
/// must stay within the range a `number` represents exactly.
pub(crate) fn literal(language: Language, field: &Field<'_>) -> Result<String, CodegenError> {
    let property = field.property;
    Ok(match (property.kind, &property.value) {
        (_, Value::Integer(i)) if !(-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(i) => {
            return Err(CodegenError::TypeMismatch {
                language,
                property: property.name.clone(),
                message: format!("value {i} is beyond Number.MAX_SAFE_INTEGER"),
            });
        }
        (LiteralKind::Regex, Value::String(pattern)) => render::regex_literal(pattern),
        (_, Value::String(text)) => render::single_quoted(text),
        (_, value) => value.canonical_text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support::{property, render, sample};
    use confluent_spec::LanguageConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_class_with_commonjs_export() {
        let config = LanguageConfig::new(Language::Javascript);
        let text = render(&JavaScriptEmitter, &config, &sample(), "TestConfig", "test-config").unwrap();
        assert_eq!(
            text,
            r#"// Generated with confluent v0.1.0 (https://github.com/monstermichl/confluent).
class TestConfig {
    static get myBoolean() { return true; }
    static get myInteger() { return 142; }
    static get myFloat() { return 322.0; }
    static get myDouble() { return 233.9; }
    static get myRegex() { return /Test Reg(E|e)x/; } // Just another RegEx.
    static get mySubstitutedString() { return 'Sometimes I just want to scream Hello World!'; }
}
module.exports = TestConfig;
"#
        );
    }

    #[test]
    fn test_export_styles() {
        let mut config = LanguageConfig::new(Language::Javascript).with_indent(2);
        config.export = Some(ExportStyle::Esm);
        let text = render(&JavaScriptEmitter, &config, &sample(), "TestConfig", "test-config").unwrap();
        assert!(text.ends_with("}\nexport default TestConfig;\n"));
        assert!(text.contains("\n  static get myBoolean()"));

        config.export = Some(ExportStyle::None);
        let text = render(&JavaScriptEmitter, &config, &sample(), "TestConfig", "test-config").unwrap();
        assert!(text.ends_with("}\n"));
    }

    fn text(kind: LiteralKind, value: Value) -> Result<String, CodegenError> {
        let property = property(kind, "value", value);
        let field = Field {
            name: property.name.clone(),
            property: &property,
        };
        literal(Language::Javascript, &field)
    }

    #[test]
    fn test_literals() {
        assert_eq!(text(LiteralKind::Regex, Value::String("a/b".into())).unwrap(), r"/a\/b/");
        assert_eq!(text(LiteralKind::String, Value::String("it's".into())).unwrap(), r"'it\'s'");
        assert_eq!(text(LiteralKind::Boolean, Value::Boolean(false)).unwrap(), "false");
        assert_eq!(text(LiteralKind::Float, Value::Float(45724.0)).unwrap(), "45724.0");
    }

    #[test]
    fn test_integers_beyond_safe_range() {
        assert_eq!(
            text(LiteralKind::Integer, Value::Integer(9_007_199_254_740_991)).unwrap(),
            "9007199254740991"
        );
        assert_eq!(
            text(LiteralKind::Integer, Value::Integer(-9_007_199_254_740_991)).unwrap(),
            "-9007199254740991"
        );

        for big in [9_007_199_254_740_993, -9_007_199_254_740_992, i64::MIN] {
            let err = text(LiteralKind::Integer, Value::Integer(big)).unwrap_err();
            assert_eq!(err.code(), "E_TYPE_MISMATCH", "{big}");
        }

        let config = LanguageConfig::new(Language::Javascript);
        let props = [property(
            LiteralKind::Integer,
            "id",
            Value::Integer(9_007_199_254_740_993),
        )];
        let err = render(&JavaScriptEmitter, &config, &props, "Ids", "ids").unwrap_err();
        assert_eq!(
            err.to_string(),
            "javascript: property 'id' value 9007199254740993 is beyond Number.MAX_SAFE_INTEGER"
        );
    }

    #[test]
    fn test_prototype_member_is_escaped() {
        let config = LanguageConfig::new(Language::Javascript);
        let props = [
            property(LiteralKind::Integer, "prototype", Value::Integer(1)),
            property(LiteralKind::Integer, "class", Value::Integer(2)),
        ];
        let text = render(&JavaScriptEmitter, &config, &props, "Keys", "keys").unwrap();
        assert!(text.contains("    static get prototype_() { return 1; }\n"));
        assert!(text.contains("    static get class() { return 2; }\n"));
    }
}
