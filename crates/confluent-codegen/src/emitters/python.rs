use confluent_spec::{Language, LiteralKind, NamingConvention, Value};

use crate::context::{EmitContext, Module};
use crate::error::CodegenError;
use crate::render;
use crate::traits::LanguageEmitter;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Python language emitter: a plain class with annotated class attributes.
pub struct PythonEmitter;

impl LanguageEmitter for PythonEmitter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Snake
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError> {
        ctx.line(format!("# {}", module.header));
        ctx.blank();
        ctx.blank();
        ctx.line(format!("class {}:", module.type_name));
        ctx.push_indent();
        if module.fields.is_empty() {
            ctx.line("pass");
        }
        for field in &module.fields {
            let property = field.property;
            let comment = match &property.comment {
                Some(text) => format!("  # {}", render::inline_comment(text)),
                None => String::new(),
            };
            ctx.line(format!(
                "{}: {} = {}{comment}",
                field.name,
                py_type(property.kind),
                literal(property.kind, &property.value)
            ));
        }
        ctx.pop_indent();
        Ok(())
    }
}

fn py_type(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Boolean => "bool",
        LiteralKind::Integer => "int",
        LiteralKind::Float | LiteralKind::Double => "float",
        LiteralKind::String | LiteralKind::Regex => "str",
    }
}

fn literal(kind: LiteralKind, value: &Value) -> String {
    match (kind, value) {
        (_, Value::Boolean(true)) => "True".to_string(),
        (_, Value::Boolean(false)) => "False".to_string(),
        (LiteralKind::Regex, Value::String(pattern)) => {
            render::python_raw(pattern).unwrap_or_else(|| render::single_quoted(pattern))
        }
        (_, Value::String(text)) => render::single_quoted(text),
        (_, value) => value.canonical_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::test_support::{property, render, sample};
    use confluent_spec::LanguageConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_class() {
        let config = LanguageConfig::new(Language::Python);
        let text = render(&PythonEmitter, &config, &sample(), "TestConfig", "test_config").unwrap();
        assert_eq!(
            text,
            r#"# Generated with confluent v0.1.0 (https://github.com/monstermichl/confluent).


class TestConfig:
    myBoolean: bool = True
    myInteger: int = 142
    myFloat: float = 322.0
    myDouble: float = 233.9
    myRegex: str = r'Test Reg(E|e)x'  # Just another RegEx.
    mySubstitutedString: str = 'Sometimes I just want to scream Hello World!'
"#
        );
    }

    #[test]
    fn test_keyword_fields() {
        let config = LanguageConfig::new(Language::Python);
        let props = [
            property(LiteralKind::String, "from", Value::String("a".into())),
            property(LiteralKind::Boolean, "None", Value::Boolean(true)),
            property(LiteralKind::Integer, "match", Value::Integer(1)),
        ];
        let text = render(&PythonEmitter, &config, &props, "Keys", "keys").unwrap();
        assert!(text.contains("    from_: str = 'a'\n    None_: bool = True\n    match: int = 1\n"));
    }

    #[test]
    fn test_empty_class_has_pass() {
        let config = LanguageConfig::new(Language::Python);
        let text = render(&PythonEmitter, &config, &[], "Empty", "empty").unwrap();
        assert!(text.ends_with("class Empty:\n    pass\n"));
    }

    #[test]
    fn test_regex_falls_back_to_escaped_literal() {
        assert_eq!(
            literal(LiteralKind::Regex, &Value::String(r"it's\d".into())),
            r"'it\'s\\d'"
        );
        assert_eq!(literal(LiteralKind::Regex, &Value::String(r"\d+".into())), r"r'\d+'");
    }
}
