use std::sync::LazyLock;

use regex::Regex;

use confluent_spec::{Language, LiteralKind, NamingConvention, Value};

use crate::context::{EmitContext, Module};
use crate::error::CodegenError;
use crate::render;
use crate::traits::{LanguageEmitter, LanguageOption};

static PACKAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]+$").unwrap());

const KEYWORDS: &[&str] = &[
    "_", "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

/// Go language emitter: a package-level variable of an anonymous struct type.
pub struct GoEmitter;

impl LanguageEmitter for GoEmitter {
    fn language(&self) -> Language {
        Language::Go
    }

    fn file_extension(&self) -> &'static str {
        "go"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Snake
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn options(&self) -> &'static [LanguageOption] {
        &[LanguageOption::Package]
    }

    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError> {
        let package = module
            .config
            .package
            .as_deref()
            .ok_or(CodegenError::MissingOption {
                language: self.language(),
                option: "package",
            })?;
        if !PACKAGE_PATTERN.is_match(package) {
            return Err(CodegenError::invalid_option(
                "package",
                format!("'{package}' is not a valid Go package name"),
            ));
        }

        let width = module.longest_field_name();

        ctx.line(format!("package {package}"));
        ctx.blank();
        ctx.line(format!("// {}", module.header));
        ctx.line(format!("var {} = struct {{", module.type_name));
        ctx.push_indent();
        for field in &module.fields {
            let comment = match &field.property.comment {
                Some(text) => format!(" // {}", render::inline_comment(text)),
                None => String::new(),
            };
            ctx.line(format!(
                "{} {}{comment}",
                render::pad(&field.name, width),
                go_type(field.property.kind)
            ));
        }
        ctx.pop_indent();
        ctx.line("}{");
        ctx.push_indent();
        for field in &module.fields {
            ctx.line(format!(
                "{} {},",
                render::pad(&format!("{}:", field.name), width + 1),
                literal(&field.property.value)
            ));
        }
        ctx.pop_indent();
        ctx.line("}");
        Ok(())
    }
}

fn go_type(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Boolean => "bool",
        LiteralKind::Integer => "int64",
        LiteralKind::Float => "float32",
        LiteralKind::Double => "float64",
        LiteralKind::String | LiteralKind::Regex => "string",
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => render::double_quoted(text),
        value => value.canonical_text(),
    }
}
