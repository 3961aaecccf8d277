use confluent_spec::naming;
use confluent_spec::{Language, LiteralKind, NamingConvention, Value};

use crate::context::{EmitContext, Module};
use crate::error::CodegenError;
use crate::render;
use crate::traits::LanguageEmitter;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "Self", "super"];

/// Rust language emitter: a `Copy` struct plus one `pub const` instance.
pub struct RustEmitter;

impl LanguageEmitter for RustEmitter {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Snake
    }

    fn default_property_naming(&self) -> Option<NamingConvention> {
        Some(NamingConvention::Snake)
    }

    fn field_name(&self, name: &str) -> String {
        if RESERVED.contains(&name) {
            format!("{name}_")
        } else if KEYWORDS.contains(&name) {
            format!("r#{name}")
        } else {
            name.to_string()
        }
    }

    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError> {
        let type_name = &module.type_name;

        ctx.line(format!("// {}", module.header));
        ctx.blank();
        ctx.line("#[derive(Debug, Clone, Copy, PartialEq)]");
        ctx.line(format!("pub struct {type_name} {{"));
        ctx.push_indent();
        for field in &module.fields {
            if let Some(comment) = &field.property.comment {
                for line in comment.lines() {
                    ctx.line(format!("/// {}", line.trim_end()).trim_end());
                }
            }
            ctx.line(format!(
                "pub {}: {},",
                field.name,
                rust_type(field.property.kind)
            ));
        }
        ctx.pop_indent();
        ctx.line("}");
        ctx.blank();

        let constant = naming::convert(type_name, NamingConvention::ScreamingSnake);
        ctx.line(format!("pub const {constant}: {type_name} = {type_name} {{"));
        ctx.push_indent();
        for field in &module.fields {
            ctx.line(format!(
                "{}: {},",
                field.name,
                literal(field.property.kind, &field.property.value)
            ));
        }
        ctx.pop_indent();
        ctx.line("};");
        Ok(())
    }
}

fn rust_type(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Boolean => "bool",
        LiteralKind::Integer => "i64",
        LiteralKind::Float => "f32",
        LiteralKind::Double => "f64",
        LiteralKind::String | LiteralKind::Regex => "&'static str",
    }
}

fn literal(kind: LiteralKind, value: &Value) -> String {
    match (kind, value) {
        (LiteralKind::Regex, Value::String(pattern)) => render::rust_raw(pattern),
        (_, Value::String(text)) => render::double_quoted(text),
        (_, value) => value.canonical_text(),
    }
}
