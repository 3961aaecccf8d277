use confluent_spec::naming;
use confluent_spec::types::literal::format_float;
use confluent_spec::{Language, LiteralKind, NamingConvention, Value};

use crate::context::{EmitContext, Field, Module};
use crate::emitters::int32;
use crate::error::CodegenError;
use crate::render;
use crate::traits::LanguageEmitter;

const KEYWORDS: &[&str] = &[
    "_Alignas", "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary",
    "_Noreturn", "_Static_assert", "_Thread_local", "auto", "bool", "break", "case", "char",
    "const", "continue", "default", "do", "double", "else", "enum", "extern", "false", "float",
    "for", "goto", "if", "inline", "int", "long", "register", "restrict", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "true", "typedef", "union", "unsigned",
    "void", "volatile", "while",
];

/// C language emitter: a header with one `static const` anonymous struct.
pub struct CEmitter;

impl LanguageEmitter for CEmitter {
    fn language(&self) -> Language {
        Language::C
    }

    fn file_extension(&self) -> &'static str {
        "h"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Snake
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError> {
        let guard = format!(
            "{}_H",
            naming::convert(&module.file_stem, NamingConvention::ScreamingSnake)
        );

        ctx.line(format!("#ifndef {guard}"));
        ctx.line(format!("#define {guard}"));
        ctx.blank();
        ctx.line(format!("/* {} */", render::block_comment(&module.header)));

        // An empty struct is not valid C.
        if !module.fields.is_empty() {
            let values = module
                .fields
                .iter()
                .map(literal)
                .collect::<Result<Vec<_>, _>>()?;

            ctx.line("static const struct {");
            ctx.push_indent();
            for field in &module.fields {
                let comment = match &field.property.comment {
                    Some(text) => format!(" /* {} */", render::block_comment(text)),
                    None => String::new(),
                };
                ctx.line(format!(
                    "{} {};{comment}",
                    c_type(field.property.kind),
                    field.name
                ));
            }
            ctx.pop_indent();
            ctx.line(format!("}} {} = {{", module.type_name));
            ctx.push_indent();
            for value in values {
                ctx.line(format!("{value},"));
            }
            ctx.pop_indent();
            ctx.line("};");
        }

        ctx.blank();
        ctx.line(format!("#endif /* {guard} */"));
        Ok(())
    }
}

fn c_type(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Boolean => "unsigned char",
        LiteralKind::Integer => "int",
        LiteralKind::Float => "float",
        LiteralKind::Double => "double",
        LiteralKind::String | LiteralKind::Regex => "char*",
    }
}

fn literal(field: &Field<'_>) -> Result<String, CodegenError> {
    Ok(match &field.property.value {
        Value::Boolean(b) => u8::from(*b).to_string(),
        Value::Integer(i) => int32(Language::C, field, *i)?.to_string(),
        Value::Float(f) => format!("{}f", format_float(*f)),
        Value::String(text) => render::double_quoted(text),
        value => value.canonical_text(),
    })
}
