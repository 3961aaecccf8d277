use std::sync::LazyLock;

use regex::Regex;

use confluent_spec::types::literal::{format_double, format_float};
use confluent_spec::{Language, LiteralKind, NamingConvention, Value};

use crate::context::{EmitContext, Field, Module};
use crate::emitters::int32;
use crate::error::CodegenError;
use crate::render;
use crate::traits::{LanguageEmitter, LanguageOption};

static PACKAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_]\w*(\.[a-zA-Z_]\w*)*$").unwrap());

const KEYWORDS: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Java language emitter: a class of `public final static` constants.
pub struct JavaEmitter;

impl LanguageEmitter for JavaEmitter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn file_extension(&self) -> &'static str {
        "java"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Pascal
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
                format!("'{package}' is not a valid Java package name"),
            ));
        }
        // A public class must live in a file of the same name.
        if module.file_stem != module.type_name {
            return Err(CodegenError::InvalidFileName {
                language: self.language(),
                file_name: format!("{}.java", module.file_stem),
                type_name: module.type_name.clone(),
            });
        }

        ctx.line(format!("package {package};"));
        ctx.blank();
        ctx.line(format!("// {}", module.header));
        ctx.line(format!("public class {} {{", module.type_name));
        ctx.push_indent();
        for field in &module.fields {
            let (java_type, value) = literal(field)?;
            let comment = match &field.property.comment {
                Some(text) => format!(" // {}", render::inline_comment(text)),
                None => String::new(),
            };
            ctx.line(format!(
                "public final static {java_type} {} = {value};{comment}",
                field.name
            ));
        }
        ctx.pop_indent();
        ctx.line("}");
        Ok(())
    }
}

fn literal(field: &Field<'_>) -> Result<(&'static str, String), CodegenError> {
    let property = field.property;
    Ok(match (property.kind, &property.value) {
        (LiteralKind::Boolean, Value::Boolean(b)) => ("boolean", b.to_string()),
        (LiteralKind::Integer, Value::Integer(i)) => {
            ("int", int32(Language::Java, field, *i)?.to_string())
        }
        (LiteralKind::Float, Value::Float(f)) => ("float", format!("{}f", format_float(*f))),
        (LiteralKind::Double, Value::Double(d)) => ("double", format!("{}d", format_double(*d))),
        (_, value) => ("String", render::double_quoted(&value.canonical_text())),
    })
}
