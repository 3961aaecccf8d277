use confluent_spec::{Language, LiteralKind, NamingConvention};

use crate::context::{EmitContext, Module};
use crate::emitters::javascript;
use crate::error::CodegenError;
use crate::render;
use crate::traits::LanguageEmitter;

/// Static members may not shadow these built-in function properties.
const RESERVED: &[&str] = &["prototype", "name", "length", "caller", "arguments"];

/// TypeScript language emitter: an exported class of `static readonly` members.
pub struct TypeScriptEmitter;

impl LanguageEmitter for TypeScriptEmitter {
    fn language(&self) -> Language {
        Language::Typescript
    }

    fn file_extension(&self) -> &'static str {
        "ts"
    }

    fn default_file_naming(&self) -> NamingConvention {
        NamingConvention::Kebap
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn emit_module(&self, module: &Module<'_>, ctx: &mut EmitContext) -> Result<(), CodegenError> {
        ctx.line(format!("// {}", module.header));
        ctx.line(format!("export class {} {{", module.type_name));
        ctx.push_indent();
        for field in &module.fields {
            let property = field.property;
            let comment = match &property.comment {
                Some(text) => format!(" // {}", render::inline_comment(text)),
                None => String::new(),
            };
            ctx.line(format!(
                "public static readonly {}: {} = {};{comment}",
                field.name,
                ts_type(property.kind),
                javascript::literal(self.language(), field)?
            ));
        }
        ctx.pop_indent();
        ctx.line("}");
        Ok(())
    }
}

fn ts_type(kind: LiteralKind) -> &'static str {
    match kind {
        LiteralKind::Boolean => "boolean",
        LiteralKind::Integer | LiteralKind::Float | LiteralKind::Double => "number",
        LiteralKind::String => "string",
        LiteralKind::Regex => "RegExp",
    }
}
