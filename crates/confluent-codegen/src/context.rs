use confluent_graph::ResolvedProperty;
use confluent_spec::LanguageConfig;

/// Tracks state during code emission: indentation and the lines written so far.
#[derive(Debug, Clone)]
pub struct EmitContext {
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indent
    indent_width: usize,
    lines: Vec<String>,
}

impl EmitContext {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_level: 0,
            indent_width,
            lines: Vec::new(),
        }
    }

    /// Get the current indentation string.
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_level * self.indent_width)
    }

    /// Increase indentation by one level.
    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation by one level.
    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Current indent level.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.indent(), text));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Drain the written lines into the final text, ending with a newline.
    pub fn finish(&mut self) -> String {
        let mut text = std::mem::take(&mut self.lines).join("\n");
        text.push('\n');
        text
    }
}

/// One emitted field: the target-language name and the property behind it.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    pub name: String,
    pub property: &'a ResolvedProperty,
}

/// Everything an emitter needs to render one artifact. Names are already
/// converted to the configured conventions and fields are in output order.
#[derive(Debug, Clone)]
pub struct Module<'a> {
    pub config: &'a LanguageConfig,
    pub type_name: String,
    /// File name without extension
    pub file_stem: String,
    /// Provenance text, without comment markers
    pub header: String,
    pub fields: Vec<Field<'a>>,
}

impl Module<'_> {
    /// Length of the longest field name.
    pub fn longest_field_name(&self) -> usize {
        self.fields.iter().map(|f| f.name.chars().count()).max().unwrap_or(0)
    }
}
