use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use confluent_graph::{build, resolve, ResolvedProperty, ResolvedPropertySet};
use confluent_spec::naming;
use confluent_spec::types::property::is_valid_name;
use confluent_spec::{Language, LanguageConfig, NamingConvention, Source, SourceLoader};

use crate::context::{EmitContext, Field, Module};
use crate::emitters;
use crate::error::{CodegenError, GenerateError};
use crate::traits::LanguageOption;

/// Tool identity written into the header line of every artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub tool: String,
    pub version: String,
    pub url: String,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            tool: "confluent".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            url: env!("CARGO_PKG_REPOSITORY").to_string(),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generated with {} v{} ({}).", self.tool, self.version, self.url)
    }
}

/// Field order of generated artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PropertyOrder {
    /// Declaration order of the merged graph
    #[default]
    Declaration,
    /// Listed names first, then the remaining properties in declaration order
    Explicit(Vec<String>),
}

impl PropertyOrder {
    /// The visible properties of `set` in this order.
    pub fn apply<'a>(
        &self,
        set: &'a ResolvedPropertySet,
    ) -> Result<Vec<&'a ResolvedProperty>, CodegenError> {
        let names = match self {
            PropertyOrder::Declaration => return Ok(set.visible().collect()),
            PropertyOrder::Explicit(names) => names,
        };

        let mut listed = Vec::with_capacity(names.len());
        for name in names {
            let property = set.get(name).ok_or_else(|| {
                CodegenError::invalid_option("order", format!("unknown property '{name}'"))
            })?;
            if listed.iter().any(|p: &&ResolvedProperty| p.name == *name) {
                return Err(CodegenError::invalid_option(
                    "order",
                    format!("'{name}' is listed more than once"),
                ));
            }
            listed.push(property);
        }

        let mut ordered: Vec<_> = listed.iter().copied().filter(|p| !p.hidden).collect();
        ordered.extend(
            set.visible()
                .filter(|p| !listed.iter().any(|l| l.name == p.name)),
        );
        Ok(ordered)
    }
}

/// One generated source file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub target_language: Language,
    pub file_name: String,
    pub rendered_text: String,
    pub provenance_header: String,
}

/// The generation pipeline: build the property graph, resolve it, and emit
/// one artifact per target language.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config_name: Option<String>,
    order: Option<PropertyOrder>,
    provenance: Provenance,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the generated files and types are derived from. Defaults to the
    /// stem of the first root source.
    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = Some(name.into());
        self
    }

    /// Field order. Defaults to the first `order` list found in the root
    /// sources, or declaration order.
    pub fn with_order(mut self, order: PropertyOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Run the whole pipeline. An empty `targets` list selects the
    /// non-ignored languages of the root sources.
    pub fn generate(
        &self,
        sources: &[Source],
        targets: &[LanguageConfig],
        loader: &dyn SourceLoader,
    ) -> Result<Vec<GeneratedArtifact>, GenerateError> {
        let graph = build(sources, loader)?;
        let resolved = resolve(&graph)?;

        let config_name = match &self.config_name {
            Some(name) => name.clone(),
            None => sources
                .first()
                .map(|s| s.id.stem().to_string())
                .unwrap_or_else(|| "config".to_string()),
        };
        let order = match &self.order {
            Some(order) => order.clone(),
            None => sources
                .iter()
                .find(|s| !s.document.order.is_empty())
                .map(|s| PropertyOrder::Explicit(s.document.order.clone()))
                .unwrap_or_default(),
        };
        let targets = if targets.is_empty() {
            source_targets(sources)
        } else {
            targets.to_vec()
        };

        let artifacts = self.emit(&resolved, &targets, &config_name, &order)?;
        info!(artifacts = artifacts.len(), config = %config_name, "generation finished");
        Ok(artifacts)
    }

    /// Emit artifacts for an already resolved property set, one per target,
    /// in target order. Targets are rendered concurrently.
    pub fn emit(
        &self,
        resolved: &ResolvedPropertySet,
        targets: &[LanguageConfig],
        config_name: &str,
        order: &PropertyOrder,
    ) -> Result<Vec<GeneratedArtifact>, CodegenError> {
        for (i, target) in targets.iter().enumerate() {
            if targets[..i].iter().any(|t| t.language == target.language) {
                return Err(CodegenError::invalid_option(
                    "language",
                    format!("{} is listed more than once", target.language),
                ));
            }
        }

        let properties = order.apply(resolved)?;
        let properties = properties.as_slice();

        let results: Vec<Result<GeneratedArtifact, CodegenError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = targets
                .iter()
                .map(|target| scope.spawn(move || self.emit_target(target, config_name, properties)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        results.into_iter().collect()
    }

    fn emit_target(
        &self,
        target: &LanguageConfig,
        config_name: &str,
        properties: &[&ResolvedProperty],
    ) -> Result<GeneratedArtifact, CodegenError> {
        let emitter = emitters::create_emitter(target.language);

        let set_options = [
            (LanguageOption::Package, target.package.is_some()),
            (LanguageOption::Export, target.export.is_some()),
        ];
        for (option, set) in set_options {
            if set && !emitter.options().contains(&option) {
                return Err(CodegenError::invalid_option(
                    option.key(),
                    format!("not supported for {}", target.language),
                ));
            }
        }

        let file_naming = target.file_naming.unwrap_or(emitter.default_file_naming());
        let file_stem = naming::convert(config_name, file_naming);
        if file_stem.is_empty() {
            return Err(CodegenError::invalid_option(
                "name",
                format!("'{config_name}' does not yield a file name"),
            ));
        }

        let type_naming = target.type_naming.unwrap_or(NamingConvention::Pascal);
        let type_name = naming::convert(config_name, type_naming);
        if !is_valid_name(&type_name) {
            return Err(CodegenError::invalid_option(
                "name",
                format!("'{type_name}' is not a valid {} type name", target.language),
            ));
        }

        let property_naming = target.property_naming.or(emitter.default_property_naming());
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(properties.len());
        let mut fields = Vec::with_capacity(properties.len());
        for &property in properties {
            let converted = match property_naming {
                Some(convention) => naming::convert(&property.name, convention),
                None => property.name.clone(),
            };
            let name = emitter.field_name(&converted);
            if let Some(previous) = seen.insert(name.clone(), &property.name) {
                return Err(CodegenError::invalid_option(
                    "property_naming",
                    format!("'{previous}' and '{}' both become '{name}'", property.name),
                ));
            }
            fields.push(Field { name, property });
        }

        let header = self.provenance.to_string();
        let module = Module {
            config: target,
            type_name,
            file_stem,
            header,
            fields,
        };
        let mut ctx = EmitContext::new(target.indent_width());
        emitter.emit_module(&module, &mut ctx)?;

        let file_name = format!("{}.{}", module.file_stem, emitter.file_extension());
        debug!(
            language = %emitter.language(),
            file = %file_name,
            fields = module.fields.len(),
            "emitted artifact"
        );

        Ok(GeneratedArtifact {
            target_language: target.language,
            file_name,
            rendered_text: ctx.finish(),
            provenance_header: module.header,
        })
    }
}

/// Non-ignored languages of the root sources, first occurrence wins.
fn source_targets(sources: &[Source]) -> Vec<LanguageConfig> {
    let mut targets: Vec<LanguageConfig> = Vec::new();
    for config in sources.iter().flat_map(|s| s.active_languages()) {
        if !targets.iter().any(|t| t.language == config.language) {
            targets.push(config.clone());
        }
    }
    targets
}

/// Build, resolve, and emit with default settings.
pub fn generate(
    sources: &[Source],
    targets: &[LanguageConfig],
    loader: &dyn SourceLoader,
) -> Result<Vec<GeneratedArtifact>, GenerateError> {
    Generator::new().generate(sources, targets, loader)
}

/// Write artifacts into `output_dir`, creating it if needed. Returns the
/// written paths in artifact order.
pub fn write_artifacts(
    artifacts: &[GeneratedArtifact],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, CodegenError> {
    std::fs::create_dir_all(output_dir).map_err(|error| CodegenError::Io {
        path: output_dir.display().to_string(),
        error,
    })?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = output_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.rendered_text).map_err(|error| CodegenError::Io {
            path: path.display().to_string(),
            error,
        })?;
        debug!(path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use confluent_spec::{LiteralKind, MemorySourceLoader, Origin, SourceId, Value};
    use pretty_assertions::assert_eq;

    fn property(name: &str, value: i64, hidden: bool) -> ResolvedProperty {
        ResolvedProperty {
            name: name.to_string(),
            kind: LiteralKind::Integer,
            value: Value::Integer(value),
            comment: None,
            hidden,
            origin: Origin {
                source: SourceId::from("test.yaml"),
                index: 0,
            },
        }
    }

    fn set() -> ResolvedPropertySet {
        [
            property("a", 1, false),
            property("b", 2, false),
            property("secret", 3, true),
            property("c", 4, false),
        ]
        .into_iter()
        .collect()
    }

    fn names(properties: &[&ResolvedProperty]) -> Vec<String> {
        properties.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_declaration_order_skips_hidden() {
        let set = set();
        let ordered = PropertyOrder::Declaration.apply(&set).unwrap();
        assert_eq!(names(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_explicit_order_lists_first() {
        let set = set();
        let order = PropertyOrder::Explicit(vec!["c".into(), "secret".into(), "a".into()]);
        let ordered = order.apply(&set).unwrap();
        assert_eq!(names(&ordered), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_explicit_order_rejects_unknown_and_repeated() {
        let set = set();
        let err = PropertyOrder::Explicit(vec!["missing".into()])
            .apply(&set)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid option 'order': unknown property 'missing'");

        let err = PropertyOrder::Explicit(vec!["a".into(), "a".into()])
            .apply(&set)
            .unwrap_err();
        assert_eq!(err.code(), "E_INVALID_OPTION");
    }

    #[test]
    fn test_provenance_header() {
        let provenance = Provenance {
            tool: "confluent".into(),
            version: "1.2.3".into(),
            url: "https://example.com".into(),
        };
        assert_eq!(
            provenance.to_string(),
            "Generated with confluent v1.2.3 (https://example.com)."
        );
        assert!(Provenance::default().to_string().starts_with("Generated with confluent v"));
    }

    #[test]
    fn test_emit_keeps_target_order() {
        let targets = [
            LanguageConfig::new(Language::Rust),
            LanguageConfig::new(Language::Python),
            LanguageConfig::new(Language::Typescript),
        ];
        let artifacts = Generator::new()
            .emit(&set(), &targets, "app-settings", &PropertyOrder::Declaration)
            .unwrap();
        let files: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(files, vec!["app_settings.rs", "app_settings.py", "app-settings.ts"]);
        assert!(artifacts[0].rendered_text.contains("pub struct AppSettings {"));
        assert!(!artifacts[1].rendered_text.contains("secret"));
    }

    #[test]
    fn test_emit_rejects_duplicate_targets_and_foreign_options() {
        let generator = Generator::new();
        let targets = [
            LanguageConfig::new(Language::Python),
            LanguageConfig::new(Language::Python),
        ];
        let err = generator
            .emit(&set(), &targets, "config", &PropertyOrder::Declaration)
            .unwrap_err();
        assert_eq!(err.code(), "E_INVALID_OPTION");

        let targets = [LanguageConfig::new(Language::Python).with_package("pkg")];
        let err = generator
            .emit(&set(), &targets, "config", &PropertyOrder::Declaration)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid option 'package': not supported for python");
    }

    #[test]
    fn test_property_naming_collision() {
        let set: ResolvedPropertySet = [property("myValue", 1, false), property("my_value", 2, false)]
            .into_iter()
            .collect();
        let targets = [LanguageConfig::new(Language::Rust)];
        let err = Generator::new()
            .emit(&set, &targets, "config", &PropertyOrder::Declaration)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid option 'property_naming': 'myValue' and 'my_value' both become 'my_value'"
        );
    }

    #[test]
    fn test_reserved_words_are_escaped_after_conversion() {
        let set: ResolvedPropertySet = [property("class", 1, false), property("Type", 2, false)]
            .into_iter()
            .collect();
        let targets = [
            LanguageConfig::new(Language::Python),
            LanguageConfig::new(Language::Rust),
        ];
        let artifacts = Generator::new()
            .emit(&set, &targets, "config", &PropertyOrder::Declaration)
            .unwrap();
        assert!(artifacts[0].rendered_text.contains("    class_: int = 1\n    Type: int = 2\n"));
        assert!(artifacts[1].rendered_text.contains("    pub class: i64,\n    pub r#type: i64,\n"));

        let set: ResolvedPropertySet = [property("class", 1, false), property("class_", 2, false)]
            .into_iter()
            .collect();
        let err = Generator::new()
            .emit(&set, &targets[..1], "config", &PropertyOrder::Declaration)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid option 'property_naming': 'class' and 'class_' both become 'class_'"
        );
    }

    #[test]
    fn test_invalid_config_name() {
        let targets = [LanguageConfig::new(Language::Python)];
        let err = Generator::new()
            .emit(&set(), &targets, "1st", &PropertyOrder::Declaration)
            .unwrap_err();
        assert_eq!(err.code(), "E_INVALID_OPTION");
    }

    #[test]
    fn test_generate_uses_source_languages_and_order() {
        let loader = MemorySourceLoader::new().with_source(
            "app.yaml",
            "languages:\n  - language: typescript\n  - language: python\n    ignore: true\n  - language: typescript\n    indent: 2\norder: [b]\nproperties:\n  - type: int\n    name: a\n    value: 1\n  - type: int\n    name: b\n    value: 2\n",
        );
        let root = loader.read_root("app.yaml").unwrap();
        let artifacts = generate(&[root], &[], &loader).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "app.ts");
        assert_eq!(
            artifacts[0].rendered_text,
            format!(
                "// {}\nexport class App {{\n    public static readonly b: number = 2;\n    public static readonly a: number = 1;\n}}\n",
                Provenance::default()
            )
        );
    }

    #[test]
    fn test_generate_stops_at_first_failure() {
        let loader = MemorySourceLoader::new().with_source(
            "app.yaml",
            "properties:\n  - type: string\n    name: a\n    value: ${b}\n  - type: string\n    name: b\n    value: ${a}\n",
        );
        let root = loader.read_root("app.yaml").unwrap();
        let targets = [LanguageConfig::new(Language::Python)];
        let err = generate(&[root], &targets, &loader).unwrap_err();
        assert!(matches!(err, GenerateError::Resolve(_)));
        assert_eq!(err.code(), "E_CYCLIC_REFERENCE");
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let artifacts = Generator::new()
            .emit(
                &set(),
                &[LanguageConfig::new(Language::Python)],
                "config",
                &PropertyOrder::Declaration,
            )
            .unwrap();

        let written = write_artifacts(&artifacts, &out).unwrap();
        assert_eq!(written, vec![out.join("config.py")]);
        assert_eq!(
            std::fs::read_to_string(&written[0]).unwrap(),
            artifacts[0].rendered_text
        );
    }
}
