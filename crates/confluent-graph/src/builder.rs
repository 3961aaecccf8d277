use std::collections::HashSet;
use std::fmt;

use confluent_spec::{Origin, Property, Source, SourceId, SourceLoader};

use crate::error::BuildError;
use crate::graph::PropertyGraph;

/// Maximum nesting of include directives below a root source.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Merge `sources` and everything they include into one property graph.
///
/// Root sources are processed in order. Includes are merged depth-first in
/// declaration order, before the properties of the including source. The
/// loader is the only way the builder reaches other sources.
pub fn build(sources: &[Source], loader: &dyn SourceLoader) -> Result<PropertyGraph, BuildError> {
    let mut builder = GraphBuilder {
        loader,
        graph: PropertyGraph::new(),
        stack: Vec::new(),
        merged: HashSet::new(),
    };

    for source in sources {
        builder.merge(source, Inherited::default())?;
    }

    tracing::info!(
        sources = builder.merged.len(),
        properties = builder.graph.len(),
        "property graph built"
    );
    Ok(builder.graph)
}

/// Include flags that apply to everything below an include directive.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    overrides: bool,
    hidden: bool,
}

/// Relation from an including source to an included one.
struct IncludeEdge<'a> {
    from: &'a SourceId,
    to: &'a SourceId,
}

impl fmt::Display for IncludeEdge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

struct GraphBuilder<'l> {
    loader: &'l dyn SourceLoader,
    graph: PropertyGraph,
    /// Sources currently being merged, outermost first
    stack: Vec<SourceId>,
    /// Sources that have been fully merged
    merged: HashSet<SourceId>,
}

impl GraphBuilder<'_> {
    fn merge(&mut self, source: &Source, inherited: Inherited) -> Result<(), BuildError> {
        if let Some(pos) = self.stack.iter().position(|id| *id == source.id) {
            let mut path: Vec<String> = self.stack[pos..].iter().map(|id| id.to_string()).collect();
            path.push(source.id.to_string());
            return Err(BuildError::IncludeCycle { path });
        }
        if self.merged.contains(&source.id) {
            tracing::debug!(source = %source.id, "source already merged, skipping");
            return Ok(());
        }

        self.stack.push(source.id.clone());

        for include in source.document.includes.iter().filter(|i| !i.ignore) {
            // The root is at depth zero, so the stack length is the depth of
            // the source being included.
            if self.stack.len() > MAX_INCLUDE_DEPTH {
                return Err(BuildError::IncludeTooDeep {
                    reference: include.path.clone(),
                    limit: MAX_INCLUDE_DEPTH,
                });
            }

            let text = self
                .loader
                .load(&include.path, Some(&source.id))
                .map_err(|error| BuildError::UnresolvedInclude {
                    reference: include.path.clone(),
                    included_from: source.id.to_string(),
                    error,
                })?;
            let source_id = text.id.to_string();
            let included =
                Source::parse(text).map_err(|error| BuildError::InvalidSource { source_id, error })?;

            let edge = IncludeEdge {
                from: &source.id,
                to: &included.id,
            };
            tracing::debug!(
                edge = %edge,
                overrides = include.overrides,
                hidden = include.hidden,
                "include"
            );

            self.merge(
                &included,
                Inherited {
                    overrides: inherited.overrides || include.overrides,
                    hidden: inherited.hidden || include.hidden,
                },
            )?;
        }

        for (index, spec) in source.document.properties.iter().enumerate() {
            if spec.ignore {
                tracing::debug!(name = %spec.name, source = %source.id, "property ignored");
                continue;
            }

            let origin = Origin {
                source: source.id.clone(),
                index,
            };
            let mut property =
                Property::from_spec(spec, origin).map_err(|error| BuildError::InvalidSource {
                    source_id: source.id.to_string(),
                    error,
                })?;
            property.hidden |= inherited.hidden;

            self.graph
                .insert(property, spec.overrides || inherited.overrides)?;
        }

        self.stack.pop();
        self.merged.insert(source.id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confluent_spec::{MemorySourceLoader, Value, ValueExpr};
    use pretty_assertions::assert_eq;

    fn names(graph: &PropertyGraph) -> Vec<&str> {
        graph.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_included_properties_come_first() {
        let loader = MemorySourceLoader::new()
            .with_source(
                "root.yaml",
                "includes:\n  - path: inc.yaml\nproperties:\n  - { type: int, name: own, value: 1 }\n",
            )
            .with_source(
                "inc.yaml",
                "properties:\n  - { type: int, name: included, value: 2 }\n",
            );
        let root = loader.read_root("root.yaml").unwrap();

        let graph = build(&[root], &loader).unwrap();
        assert_eq!(names(&graph), vec!["included", "own"]);
        assert_eq!(graph.get("included").unwrap().origin.source.as_str(), "inc.yaml");
    }

    #[test]
    fn test_ignored_entries_are_skipped() {
        let loader = MemorySourceLoader::new().with_source(
            "root.yaml",
            "includes:\n  - { path: nowhere.yaml, ignore: true }\nproperties:\n  - { type: int, name: a, value: 1, ignore: true }\n  - { type: int, name: b, value: 2 }\n",
        );
        let root = loader.read_root("root.yaml").unwrap();

        let graph = build(&[root], &loader).unwrap();
        assert_eq!(names(&graph), vec!["b"]);
    }

    #[test]
    fn test_include_flags_propagate() {
        let loader = MemorySourceLoader::new()
            .with_source(
                "root.yaml",
                "properties:\n  - { type: int, name: a, value: 1 }\nincludes:\n  - { path: inc.yaml, override: true, hidden: true }\n",
            )
            .with_source("inc.yaml", "includes:\n  - path: deep.yaml\n")
            .with_source("deep.yaml", "properties:\n  - { type: int, name: a, value: 9 }\n");
        let root = loader.read_root("root.yaml").unwrap();

        // The include is merged before `a` is declared in the root, so the
        // root's own `a` is the duplicate and is not marked override.
        let err = build(&[root], &loader).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateProperty { .. }));

        let loader = loader.with_source(
            "root.yaml",
            "includes:\n  - { path: inc.yaml, hidden: true }\nproperties:\n  - { type: int, name: a, value: 1, override: true }\n",
        );
        let root = loader.read_root("root.yaml").unwrap();
        let graph = build(&[root], &loader).unwrap();
        let a = graph.get("a").unwrap();
        assert_eq!(a.value, ValueExpr::Literal(Value::Integer(1)));
        assert!(!a.hidden);
    }

    #[test]
    fn test_hidden_include() {
        let loader = MemorySourceLoader::new()
            .with_source("root.yaml", "includes:\n  - { path: inc.yaml, hidden: true }\n")
            .with_source("inc.yaml", "properties:\n  - { type: int, name: a, value: 1 }\n");
        let root = loader.read_root("root.yaml").unwrap();
        let graph = build(&[root], &loader).unwrap();
        assert!(graph.get("a").unwrap().hidden);
    }

    #[test]
    fn test_include_cycle() {
        let loader = MemorySourceLoader::new()
            .with_source("a.yaml", "includes:\n  - path: b.yaml\n")
            .with_source("b.yaml", "includes:\n  - path: a.yaml\n");
        let root = loader.read_root("a.yaml").unwrap();

        let err = build(&[root], &loader).unwrap_err();
        match err {
            BuildError::IncludeCycle { path } => {
                assert_eq!(path, vec!["a.yaml", "b.yaml", "a.yaml"])
            }
            other => panic!("expected include cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_diamond_include_merged_once() {
        let loader = MemorySourceLoader::new()
            .with_source(
                "root.yaml",
                "includes:\n  - path: left.yaml\n  - path: right.yaml\n",
            )
            .with_source("left.yaml", "includes:\n  - path: shared.yaml\n")
            .with_source("right.yaml", "includes:\n  - path: shared.yaml\n")
            .with_source("shared.yaml", "properties:\n  - { type: int, name: shared, value: 1 }\n");
        let root = loader.read_root("root.yaml").unwrap();

        let graph = build(&[root], &loader).unwrap();
        assert_eq!(names(&graph), vec!["shared"]);
    }

    #[test]
    fn test_include_depth_is_bounded() {
        let mut loader = MemorySourceLoader::new();
        for i in 0..=MAX_INCLUDE_DEPTH + 1 {
            loader.insert(format!("s{i}.yaml"), format!("includes:\n  - path: s{}.yaml\n", i + 1));
        }
        loader.insert(format!("s{}.yaml", MAX_INCLUDE_DEPTH + 2), "properties: []\n");
        let root = loader.read_root("s0.yaml").unwrap();

        let err = build(&[root], &loader).unwrap_err();
        assert!(matches!(err, BuildError::IncludeTooDeep { limit: MAX_INCLUDE_DEPTH, .. }));
    }

    #[test]
    fn test_missing_include() {
        let loader = MemorySourceLoader::new()
            .with_source("root.yaml", "includes:\n  - path: missing.yaml\n");
        let root = loader.read_root("root.yaml").unwrap();

        let err = build(&[root], &loader).unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnresolvedInclude { ref reference, .. } if reference == "missing.yaml"
        ));
    }

    #[test]
    fn test_invalid_name_reports_source() {
        let loader = MemorySourceLoader::new()
            .with_source("root.yaml", "properties:\n  - { type: int, name: 1st, value: 1 }\n");
        let root = loader.read_root("root.yaml").unwrap();

        let err = build(&[root], &loader).unwrap_err();
        assert_eq!(err.to_string(), "'1st' is not a valid property name (in root.yaml)");
    }
}
