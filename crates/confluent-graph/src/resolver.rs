use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use confluent_spec::{LiteralKind, Origin, Part, Property, Value, ValueExpr};

use crate::cycle_detect;
use crate::dep_graph::ReferenceGraph;
use crate::error::ResolveError;
use crate::expr::{self, Domain, ExprError, Operand, Piece};
use crate::graph::PropertyGraph;

/// A property whose value has been fully evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperty {
    pub name: String,
    pub kind: LiteralKind,
    pub value: Value,
    pub comment: Option<String>,
    pub hidden: bool,
    pub origin: Origin,
}

/// Immutable result of resolution, in declaration order of the merged graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPropertySet {
    properties: IndexMap<String, ResolvedProperty>,
}

impl ResolvedPropertySet {
    pub fn get(&self, name: &str) -> Option<&ResolvedProperty> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.properties.values()
    }

    /// Properties that are emitted, i.e. not hidden.
    pub fn visible(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.iter().filter(|p| !p.hidden)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<ResolvedProperty> for ResolvedPropertySet {
    fn from_iter<T: IntoIterator<Item = ResolvedProperty>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }
}

/// Evaluate every property of `graph`.
///
/// Fails on references to unknown properties and on reference cycles before
/// anything is evaluated. Properties are then evaluated dependencies first,
/// so each reference is replaced by an already resolved value.
pub fn resolve(graph: &PropertyGraph) -> Result<ResolvedPropertySet, ResolveError> {
    for property in graph.iter() {
        if let Some(reference) = property.value.references().find(|r| !graph.contains(r)) {
            return Err(ResolveError::UnresolvedReference {
                property: property.name.clone(),
                reference: reference.to_string(),
            });
        }
    }

    let deps = ReferenceGraph::from_properties(graph);
    if let Some(cycle) = cycle_detect::find_cycle(&deps) {
        return Err(ResolveError::CyclicReference { cycle });
    }
    let order = deps.topological_order().ok_or_else(|| ResolveError::CyclicReference {
        cycle: Vec::new(),
    })?;

    let mut values: HashMap<&str, Value> = HashMap::with_capacity(graph.len());
    for name in order {
        let Some(property) = graph.get(name) else {
            continue;
        };
        let value = evaluate(property, &values)?;
        tracing::trace!(name, value = %value.canonical_text(), "resolved property");
        values.insert(property.name.as_str(), value);
    }

    let resolved: ResolvedPropertySet = graph
        .iter()
        .filter_map(|property| {
            values.remove(property.name.as_str()).map(|value| ResolvedProperty {
                name: property.name.clone(),
                kind: property.kind,
                value,
                comment: property.comment.clone(),
                hidden: property.hidden,
                origin: property.origin.clone(),
            })
        })
        .collect();

    tracing::info!(properties = resolved.len(), "properties resolved");
    Ok(resolved)
}

fn evaluate(property: &Property, values: &HashMap<&str, Value>) -> Result<Value, ResolveError> {
    let parts = match &property.value {
        ValueExpr::Literal(value) => return Ok(value.clone()),
        ValueExpr::Composite(parts) => parts,
    };

    let lookup = |name: &str| {
        values
            .get(name)
            .ok_or_else(|| ResolveError::UnresolvedReference {
                property: property.name.clone(),
                reference: name.to_string(),
            })
    };

    match property.kind {
        LiteralKind::String | LiteralKind::Regex => {
            let mut text = String::new();
            for part in parts {
                match part {
                    Part::Text(fragment) => text.push_str(fragment),
                    Part::Reference(name) => text.push_str(&lookup(name)?.canonical_text()),
                }
            }
            Ok(Value::String(text))
        }
        LiteralKind::Boolean => {
            if let [Part::Reference(name)] = parts.as_slice() {
                if let Some(b) = lookup(name)?.as_bool() {
                    return Ok(Value::Boolean(b));
                }
            }
            let mut text = String::new();
            for part in parts {
                match part {
                    Part::Text(fragment) => text.push_str(fragment),
                    Part::Reference(name) => text.push_str(&lookup(name)?.canonical_text()),
                }
            }
            LiteralKind::Boolean
                .parse_text(&text)
                .map_err(|e| ResolveError::TypeMismatch {
                    property: property.name.clone(),
                    message: e.to_string(),
                })
        }
        kind @ (LiteralKind::Integer | LiteralKind::Float | LiteralKind::Double) => {
            let mut pieces = Vec::with_capacity(parts.len());
            for part in parts {
                match part {
                    Part::Text(fragment) => pieces.push(Piece::Text(fragment)),
                    Part::Reference(name) => {
                        let operand = match lookup(name)? {
                            Value::Integer(i) => Operand::Int(*i),
                            Value::Float(f) => Operand::Real(f64::from(*f)),
                            Value::Double(d) => Operand::Real(*d),
                            other => {
                                return Err(ResolveError::TypeMismatch {
                                    property: property.name.clone(),
                                    message: format!(
                                        "'{name}' is a {} and cannot be used in a numeric expression",
                                        other.kind_name()
                                    ),
                                })
                            }
                        };
                        pieces.push(Piece::Operand(operand));
                    }
                }
            }

            let domain = if kind == LiteralKind::Integer {
                Domain::Integer
            } else {
                Domain::Real
            };
            let result = expr::evaluate(&pieces, domain).map_err(|e| match e {
                ExprError::NotInteger(_) => ResolveError::TypeMismatch {
                    property: property.name.clone(),
                    message: format!("{e} but the property is declared as {kind}"),
                },
                other => ResolveError::InvalidExpression {
                    property: property.name.clone(),
                    message: other.to_string(),
                },
            })?;

            match result {
                Operand::Int(i) => Ok(Value::Integer(i)),
                Operand::Real(r) => {
                    kind.from_f64(r, &r.to_string())
                        .map_err(|e| ResolveError::InvalidExpression {
                            property: property.name.clone(),
                            message: e.to_string(),
                        })
                }
            }
        }
    }
}
