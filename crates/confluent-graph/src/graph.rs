use indexmap::IndexMap;

use confluent_spec::Property;

use crate::error::BuildError;

/// Merged, name-unique set of properties in declaration order.
///
/// Only the builder mutates a graph; once [`crate::build`] returns it, the
/// graph is read-only input to the resolver.
#[derive(Debug, Clone, Default)]
pub struct PropertyGraph {
    properties: IndexMap<String, Property>,
}

impl PropertyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. A name that is already present is rejected unless
    /// `overrides` is set, in which case the new definition takes the slot
    /// of the old one.
    pub(crate) fn insert(&mut self, property: Property, overrides: bool) -> Result<(), BuildError> {
        match self.properties.get_mut(&property.name) {
            Some(existing) if overrides => {
                tracing::debug!(
                    name = %property.name,
                    replaced = %existing.origin,
                    by = %property.origin,
                    "property overridden"
                );
                *existing = property;
                Ok(())
            }
            Some(existing) => Err(BuildError::DuplicateProperty {
                name: property.name.clone(),
                first: existing.origin.clone(),
                second: property.origin,
            }),
            None => {
                self.properties.insert(property.name.clone(), property);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Position of `name` in declaration order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.get_index_of(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<Property> for PropertyGraph {
    /// Collect properties, later duplicates replacing earlier ones.
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        let mut properties = IndexMap::new();
        for property in iter {
            properties.insert(property.name.clone(), property);
        }
        Self { properties }
    }
}
