//! Field descriptors discovered from a record type.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Name, declared kind, and optionality of one record field.
///
/// `kind` is always the underlying kind; an optional decimal is described as
/// `Decimal` with `optional` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: ValueKind,
    #[serde(default)]
    pub optional: bool,
}

impl FieldDescriptor {
    /// Describes a field that always carries a value.
    pub fn required(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
        }
    }

    /// Describes a field whose value may be absent.
    pub fn optional(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: true,
        }
    }
}

/// Ordered list of field descriptors for a loaded record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Builds a schema from descriptors in discovery order.
    ///
    /// A repeated name replaces the earlier descriptor but keeps its position.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        for descriptor in descriptors {
            match fields.iter_mut().find(|f| f.name == descriptor.name) {
                Some(existing) => *existing = descriptor,
                None => fields.push(descriptor),
            }
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the distinct kinds present in the schema.
    pub fn kinds(&self) -> BTreeSet<ValueKind> {
        self.fields.iter().map(|f| f.kind).collect()
    }

    pub fn contains_kind(&self, kind: ValueKind) -> bool {
        self.fields.iter().any(|f| f.kind == kind)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_discovery_order() {
        let schema = Schema::from_descriptors([
            FieldDescriptor::required("Isbn", ValueKind::Text),
            FieldDescriptor::optional("Price", ValueKind::Decimal),
            FieldDescriptor::required("PageCount", ValueKind::Integer),
        ]);
        let names: Vec<&str> = schema.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Isbn", "Price", "PageCount"]);
    }

    #[test]
    fn duplicate_name_replaces_in_place() {
        let schema = Schema::from_descriptors([
            FieldDescriptor::required("A", ValueKind::Text),
            FieldDescriptor::required("B", ValueKind::Text),
            FieldDescriptor::optional("A", ValueKind::Integer),
        ]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.fields()[0], FieldDescriptor::optional("A", ValueKind::Integer));
        assert!(!schema.contains_kind(ValueKind::Boolean));
        assert_eq!(
            schema.kinds().into_iter().collect::<Vec<_>>(),
            vec![ValueKind::Text, ValueKind::Integer]
        );
    }
}
