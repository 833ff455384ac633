//! Record introspection.
//!
//! The generator never inspects record types itself. It asks the first record
//! for its field descriptors once, on load, and afterwards only reads values
//! by field name.

use csvgen_model::{FieldDescriptor, Value, ValueKind};

/// A record that can describe its fields and hand out their values.
///
/// # Example
///
/// ```
/// use csvgen_core::Record;
/// use csvgen_model::{FieldDescriptor, Value, ValueKind};
///
/// struct Book {
///     isbn: String,
///     page_count: i64,
/// }
///
/// impl Record for Book {
///     fn fields(&self) -> Vec<FieldDescriptor> {
///         vec![
///             FieldDescriptor::required("Isbn", ValueKind::Text),
///             FieldDescriptor::required("PageCount", ValueKind::Integer),
///         ]
///     }
///
///     fn value(&self, field: &str) -> Option<Value> {
///         match field {
///             "Isbn" => Some(Value::from(self.isbn.as_str())),
///             "PageCount" => Some(Value::from(self.page_count)),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Field descriptors in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Value of the named field, or `None` when absent.
    fn value(&self, field: &str) -> Option<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn fields(&self) -> Vec<FieldDescriptor> {
        (**self).fields()
    }

    fn value(&self, field: &str) -> Option<Value> {
        (**self).value(field)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn fields(&self) -> Vec<FieldDescriptor> {
        (**self).fields()
    }

    fn value(&self, field: &str) -> Option<Value> {
        (**self).value(field)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DynamicField {
    descriptor: FieldDescriptor,
    value: Option<Value>,
}

/// A record assembled at runtime from named, typed fields.
///
/// Used when the record shape is only known from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    fields: Vec<DynamicField>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field holding `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, kind: ValueKind, value: impl Into<Value>) -> Self {
        self.push(FieldDescriptor::required(name, kind), Some(value.into()));
        self
    }

    /// Adds an optional field that may be absent.
    #[must_use]
    pub fn with_optional(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        value: Option<Value>,
    ) -> Self {
        self.push(FieldDescriptor::optional(name, kind), value);
        self
    }

    /// Appends a field, replacing any earlier field with the same name.
    pub fn push(&mut self, descriptor: FieldDescriptor, value: Option<Value>) {
        match self
            .fields
            .iter_mut()
            .find(|f| f.descriptor.name == descriptor.name)
        {
            Some(existing) => {
                existing.descriptor = descriptor;
                existing.value = value;
            }
            None => self.fields.push(DynamicField { descriptor, value }),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record for DynamicRecord {
    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(|f| f.descriptor.clone()).collect()
    }

    fn value(&self, field: &str) -> Option<Value> {
        self.fields
            .iter()
            .find(|f| f.descriptor.name == field)
            .and_then(|f| f.value.clone())
    }
}
