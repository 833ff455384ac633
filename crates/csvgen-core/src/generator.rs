//! The CSV generator.
//!
//! A [`Generator`] owns a record collection, the schema discovered from its
//! first record, and the rules registered against that schema. Rules are
//! validated when registered so that rendering only fails on data drift.

use std::collections::HashMap;
use std::io::Write;

use csvgen_model::{
    CsvGenError, FieldRule, Result, Schema, TypeRule, ValueKind, validate_pattern,
};
use tracing::{debug, info_span, warn};

use crate::options::GeneratorOptions;
use crate::record::Record;
use crate::render::Renderer;

/// Builds CSV text from a collection of same-typed records.
///
/// # Example
///
/// ```
/// use csvgen_core::{DynamicRecord, Generator};
/// use csvgen_model::{FieldRule, ValueKind};
///
/// let records = vec![
///     DynamicRecord::new()
///         .with("Isbn", ValueKind::Text, "234523452345")
///         .with("PageCount", ValueKind::Integer, 500_i64),
/// ];
///
/// let mut generator = Generator::new();
/// generator.load(records)?;
/// generator.register_field_rule(FieldRule::renamed("PageCount", "Pages")?)?;
///
/// let csv = generator.generate()?;
/// assert_eq!(csv, "\"Isbn\",\"Pages\",\n\"234523452345\",\"500\",\n");
/// # Ok::<(), csvgen_model::CsvGenError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator<R> {
    records: Vec<R>,
    schema: Option<Schema>,
    field_rules: HashMap<String, FieldRule>,
    type_rules: HashMap<ValueKind, TypeRule>,
    options: GeneratorOptions,
}

impl<R: Record> Default for Generator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Generator<R> {
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            records: Vec::new(),
            schema: None,
            field_rules: HashMap::new(),
            type_rules: HashMap::new(),
            options,
        }
    }

    /// Loads records and discovers the schema from the first one.
    ///
    /// Fails with [`CsvGenError::EmptyCollection`] or [`CsvGenError::NoFields`]
    /// without touching the current state. On success, rules that no longer
    /// fit the new schema are dropped.
    pub fn load(&mut self, records: impl IntoIterator<Item = R>) -> Result<()> {
        let records: Vec<R> = records.into_iter().collect();
        let first = records.first().ok_or(CsvGenError::EmptyCollection)?;
        let schema = Schema::from_descriptors(first.fields());
        if schema.is_empty() {
            return Err(CsvGenError::NoFields);
        }
        debug!(
            records = records.len(),
            fields = schema.len(),
            "loaded record collection"
        );

        self.prune_rules(&schema);
        self.records = records;
        self.schema = Some(schema);
        Ok(())
    }

    /// Registers a field rule, replacing any rule for the same field.
    ///
    /// Fails with [`CsvGenError::UnknownField`] if the field is not in the
    /// loaded schema, or a pattern error if the pattern does not fit the
    /// field's kind. A rejected rule leaves the registered rules unchanged.
    pub fn register_field_rule(&mut self, rule: FieldRule) -> Result<()> {
        let field = self
            .schema
            .as_ref()
            .and_then(|schema| schema.field(rule.name()))
            .ok_or_else(|| CsvGenError::UnknownField {
                field: rule.name().to_string(),
            })?;
        rule.validate_for(field.kind)?;

        debug!(field = rule.name(), visible = rule.is_visible(), "registered field rule");
        self.field_rules.insert(rule.name().to_string(), rule);
        Ok(())
    }

    /// Registers a type rule, replacing any rule for the same kind.
    ///
    /// Fails with [`CsvGenError::UnknownKind`] if no loaded field has the kind.
    pub fn register_type_rule(&mut self, rule: TypeRule) -> Result<()> {
        let kind = rule.kind();
        let present = self
            .schema
            .as_ref()
            .is_some_and(|schema| schema.contains_kind(kind));
        if !present {
            return Err(CsvGenError::UnknownKind { kind });
        }

        debug!(%kind, visible = rule.is_visible(), "registered type rule");
        self.type_rules.insert(kind, rule);
        Ok(())
    }

    /// Renders the loaded records.
    ///
    /// Fails with [`CsvGenError::NotReady`] until [`Generator::load`] succeeds.
    pub fn generate(&self) -> Result<String> {
        let schema = self.schema.as_ref().ok_or(CsvGenError::NotReady)?;
        let span = info_span!("generate", records = self.records.len());
        let _guard = span.enter();
        self.renderer(schema).render(&self.records)
    }

    /// Renders the loaded records and writes the text to `writer`.
    ///
    /// Nothing is written if rendering fails.
    pub fn generate_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let text = self.generate()?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Header labels of the visible columns, in output order.
    pub fn header_labels(&self) -> Result<Vec<String>> {
        let schema = self.schema.as_ref().ok_or(CsvGenError::NotReady)?;
        let columns = self.renderer(schema).columns()?;
        Ok(columns.iter().map(|c| c.label.to_string()).collect())
    }

    /// Drops every registered rule.
    pub fn clear_rules(&mut self) {
        self.field_rules.clear();
        self.type_rules.clear();
    }

    pub fn is_ready(&self) -> bool {
        self.schema.is_some()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn field_rules(&self) -> &HashMap<String, FieldRule> {
        &self.field_rules
    }

    pub fn type_rules(&self) -> &HashMap<ValueKind, TypeRule> {
        &self.type_rules
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn renderer<'a>(&'a self, schema: &'a Schema) -> Renderer<'a> {
        Renderer::new(schema, &self.field_rules, &self.type_rules, &self.options)
    }

    fn prune_rules(&mut self, schema: &Schema) {
        self.field_rules.retain(|name, rule| {
            let keep = schema
                .field(name)
                .is_some_and(|field| validate_pattern(field.kind, rule.pattern()).is_ok());
            if !keep {
                warn!(field = %name, "dropping field rule that no longer fits the schema");
            }
            keep
        });
        self.type_rules.retain(|kind, _| {
            let keep = schema.contains_kind(*kind);
            if !keep {
                warn!(%kind, "dropping type rule for a kind no longer in the schema");
            }
            keep
        });
    }
}
