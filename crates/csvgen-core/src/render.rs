//! CSV rendering.
//!
//! Rendering is a pure function of the schema, the two rule maps, the layout
//! options, and the records. Columns are resolved once, before any record is
//! read:
//!
//! - visibility: field rule > type rule > visible
//! - label: field rule display name > field name
//! - format: field rule > type rule > default conversion (whole-rule precedence)
//!
//! Every cell, header cells included, is wrapped in double quotes with
//! embedded quotes doubled. Absent values render as `""` without consulting
//! any rule.

use std::collections::HashMap;

use csvgen_model::{
    CsvGenError, FieldDescriptor, FieldRule, FormatContext, FormatPattern, Result, Schema,
    TypeRule, ValueKind,
};
use tracing::{debug, trace};

use crate::format::format_value;
use crate::options::GeneratorOptions;
use crate::record::Record;

/// A visible column with its header label and resolved format.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    pub field: &'a FieldDescriptor,
    pub label: &'a str,
    pub pattern: Option<FormatPattern>,
    pub context: Option<&'a FormatContext>,
}

/// Renders records against a schema and a set of rules.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    schema: &'a Schema,
    field_rules: &'a HashMap<String, FieldRule>,
    type_rules: &'a HashMap<ValueKind, TypeRule>,
    options: &'a GeneratorOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(
        schema: &'a Schema,
        field_rules: &'a HashMap<String, FieldRule>,
        type_rules: &'a HashMap<ValueKind, TypeRule>,
        options: &'a GeneratorOptions,
    ) -> Self {
        Self {
            schema,
            field_rules,
            type_rules,
            options,
        }
    }

    /// Resolves the visible columns in schema order.
    ///
    /// Fails with [`CsvGenError::IncompatiblePattern`] if a resolved rule
    /// carries a pattern the column's kind cannot use.
    pub fn columns(&self) -> Result<Vec<Column<'a>>> {
        let mut columns = Vec::new();
        for field in self.schema {
            let field_rule = self.field_rules.get(&field.name);
            let type_rule = self.type_rules.get(&field.kind);

            let visible = match (field_rule, type_rule) {
                (Some(rule), _) => rule.is_visible(),
                (None, Some(rule)) => rule.is_visible(),
                (None, None) => true,
            };
            if !visible {
                trace!(field = %field.name, "column suppressed");
                continue;
            }

            let label = field_rule
                .and_then(FieldRule::display_name)
                .unwrap_or(&field.name);

            let (raw_pattern, context) = match (field_rule, type_rule) {
                (Some(rule), _) => (rule.pattern(), rule.context()),
                (None, Some(rule)) => (rule.pattern(), rule.context()),
                (None, None) => (None, None),
            };
            let pattern = raw_pattern
                .map(|raw| compile_pattern(field, raw))
                .transpose()?;

            columns.push(Column {
                field,
                label,
                pattern,
                context,
            });
        }
        Ok(columns)
    }

    /// Renders the header and one row per record.
    ///
    /// Returns an empty string for an empty record slice.
    pub fn render<R: Record>(&self, records: &[R]) -> Result<String> {
        let columns = self.columns()?;
        debug!(
            columns = columns.len(),
            records = records.len(),
            "rendering CSV"
        );

        let mut out = String::new();
        if records.is_empty() {
            return Ok(out);
        }

        self.write_header(&columns, &mut out);
        for (index, record) in records.iter().enumerate() {
            self.write_row(index, record, &columns, &mut out)?;
        }
        Ok(out)
    }

    fn write_header(&self, columns: &[Column<'_>], out: &mut String) {
        for (position, column) in columns.iter().enumerate() {
            push_quoted(out, column.label);
            self.push_separator(out, position + 1 == columns.len());
        }
        out.push_str(self.options.line_terminator.as_str());
    }

    fn write_row<R: Record>(
        &self,
        index: usize,
        record: &R,
        columns: &[Column<'_>],
        out: &mut String,
    ) -> Result<()> {
        for (position, column) in columns.iter().enumerate() {
            let field = column.field;
            match record.value(&field.name) {
                None => push_quoted(out, ""),
                Some(value) => {
                    if value.kind() != field.kind {
                        return Err(CsvGenError::KindMismatch {
                            record: index,
                            field: field.name.clone(),
                            expected: field.kind,
                            found: value.kind(),
                        });
                    }
                    let text = format_value(&value, column.pattern.as_ref(), column.context)
                        .map_err(|err| CsvGenError::Format {
                            record: index,
                            field: field.name.clone(),
                            reason: err.to_string(),
                        })?;
                    push_quoted(out, &text);
                }
            }
            self.push_separator(out, position + 1 == columns.len());
        }
        out.push_str(self.options.line_terminator.as_str());
        Ok(())
    }

    fn push_separator(&self, out: &mut String, last: bool) {
        if !last || self.options.trailing_separator {
            out.push(',');
        }
    }
}

/// Renders `records` in one call. See [`Renderer`].
pub fn render<R: Record>(
    records: &[R],
    field_rules: &HashMap<String, FieldRule>,
    type_rules: &HashMap<ValueKind, TypeRule>,
    schema: &Schema,
    options: &GeneratorOptions,
) -> Result<String> {
    Renderer::new(schema, field_rules, type_rules, options).render(records)
}

fn compile_pattern(field: &FieldDescriptor, raw: &str) -> Result<FormatPattern> {
    FormatPattern::parse(field.kind, raw).map_err(|err| CsvGenError::IncompatiblePattern {
        field: field.name.clone(),
        kind: field.kind,
        pattern: raw.to_string(),
        reason: err.to_string(),
    })
}

/// Appends `text` wrapped in double quotes, doubling embedded quotes.
fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LineTerminator;
    use crate::record::DynamicRecord;
    use csvgen_model::Value;
    use rust_decimal::Decimal;

    fn schema() -> Schema {
        Schema::from_descriptors([
            FieldDescriptor::required("Name", ValueKind::Text),
            FieldDescriptor::optional("Price", ValueKind::Decimal),
            FieldDescriptor::required("InStock", ValueKind::Boolean),
        ])
    }

    fn record(name: &str, price: Option<Decimal>, in_stock: bool) -> DynamicRecord {
        DynamicRecord::new()
            .with("Name", ValueKind::Text, name)
            .with_optional("Price", ValueKind::Decimal, price.map(Value::from))
            .with("InStock", ValueKind::Boolean, in_stock)
    }

    #[test]
    fn test_push_quoted_doubles_quotes() {
        let mut out = String::new();
        push_quoted(&mut out, "He said \"hi\"");
        assert_eq!(out, "\"He said \"\"hi\"\"\"");
    }

    #[test]
    fn test_renders_without_rules() {
        let schema = schema();
        let records = vec![record("Pen", Some(Decimal::new(150, 2)), true)];
        let csv = render(
            &records,
            &HashMap::new(),
            &HashMap::new(),
            &schema,
            &GeneratorOptions::default(),
        )
        .unwrap();
        assert_eq!(
            csv,
            "\"Name\",\"Price\",\"InStock\",\n\"Pen\",\"1.50\",\"True\",\n"
        );
    }

    #[test]
    fn test_empty_records_render_nothing() {
        let schema = schema();
        let records: Vec<DynamicRecord> = Vec::new();
        let csv = render(
            &records,
            &HashMap::new(),
            &HashMap::new(),
            &schema,
            &GeneratorOptions::default(),
        )
        .unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_layout_options() {
        let schema = schema();
        let records = vec![record("Pen", None, false)];
        let options = GeneratorOptions::new()
            .with_line_terminator(LineTerminator::CrLf)
            .with_trailing_separator(false);
        let csv = render(&records, &HashMap::new(), &HashMap::new(), &schema, &options).unwrap();
        assert_eq!(
            csv,
            "\"Name\",\"Price\",\"InStock\"\r\n\"Pen\",\"\",\"False\"\r\n"
        );
    }

    #[test]
    fn test_header_label_is_escaped() {
        let schema = schema();
        let mut field_rules = HashMap::new();
        field_rules.insert(
            "Name".to_string(),
            FieldRule::renamed("Name", "The \"Name\"").unwrap(),
        );
        let type_rules = HashMap::new();
        let options = GeneratorOptions::default();
        let renderer = Renderer::new(&schema, &field_rules, &type_rules, &options);
        let csv = renderer.render(&[record("Pen", None, true)]).unwrap();
        assert!(csv.starts_with("\"The \"\"Name\"\"\",\"Price\","));
    }

    #[test]
    fn test_stale_pattern_is_a_render_error() {
        let schema = schema();
        let mut field_rules = HashMap::new();
        field_rules.insert(
            "InStock".to_string(),
            FieldRule::formatted("InStock", "N2").unwrap(),
        );
        let err = render(
            &[record("Pen", None, true)],
            &field_rules,
            &HashMap::new(),
            &schema,
            &GeneratorOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CsvGenError::IncompatiblePattern { ref field, kind: ValueKind::Boolean, .. } if field == "InStock"
        ));
        assert_eq!(
            err.to_string(),
            "field 'InStock' of kind boolean cannot be rendered with pattern 'N2': \
             boolean values cannot use a format pattern (got 'N2')"
        );
    }

    #[test]
    fn test_malformed_pattern_keeps_parse_reason() {
        let schema = schema();
        let mut field_rules = HashMap::new();
        field_rules.insert(
            "Price".to_string(),
            FieldRule::formatted("Price", "D2").unwrap(),
        );
        let type_rules = HashMap::new();
        let options = GeneratorOptions::default();
        let renderer = Renderer::new(&schema, &field_rules, &type_rules, &options);

        match renderer.columns().unwrap_err() {
            CsvGenError::IncompatiblePattern { field, reason, .. } => {
                assert_eq!(field, "Price");
                assert!(reason.contains("only applies to integer fields"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_kind_drift_is_a_render_error() {
        let schema = schema();
        let drifted = DynamicRecord::new()
            .with("Name", ValueKind::Text, "Pen")
            .with("Price", ValueKind::Text, "cheap")
            .with("InStock", ValueKind::Boolean, true);
        let err = render(
            &[record("Ink", None, true), drifted],
            &HashMap::new(),
            &HashMap::new(),
            &schema,
            &GeneratorOptions::default(),
        )
        .unwrap_err();
        match err {
            CsvGenError::KindMismatch {
                record,
                field,
                expected,
                found,
            } => {
                assert_eq!(record, 1);
                assert_eq!(field, "Price");
                assert_eq!(expected, ValueKind::Decimal);
                assert_eq!(found, ValueKind::Text);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_columns_resolve_formats_once() {
        let schema = schema();
        let mut type_rules = HashMap::new();
        type_rules.insert(
            ValueKind::Decimal,
            TypeRule::formatted(ValueKind::Decimal, "C").unwrap(),
        );
        type_rules.insert(ValueKind::Boolean, TypeRule::hidden(ValueKind::Boolean));
        let options = GeneratorOptions::default();
        let field_rules = HashMap::new();
        let renderer = Renderer::new(&schema, &field_rules, &type_rules, &options);

        let columns = renderer.columns().unwrap();
        let labels: Vec<&str> = columns.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Name", "Price"]);
        assert!(columns[0].pattern.is_none());
        assert_eq!(
            columns[1].pattern.as_ref().map(ToString::to_string).as_deref(),
            Some("C")
        );
    }
}
