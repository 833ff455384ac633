//! JSON job files.
//!
//! A job file declares the record schema, the rules, the layout options, and
//! the records themselves:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "Isbn", "kind": "text" },
//!     { "name": "Price", "kind": "decimal", "optional": true }
//!   ],
//!   "field_rules": [{ "field": "Isbn", "visible": false }],
//!   "type_rules": [{ "kind": "decimal", "pattern": "C", "context": "en-GB" }],
//!   "options": { "line_terminator": "crlf" },
//!   "records": [{ "Isbn": "234523452345", "Price": "12.32" }]
//! }
//! ```
//!
//! Record values are decoded into the declared kind of their field. Missing
//! keys and `null` become absent values.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csvgen_core::{DynamicRecord, Generator, GeneratorOptions};
use csvgen_model::{
    CsvGenError, FieldDescriptor, FieldRule, FormatContext, TypeRule, Value, ValueKind,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors raised while reading a job file or building its generator.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to read job file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid job file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {record}: field '{field}' expects {kind}, got {found}")]
    InvalidValue {
        record: usize,
        field: String,
        kind: ValueKind,
        found: String,
    },

    #[error(transparent)]
    Generator(#[from] CsvGenError),
}

pub type Result<T> = std::result::Result<T, JobError>;

/// Parsed job file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub field_rules: Vec<FieldRuleConfig>,
    #[serde(default)]
    pub type_rules: Vec<TypeRuleConfig>,
    #[serde(default)]
    pub options: GeneratorOptions,
    pub records: Vec<Map<String, Json>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRuleConfig {
    pub field: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub context: Option<ContextConfig>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeRuleConfig {
    pub kind: ValueKind,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub context: Option<ContextConfig>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

/// A preset name (`"de-DE"`) or a full context object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContextConfig {
    Preset(String),
    Custom(FormatContext),
}

fn visible_by_default() -> bool {
    true
}

impl ContextConfig {
    pub fn resolve(&self) -> Result<FormatContext> {
        match self {
            ContextConfig::Preset(name) => Ok(FormatContext::by_name(name)?),
            ContextConfig::Custom(context) => Ok(context.clone()),
        }
    }
}

fn resolve_context(context: Option<&ContextConfig>) -> Result<Option<FormatContext>> {
    context.map(ContextConfig::resolve).transpose()
}

impl FieldRuleConfig {
    pub fn to_rule(&self) -> Result<FieldRule> {
        Ok(FieldRule::new(
            self.field.as_str(),
            self.display_name.clone(),
            self.pattern.clone(),
            resolve_context(self.context.as_ref())?,
            self.visible,
        )?)
    }
}

impl TypeRuleConfig {
    pub fn to_rule(&self) -> Result<TypeRule> {
        Ok(TypeRule::new(
            self.kind,
            self.pattern.clone(),
            resolve_context(self.context.as_ref())?,
            self.visible,
        )?)
    }
}

impl JobConfig {
    /// Reads and parses a job file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| JobError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| JobError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Decodes every record against the declared fields.
    pub fn records(&self) -> Result<Vec<DynamicRecord>> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, raw)| self.decode_record(index, raw))
            .collect()
    }

    /// Loads the records into a generator and registers every rule.
    ///
    /// Rules are registered in file order, so a later rule for the same
    /// field or kind replaces an earlier one.
    pub fn build_generator(&self, options: GeneratorOptions) -> Result<Generator<DynamicRecord>> {
        let mut generator = Generator::with_options(options);
        generator.load(self.records()?)?;
        for rule in &self.type_rules {
            generator.register_type_rule(rule.to_rule()?)?;
        }
        for rule in &self.field_rules {
            generator.register_field_rule(rule.to_rule()?)?;
        }
        debug!(
            field_rules = generator.field_rules().len(),
            type_rules = generator.type_rules().len(),
            "built generator from job"
        );
        Ok(generator)
    }

    fn decode_record(&self, index: usize, raw: &Map<String, Json>) -> Result<DynamicRecord> {
        for key in raw.keys() {
            if !self.fields.iter().any(|field| &field.name == key) {
                warn!(record = index, field = %key, "ignoring undeclared field");
            }
        }

        let mut record = DynamicRecord::new();
        for field in &self.fields {
            let value = match raw.get(&field.name) {
                None | Some(Json::Null) => None,
                Some(json) => Some(decode_value(field.kind, json).ok_or_else(|| {
                    JobError::InvalidValue {
                        record: index,
                        field: field.name.clone(),
                        kind: field.kind,
                        found: json.to_string(),
                    }
                })?),
            };
            record.push(field.clone(), value);
        }
        Ok(record)
    }
}

/// Decodes a JSON value into `kind`, or `None` if it does not fit.
pub fn decode_value(kind: ValueKind, json: &Json) -> Option<Value> {
    match (kind, json) {
        (ValueKind::Text, Json::String(s)) => Some(Value::Text(s.clone())),
        (ValueKind::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (ValueKind::Integer, Json::String(s)) => s.trim().parse().ok().map(Value::Integer),
        (ValueKind::Decimal, Json::Number(n)) => parse_decimal(&n.to_string()),
        (ValueKind::Decimal, Json::String(s)) => parse_decimal(s.trim()),
        (ValueKind::Boolean, Json::Bool(b)) => Some(Value::Boolean(*b)),
        (ValueKind::Boolean, Json::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Boolean(true)),
            "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        (ValueKind::DateTime, Json::String(s)) => parse_datetime(s.trim()).map(Value::DateTime),
        (ValueKind::Identifier, Json::String(s)) => {
            Uuid::parse_str(s.trim()).ok().map(Value::Identifier)
        }
        (ValueKind::Other, Json::String(s)) => Some(Value::Other(s.clone())),
        (ValueKind::Other, other) => Some(Value::other(other)),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Value> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .map(Value::Decimal)
}

/// Accepts RFC 3339, `T`- or space-separated local date-times, and plain dates.
///
/// Offsets are dropped after conversion; the local wall-clock time is kept.
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(
            decode_value(ValueKind::Integer, &json!(500)),
            Some(Value::Integer(500))
        );
        assert_eq!(
            decode_value(ValueKind::Integer, &json!(" 12 ")),
            Some(Value::Integer(12))
        );
        assert_eq!(
            decode_value(ValueKind::Boolean, &json!("TRUE")),
            Some(Value::Boolean(true))
        );
        assert_eq!(decode_value(ValueKind::Integer, &json!(1.5)), None);
        assert_eq!(decode_value(ValueKind::Text, &json!(3)), None);
    }

    #[test]
    fn test_decode_decimal_keeps_scale() {
        assert_eq!(
            decode_value(ValueKind::Decimal, &json!("52.20")),
            Some(Value::Decimal(Decimal::new(5220, 2)))
        );
        assert_eq!(
            decode_value(ValueKind::Decimal, &json!(12.32)),
            Some(Value::Decimal(Decimal::new(1232, 2)))
        );
        assert_eq!(
            decode_value(ValueKind::Decimal, &json!("1.5e3")),
            Some(Value::Decimal(Decimal::new(1500, 0)))
        );
    }

    #[test]
    fn test_decode_datetime_layouts() {
        let midnight = NaiveDate::from_ymd_opt(2014, 12, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for text in [
            "2014-12-01",
            "2014-12-01T00:00:00",
            "2014-12-01 00:00:00",
            "2014-12-01T00:00",
            "2014-12-01T00:00:00+02:00",
        ] {
            assert_eq!(parse_datetime(text), Some(midnight), "{text}");
        }
        assert_eq!(parse_datetime("01/12/2014"), None);
    }

    #[test]
    fn test_decode_identifier_and_other() {
        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            decode_value(ValueKind::Identifier, &json!(id)),
            Some(Value::Identifier(Uuid::parse_str(id).unwrap()))
        );
        assert_eq!(
            decode_value(ValueKind::Other, &json!([1, 2])),
            Some(Value::Other("[1,2]".to_string()))
        );
    }

    #[test]
    fn test_context_config_forms() {
        let preset: ContextConfig = serde_json::from_value(json!("de-DE")).unwrap();
        assert_eq!(preset.resolve().unwrap(), FormatContext::de_de());

        let custom: ContextConfig =
            serde_json::from_value(json!({ "name": "pipes", "decimal_separator": "|" })).unwrap();
        let resolved = custom.resolve().unwrap();
        assert_eq!(resolved.decimal_separator, "|");
        assert_eq!(resolved.group_separator, ",");

        let unknown: ContextConfig = serde_json::from_value(json!("xx-XX")).unwrap();
        assert!(matches!(
            unknown.resolve(),
            Err(JobError::Generator(CsvGenError::UnknownContext { .. }))
        ));
    }
}
