//! Data model for rule-driven CSV generation.
//!
//! This crate holds the leaf types shared by the generator and its callers:
//!
//! - **Values**: [`ValueKind`] and the tagged [`Value`] sum type
//! - **Schema**: [`FieldDescriptor`] and the ordered [`Schema`]
//! - **Rules**: [`FieldRule`] (by field name) and [`TypeRule`] (by kind)
//! - **Formatting**: [`FormatPattern`] grammars and [`FormatContext`] presets
//! - **Errors**: [`CsvGenError`] grouped by [`ErrorKind`]

pub mod error;
pub mod format;
pub mod rules;
pub mod schema;
pub mod value;

pub use error::{CsvGenError, ErrorKind, Result};
pub use format::{
    CurrencyPlacement, FormatContext, FormatPattern, NumericFormat, NumericStyle,
    validate_pattern,
};
pub use rules::{FieldRule, TypeRule};
pub use schema::{FieldDescriptor, Schema};
pub use value::{Value, ValueKind};
