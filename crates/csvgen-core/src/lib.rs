//! Rule-driven CSV generation.
//!
//! This crate turns a homogeneous collection of records into quoted,
//! comma-separated text:
//!
//! - **Introspection**: [`Record`] describes a record's fields once, on load
//! - **Rules**: field and type rules validated against the discovered schema
//! - **Rendering**: [`Renderer`] resolves visible columns, then emits rows
//! - **Formatting**: per-kind conversion with patterns and format contexts
//!
//! # Example
//!
//! ```
//! use csvgen_core::{DynamicRecord, Generator};
//! use csvgen_model::{FieldRule, TypeRule, ValueKind};
//! use rust_decimal::Decimal;
//!
//! let records = vec![
//!     DynamicRecord::new()
//!         .with("Isbn", ValueKind::Text, "234523452345")
//!         .with("Price", ValueKind::Decimal, Decimal::new(1232, 2)),
//! ];
//!
//! let mut generator = Generator::new();
//! generator.load(records)?;
//! generator.register_type_rule(TypeRule::formatted(ValueKind::Decimal, "C")?)?;
//! generator.register_field_rule(FieldRule::hidden("Isbn")?)?;
//!
//! assert_eq!(generator.generate()?, "\"Price\",\n\"$12.32\",\n");
//! # Ok::<(), csvgen_model::CsvGenError>(())
//! ```

pub mod format;
mod generator;
mod options;
mod record;
pub mod render;

pub use format::{FormatError, format_value};
pub use generator::Generator;
pub use options::{GeneratorOptions, LineTerminator};
pub use record::{DynamicRecord, Record};
pub use render::{Column, Renderer, render};
