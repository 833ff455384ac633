//! Error types shared by the csvgen crates.

use thiserror::Error;

use crate::value::ValueKind;

/// Broad category of a [`CsvGenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The record collection cannot be used.
    InvalidInput,
    /// A rule does not fit the loaded schema or is malformed.
    Configuration,
    /// An operation was called out of order.
    State,
    /// A value could not be rendered with the rule resolved for it.
    Render,
    /// Writing the generated text failed.
    Io,
}

/// Errors raised while loading records, registering rules, or generating CSV.
#[derive(Debug, Error)]
pub enum CsvGenError {
    // === Input Errors ===
    /// The record collection contained no records.
    #[error("record collection is empty")]
    EmptyCollection,

    /// The first record exposed no fields.
    #[error("record type exposes no fields")]
    NoFields,

    // === Configuration Errors ===
    /// Field rule constructed without a field name.
    #[error("field rule requires a non-empty field name")]
    EmptyFieldName,

    /// Field rule names a field missing from the loaded schema.
    #[error("no field named '{field}' in the loaded schema")]
    UnknownField { field: String },

    /// Type rule names a kind that no loaded field has.
    #[error("no field of kind {kind} in the loaded schema")]
    UnknownKind { kind: ValueKind },

    /// A pattern was given for a kind without a pattern grammar.
    #[error("{kind} values cannot use a format pattern (got '{pattern}')")]
    PatternNotSupported { kind: ValueKind, pattern: String },

    /// The pattern does not parse for the kind it targets.
    #[error("invalid {kind} format pattern '{pattern}': {reason}")]
    InvalidPattern {
        kind: ValueKind,
        pattern: String,
        reason: String,
    },

    /// Named format context is not one of the presets.
    #[error("unknown format context '{name}'")]
    UnknownContext { name: String },

    // === State Errors ===
    /// Generation requested before records were loaded.
    #[error("generator is not ready: load records before generating")]
    NotReady,

    // === Render Errors ===
    /// A record produced a value whose kind differs from the schema.
    #[error("record {record}, field '{field}': expected a {expected} value, found {found}")]
    KindMismatch {
        record: usize,
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A resolved rule carries a pattern the column's kind cannot use.
    #[error("field '{field}' of kind {kind} cannot be rendered with pattern '{pattern}': {reason}")]
    IncompatiblePattern {
        field: String,
        kind: ValueKind,
        pattern: String,
        reason: String,
    },

    /// Applying the resolved format to a value failed.
    #[error("record {record}, field '{field}': {reason}")]
    Format {
        record: usize,
        field: String,
        reason: String,
    },

    // === Output Errors ===
    /// Writing the rendered text failed.
    #[error("failed to write CSV output: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvGenError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsvGenError::EmptyCollection | CsvGenError::NoFields => ErrorKind::InvalidInput,
            CsvGenError::EmptyFieldName
            | CsvGenError::UnknownField { .. }
            | CsvGenError::UnknownKind { .. }
            | CsvGenError::PatternNotSupported { .. }
            | CsvGenError::InvalidPattern { .. }
            | CsvGenError::UnknownContext { .. } => ErrorKind::Configuration,
            CsvGenError::NotReady => ErrorKind::State,
            CsvGenError::KindMismatch { .. }
            | CsvGenError::IncompatiblePattern { .. }
            | CsvGenError::Format { .. } => ErrorKind::Render,
            CsvGenError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type for csvgen operations.
pub type Result<T> = std::result::Result<T, CsvGenError>;
