//! Output layout options.

use serde::{Deserialize, Serialize};

/// Line terminator written after every row, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Lf,
    CrLf,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
        }
    }
}

/// Options controlling the textual layout of generated CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub line_terminator: LineTerminator,
    /// Emit a separator after the last cell of each row (`"a","b",`).
    pub trailing_separator: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            line_terminator: LineTerminator::Lf,
            trailing_separator: true,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict RFC 4180 layout: CRLF rows, no trailing separator.
    pub fn rfc4180() -> Self {
        Self {
            line_terminator: LineTerminator::CrLf,
            trailing_separator: false,
        }
    }

    #[must_use]
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    #[must_use]
    pub fn with_trailing_separator(mut self, enable: bool) -> Self {
        self.trailing_separator = enable;
        self
    }
}
