//! Format patterns and format contexts.
//!
//! A pattern is a string whose grammar depends on the value kind it targets:
//!
//! - **Numeric** (integer, decimal): one specifier letter with an optional
//!   precision, e.g. `C`, `N0`, `F3`, `P1`, `D6`, `X8`.
//! - **Date/time**: a chrono strftime pattern, e.g. `%Y` or `%d/%m/%Y`.
//!
//! A [`FormatContext`] supplies the locale-like pieces (separators, currency
//! symbol, default date/time layout) a pattern is applied under.

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CsvGenError, Result};
use crate::value::ValueKind;

/// Largest precision a numeric specifier accepts (decimal scale limit).
pub const MAX_PRECISION: u32 = 28;

/// Numeric specifier letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericStyle {
    /// `C`: grouped, with the context's currency symbol.
    Currency,
    /// `D`: integer digits, zero-padded to the precision.
    Digits,
    /// `F`: fixed number of fraction digits, no grouping.
    FixedPoint,
    /// `N`: grouped with fraction digits.
    Number,
    /// `P`: multiplied by 100 with a percent sign.
    Percent,
    /// `X`: hexadecimal, zero-padded to the precision.
    Hex,
}

impl NumericStyle {
    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(NumericStyle::Currency),
            'D' => Some(NumericStyle::Digits),
            'F' => Some(NumericStyle::FixedPoint),
            'N' => Some(NumericStyle::Number),
            'P' => Some(NumericStyle::Percent),
            'X' => Some(NumericStyle::Hex),
            _ => None,
        }
    }

    /// Returns true if the style only applies to integer values.
    pub fn integer_only(&self) -> bool {
        matches!(self, NumericStyle::Digits | NumericStyle::Hex)
    }
}

/// Parsed numeric specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericFormat {
    pub style: NumericStyle,
    pub precision: Option<u32>,
    /// Set when the specifier letter was uppercase (only affects `X`).
    pub uppercase: bool,
}

impl NumericFormat {
    /// Fraction digits to render, falling back to the style's default.
    pub fn fraction_digits(&self) -> u32 {
        match self.style {
            NumericStyle::Digits | NumericStyle::Hex => 0,
            _ => self.precision.unwrap_or(2),
        }
    }
}

/// A pattern validated against the kind it will format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPattern {
    Numeric(NumericFormat),
    /// strftime pattern known to format a `NaiveDateTime` without error.
    DateTime(String),
}

impl FormatPattern {
    /// Parses `raw` for values of `kind`.
    ///
    /// Fails with [`CsvGenError::PatternNotSupported`] for kinds without a
    /// pattern grammar and [`CsvGenError::InvalidPattern`] for malformed input.
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self> {
        match kind {
            ValueKind::Integer | ValueKind::Decimal => parse_numeric(kind, raw),
            ValueKind::DateTime => parse_datetime(raw),
            _ => Err(CsvGenError::PatternNotSupported {
                kind,
                pattern: raw.to_string(),
            }),
        }
    }

    /// Returns true if the pattern can format values of `kind`.
    pub fn applies_to(&self, kind: ValueKind) -> bool {
        match self {
            FormatPattern::Numeric(spec) => match kind {
                ValueKind::Integer => true,
                ValueKind::Decimal => !spec.style.integer_only(),
                _ => false,
            },
            FormatPattern::DateTime(_) => kind == ValueKind::DateTime,
        }
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatPattern::Numeric(spec) => {
                let letter = match spec.style {
                    NumericStyle::Currency => 'C',
                    NumericStyle::Digits => 'D',
                    NumericStyle::FixedPoint => 'F',
                    NumericStyle::Number => 'N',
                    NumericStyle::Percent => 'P',
                    NumericStyle::Hex => 'X',
                };
                if spec.uppercase {
                    write!(f, "{letter}")?;
                } else {
                    write!(f, "{}", letter.to_ascii_lowercase())?;
                }
                match spec.precision {
                    Some(precision) => write!(f, "{precision}"),
                    None => Ok(()),
                }
            }
            FormatPattern::DateTime(raw) => write!(f, "{raw}"),
        }
    }
}

/// Checks an optional raw pattern against a kind without keeping the result.
pub fn validate_pattern(kind: ValueKind, pattern: Option<&str>) -> Result<()> {
    match pattern {
        Some(raw) => FormatPattern::parse(kind, raw).map(|_| ()),
        None => Ok(()),
    }
}

fn parse_numeric(kind: ValueKind, raw: &str) -> Result<FormatPattern> {
    let invalid = |reason: &str| CsvGenError::InvalidPattern {
        kind,
        pattern: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = raw.chars();
    let letter = chars.next().ok_or_else(|| invalid("pattern is empty"))?;
    let style = NumericStyle::from_letter(letter)
        .ok_or_else(|| invalid("expected one of C, D, F, N, P, X"))?;
    if style.integer_only() && kind != ValueKind::Integer {
        return Err(invalid("specifier only applies to integer fields"));
    }

    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("precision must be a number"));
        }
        let value: u32 = digits
            .parse()
            .map_err(|_| invalid("precision must be a number"))?;
        if value > MAX_PRECISION {
            return Err(invalid("precision must be at most 28"));
        }
        Some(value)
    };

    Ok(FormatPattern::Numeric(NumericFormat {
        style,
        precision,
        uppercase: letter.is_ascii_uppercase(),
    }))
}

fn parse_datetime(raw: &str) -> Result<FormatPattern> {
    let invalid = |reason: &str| CsvGenError::InvalidPattern {
        kind: ValueKind::DateTime,
        pattern: raw.to_string(),
        reason: reason.to_string(),
    };

    if StrftimeItems::new(raw).any(|item| matches!(item, Item::Error)) {
        return Err(invalid("unrecognized strftime specifier"));
    }
    // Offset and zone specifiers parse fine but fail against a naive value.
    let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| invalid("probe date out of range"))?;
    let mut sink = String::new();
    write!(sink, "{}", probe.format(raw))
        .map_err(|_| invalid("pattern needs time zone information"))?;

    Ok(FormatPattern::DateTime(raw.to_string()))
}

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyPlacement {
    /// `$1.00`
    #[default]
    Prefix,
    /// `£ 1.00`
    PrefixSpaced,
    /// `1.00$`
    Suffix,
    /// `1,00 €`
    SuffixSpaced,
}

/// Locale-like settings applied when formatting numbers and dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatContext {
    pub name: String,
    pub decimal_separator: String,
    pub group_separator: String,
    pub currency_symbol: String,
    pub currency_placement: CurrencyPlacement,
    /// strftime layout used for date/time values without a pattern.
    pub datetime_pattern: String,
}

impl Default for FormatContext {
    fn default() -> Self {
        Self::invariant()
    }
}

impl FormatContext {
    /// Context names accepted by [`FormatContext::by_name`].
    pub const PRESETS: [&'static str; 5] = ["invariant", "en-US", "en-GB", "de-DE", "fr-FR"];

    /// The default context: `.` decimals, `,` groups, `$` prefix, ISO-like dates.
    pub fn invariant() -> Self {
        Self {
            name: "invariant".to_string(),
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            currency_symbol: "$".to_string(),
            currency_placement: CurrencyPlacement::Prefix,
            datetime_pattern: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }

    pub fn en_us() -> Self {
        Self {
            name: "en-US".to_string(),
            datetime_pattern: "%m/%d/%Y %H:%M:%S".to_string(),
            ..Self::invariant()
        }
    }

    pub fn en_gb() -> Self {
        Self {
            name: "en-GB".to_string(),
            currency_symbol: "£".to_string(),
            datetime_pattern: "%d/%m/%Y %H:%M:%S".to_string(),
            ..Self::invariant()
        }
    }

    pub fn de_de() -> Self {
        Self {
            name: "de-DE".to_string(),
            decimal_separator: ",".to_string(),
            group_separator: ".".to_string(),
            currency_symbol: "€".to_string(),
            currency_placement: CurrencyPlacement::SuffixSpaced,
            datetime_pattern: "%d.%m.%Y %H:%M:%S".to_string(),
        }
    }

    pub fn fr_fr() -> Self {
        Self {
            name: "fr-FR".to_string(),
            decimal_separator: ",".to_string(),
            group_separator: "\u{202f}".to_string(),
            currency_symbol: "€".to_string(),
            currency_placement: CurrencyPlacement::SuffixSpaced,
            datetime_pattern: "%d/%m/%Y %H:%M:%S".to_string(),
        }
    }

    /// Resolves a preset by name (case-insensitive, `_` or `-` separated).
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "invariant" | "" => Ok(Self::invariant()),
            "en-us" | "en" => Ok(Self::en_us()),
            "en-gb" => Ok(Self::en_gb()),
            "de-de" | "de" => Ok(Self::de_de()),
            "fr-fr" | "fr" => Ok(Self::fr_fr()),
            _ => Err(CsvGenError::UnknownContext {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for FormatContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
