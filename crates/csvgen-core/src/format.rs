//! Per-kind value formatting.
//!
//! Every present value goes through [`format_value`], which picks one of three
//! paths depending on what the resolved rule carries:
//!
//! - a pattern (with or without a context): pattern formatting
//! - a context only: the kind's default layout under that context
//! - nothing: the kind's default string conversion

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use csvgen_model::{
    CurrencyPlacement, FormatContext, FormatPattern, NumericFormat, NumericStyle, Value, ValueKind,
};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

static DEFAULT_CONTEXT: LazyLock<FormatContext> = LazyLock::new(FormatContext::invariant);

/// Layout used for date/time values when nothing else applies.
pub const DEFAULT_DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Failure to apply a resolved format to one value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("pattern '{pattern}' cannot format a {kind} value")]
    PatternMismatch { pattern: String, kind: ValueKind },

    #[error("date/time layout '{pattern}' could not be applied")]
    DateTime { pattern: String },

    #[error("value {value} is too large to format as a percentage")]
    Overflow { value: String },
}

/// Renders a present value using the resolved pattern and context.
pub fn format_value(
    value: &Value,
    pattern: Option<&FormatPattern>,
    context: Option<&FormatContext>,
) -> Result<String, FormatError> {
    match (pattern, context) {
        (Some(pattern), context) => {
            apply_pattern(value, pattern, context.unwrap_or(&*DEFAULT_CONTEXT))
        }
        (None, Some(context)) => localized(value, context),
        (None, None) => Ok(default_string(value)),
    }
}

/// Default string conversion for each kind.
pub fn default_string(value: &Value) -> String {
    match value {
        Value::Text(text) | Value::Other(text) => text.clone(),
        Value::Integer(number) => number.to_string(),
        Value::Decimal(number) => number.to_string(),
        Value::Boolean(true) => "True".to_string(),
        Value::Boolean(false) => "False".to_string(),
        Value::DateTime(dt) => dt.format(DEFAULT_DATETIME_PATTERN).to_string(),
        Value::Identifier(id) => id.hyphenated().to_string(),
    }
}

fn localized(value: &Value, context: &FormatContext) -> Result<String, FormatError> {
    match value {
        Value::Decimal(number) => Ok(number
            .to_string()
            .replace('.', &context.decimal_separator)),
        Value::DateTime(dt) => format_datetime(dt, &context.datetime_pattern),
        _ => Ok(default_string(value)),
    }
}

fn apply_pattern(
    value: &Value,
    pattern: &FormatPattern,
    context: &FormatContext,
) -> Result<String, FormatError> {
    let mismatch = || FormatError::PatternMismatch {
        pattern: pattern.to_string(),
        kind: value.kind(),
    };
    if !pattern.applies_to(value.kind()) {
        return Err(mismatch());
    }

    match (pattern, value) {
        (FormatPattern::Numeric(spec), Value::Integer(number)) => {
            format_integer(*number, spec, context)
        }
        (FormatPattern::Numeric(spec), Value::Decimal(number)) => {
            format_decimal(*number, spec, context)
        }
        (FormatPattern::DateTime(layout), Value::DateTime(dt)) => format_datetime(dt, layout),
        _ => Err(mismatch()),
    }
}

fn format_datetime(dt: &NaiveDateTime, layout: &str) -> Result<String, FormatError> {
    let mut out = String::new();
    write!(out, "{}", dt.format(layout)).map_err(|_| FormatError::DateTime {
        pattern: layout.to_string(),
    })?;
    Ok(out)
}

fn format_integer(
    number: i64,
    spec: &NumericFormat,
    context: &FormatContext,
) -> Result<String, FormatError> {
    let width = spec.precision.unwrap_or(0) as usize;
    match spec.style {
        NumericStyle::Digits => {
            let sign = if number < 0 { "-" } else { "" };
            let magnitude = number.unsigned_abs();
            Ok(format!("{sign}{magnitude:0width$}"))
        }
        // Negative values print as 64-bit two's complement.
        NumericStyle::Hex if spec.uppercase => Ok(format!("{number:0width$X}")),
        NumericStyle::Hex => Ok(format!("{number:0width$x}")),
        _ => format_decimal(Decimal::from(number), spec, context),
    }
}

fn format_decimal(
    number: Decimal,
    spec: &NumericFormat,
    context: &FormatContext,
) -> Result<String, FormatError> {
    let digits = spec.fraction_digits();
    match spec.style {
        NumericStyle::FixedPoint => {
            let parts = split_fixed(number, digits);
            Ok(join_number(&parts, false, context))
        }
        NumericStyle::Number => {
            let parts = split_fixed(number, digits);
            Ok(join_number(&parts, true, context))
        }
        NumericStyle::Currency => {
            let parts = split_fixed(number, digits);
            Ok(currency(&parts, context))
        }
        NumericStyle::Percent => {
            let scaled = number
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or_else(|| FormatError::Overflow {
                    value: number.to_string(),
                })?;
            let parts = split_fixed(scaled, digits);
            Ok(format!("{}%", join_number(&parts, true, context)))
        }
        NumericStyle::Digits | NumericStyle::Hex => Err(FormatError::PatternMismatch {
            pattern: FormatPattern::Numeric(*spec).to_string(),
            kind: ValueKind::Decimal,
        }),
    }
}

/// Sign, integral digits, and fraction digits of a rounded number.
struct FixedParts {
    negative: bool,
    integral: String,
    fraction: String,
}

fn split_fixed(number: Decimal, digits: u32) -> FixedParts {
    let rounded = number.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (integral, fraction) = match text.split_once('.') {
        Some((integral, fraction)) => (integral.to_string(), fraction.to_string()),
        None => (text, String::new()),
    };
    let mut fraction = fraction;
    while fraction.len() < digits as usize {
        fraction.push('0');
    }
    FixedParts {
        negative,
        integral,
        fraction,
    }
}

fn join_number(parts: &FixedParts, grouped: bool, context: &FormatContext) -> String {
    let mut out = String::new();
    if parts.negative {
        out.push('-');
    }
    out.push_str(&unsigned_amount(parts, grouped, context));
    out
}

fn unsigned_amount(parts: &FixedParts, grouped: bool, context: &FormatContext) -> String {
    let mut out = if grouped {
        group_digits(&parts.integral, &context.group_separator)
    } else {
        parts.integral.clone()
    };
    if !parts.fraction.is_empty() {
        out.push_str(&context.decimal_separator);
        out.push_str(&parts.fraction);
    }
    out
}

fn currency(parts: &FixedParts, context: &FormatContext) -> String {
    let amount = unsigned_amount(parts, true, context);
    let symbol = &context.currency_symbol;
    let body = match context.currency_placement {
        CurrencyPlacement::Prefix => format!("{symbol}{amount}"),
        CurrencyPlacement::PrefixSpaced => format!("{symbol} {amount}"),
        CurrencyPlacement::Suffix => format!("{amount}{symbol}"),
        CurrencyPlacement::SuffixSpaced => format!("{amount} {symbol}"),
    };
    if parts.negative {
        format!("-{body}")
    } else {
        body
    }
}

/// Inserts `separator` between every group of three digits from the right.
fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
