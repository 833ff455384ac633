//! Field and type rules.
//!
//! Rules are immutable once built. A [`FieldRule`] is keyed by field name and
//! knows nothing about the schema until it is registered with a generator; a
//! [`TypeRule`] is keyed by [`ValueKind`] and checks its pattern against that
//! kind as soon as it is constructed.

use crate::error::{CsvGenError, Result};
use crate::format::{validate_pattern, FormatContext};
use crate::value::ValueKind;

/// Per-field override of header label, formatting, and visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    name: String,
    display_name: Option<String>,
    pattern: Option<String>,
    context: Option<FormatContext>,
    visible: bool,
}

impl FieldRule {
    /// Builds a rule from every attribute.
    ///
    /// Fails with [`CsvGenError::EmptyFieldName`] if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        display_name: Option<String>,
        pattern: Option<String>,
        context: Option<FormatContext>,
        visible: bool,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CsvGenError::EmptyFieldName);
        }
        Ok(Self {
            name,
            display_name,
            pattern,
            context,
            visible,
        })
    }

    /// A visible rule with no overrides, to be refined with the `with_*` methods.
    pub fn for_field(name: impl Into<String>) -> Result<Self> {
        Self::new(name, None, None, None, true)
    }

    /// Suppresses the column.
    pub fn hidden(name: impl Into<String>) -> Result<Self> {
        Self::new(name, None, None, None, false)
    }

    /// Replaces the header label.
    pub fn renamed(name: impl Into<String>, display_name: impl Into<String>) -> Result<Self> {
        Self::new(name, Some(display_name.into()), None, None, true)
    }

    /// Formats the field with `pattern` under the default context.
    pub fn formatted(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        Self::new(name, None, Some(pattern.into()), None, true)
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: FormatContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn context(&self) -> Option<&FormatContext> {
        self.context.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Checks the rule's pattern against the kind of the field it targets.
    pub fn validate_for(&self, kind: ValueKind) -> Result<()> {
        validate_pattern(kind, self.pattern())
    }
}

/// Per-kind override of formatting and visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRule {
    kind: ValueKind,
    pattern: Option<String>,
    context: Option<FormatContext>,
    visible: bool,
}

impl TypeRule {
    /// Builds a rule from every attribute.
    ///
    /// Fails with a configuration error if `pattern` is set and `kind` has no
    /// pattern grammar, or if the pattern does not parse for `kind`.
    pub fn new(
        kind: ValueKind,
        pattern: Option<String>,
        context: Option<FormatContext>,
        visible: bool,
    ) -> Result<Self> {
        validate_pattern(kind, pattern.as_deref())?;
        Ok(Self {
            kind,
            pattern,
            context,
            visible,
        })
    }

    /// Suppresses every column of `kind`.
    pub fn hidden(kind: ValueKind) -> Self {
        Self {
            kind,
            pattern: None,
            context: None,
            visible: false,
        }
    }

    /// Formats every field of `kind` with `pattern` under the default context.
    pub fn formatted(kind: ValueKind, pattern: impl Into<String>) -> Result<Self> {
        Self::new(kind, Some(pattern.into()), None, true)
    }

    /// Formats every field of `kind` with its default layout under `context`.
    pub fn localized(kind: ValueKind, context: FormatContext) -> Self {
        Self {
            kind,
            pattern: None,
            context: Some(context),
            visible: true,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: FormatContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn context(&self) -> Option<&FormatContext> {
        self.context.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
