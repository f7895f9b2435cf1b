//! Error types
//!
//! Two families live here:
//!
//! - **Fatal** errors ([`ParseError`], [`ValidatorError`]) abort the call that
//!   raised them and come back as `Err`.
//! - **Per-field** errors ([`FieldError`], collected in [`ValidationErrors`])
//!   are gathered while walking a value. A rule that errors internally is
//!   reported through [`PredicateError`] attached to its field error; the walk
//!   keeps going.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::foundation::field::Field;
use crate::foundation::value::ValueKind;
use crate::tag::Tag;

// ============================================================================
// FATAL ERRORS
// ============================================================================

/// A tag string could not be turned into a rule chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// An empty rule in front of `,`.
    #[error("parse: invalid literal in tag separator: `{tag}`")]
    EmptyTagLiteral { tag: String },

    /// An empty alternative in front of `|`.
    #[error("parse: invalid literal in or separator: `{tag}`")]
    EmptyOrLiteral { tag: String },

    /// A `)` without a matching `(`.
    #[error("parse: illegal token: `{tag}`")]
    IllegalToken { tag: String },

    /// A rule like `len(3` whose parameter list never closes.
    #[error("parse: unclosed params: `{literal}`")]
    UnclosedParams { literal: String },

    /// Text after the `)` that closes a rule's parameter list, as in `len(3)x`.
    #[error("parse: unexpected characters after params: `{literal}`")]
    TrailingCharacters { literal: String },

    /// The rule name is not registered.
    #[error("parse: function not found: {name}")]
    FunctionNotFound { name: String },
}

/// Fatal error of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `validate_struct` was handed something that is not a struct.
    #[error("struct type required, got {kind}")]
    StructRequired { kind: ValueKind },
}

// ============================================================================
// PREDICATE ERRORS
// ============================================================================

/// Internal failure of a single rule.
///
/// Recorded on the [`FieldError`] of the rule; never aborts the walk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PredicateError {
    /// The rule got a parameter count it does not support.
    #[error("invalid params len: expected {expected}, got {actual}")]
    ParamCount {
        expected: &'static str,
        actual: usize,
    },

    /// A parameter could not be interpreted.
    #[error("invalid param `{param}`: {reason}")]
    InvalidParam { param: String, reason: String },

    /// Re-entering the validator failed fatally.
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// Free-form failure from a user rule.
    #[error("{0}")]
    Custom(Cow<'static, str>),
}

impl PredicateError {
    /// Creates a [`PredicateError::Custom`].
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(message.into())
    }

    pub(crate) fn invalid_param(param: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidParam {
            param: param.to_owned(),
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// FIELD ERROR
// ============================================================================

/// One failing (field, rule) pair.
///
/// A snapshot: path and value text are rendered when the error is recorded,
/// so it outlives the value that was validated.
#[derive(Debug, Clone)]
pub struct FieldError {
    name: String,
    path: String,
    value: String,
    tag: Tag,
    source: Option<PredicateError>,
    suppress_value: bool,
}

impl FieldError {
    pub(crate) fn new(
        field: &Field<'_>,
        tag: &Tag,
        source: Option<PredicateError>,
        suppress_value: bool,
    ) -> Self {
        Self {
            name: field.name().to_owned(),
            path: field.full_name(),
            value: field.short_text(),
            tag: tag.clone(),
            source,
            suppress_value,
        }
    }

    /// Last path segment, e.g. `Name` or `[3]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path, e.g. `Owner.Pets[3].Name`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Truncated value text as it appears in the message.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The rule that failed.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Internal rule failure, when the rule errored instead of returning false.
    pub fn predicate_error(&self) -> Option<&PredicateError> {
        self.source.as_ref()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            return write!(
                f,
                "{}: an internal error occurred in '{}': {}",
                self.path, self.tag, source
            );
        }
        if self.suppress_value {
            return write!(f, "{}: The value does validate as '{}'", self.path, self.tag);
        }
        write!(
            f,
            "{}: '{}' does validate as '{}'",
            self.path, self.value, self.tag
        )
    }
}

impl StdError for FieldError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn StdError + 'static))
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Field errors of one call, in depth-first encounter order.
///
/// An empty collection means the value passed.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl StdError for ValidationErrors {}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl Extend<FieldError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
