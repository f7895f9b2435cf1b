//! Traversal cursor handed to every rule.

use std::borrow::Cow;
use std::fmt;

use crate::foundation::value::{Validatable, Value};

/// The value currently being checked, plus where it sits in the walk.
///
/// `origin` is the value as stored (optional layers intact); `current` is
/// the same value with every present optional layer stripped. Fields form
/// a parent-linked chain that lives on the engine's call stack.
#[derive(Clone)]
pub struct Field<'a> {
    name: Cow<'a, str>,
    origin: &'a dyn Validatable,
    current: Value<'a>,
    parent: Option<&'a Field<'a>>,
}

impl<'a> Field<'a> {
    /// A root field with an empty name.
    pub fn root(origin: &'a dyn Validatable) -> Self {
        Self {
            name: Cow::Borrowed(""),
            origin,
            current: origin.as_value().extract(),
            parent: None,
        }
    }

    /// A field one level below `parent`.
    pub fn child(
        parent: &'a Field<'a>,
        name: impl Into<Cow<'a, str>>,
        origin: &'a dyn Validatable,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            current: origin.as_value().extract(),
            parent: Some(parent),
        }
    }

    /// This level's segment: a field name, `[index]` or `[key]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root, skipping unnamed levels.
    ///
    /// Bracketed segments attach to their parent without a dot, so a field
    /// named `Name` inside element 1 of `Pets` renders as `Pets[1].Name`.
    pub fn full_name(&self) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(self);
        while let Some(field) = cursor {
            if !field.name.is_empty() {
                segments.push(field.name.as_ref());
            }
            cursor = field.parent;
        }

        let mut path = String::new();
        for segment in segments.into_iter().rev() {
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        path
    }

    /// The value as stored, before optional unwrapping.
    pub fn origin(&self) -> &'a dyn Validatable {
        self.origin
    }

    /// The unwrapped value rules look at.
    pub fn current(&self) -> &Value<'a> {
        &self.current
    }

    pub fn parent(&self) -> Option<&'a Field<'a>> {
        self.parent
    }

    /// Whether the current value is the zero value of its kind.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Text rendering of the current value.
    pub fn text(&self) -> Cow<'_, str> {
        self.current.to_text()
    }

    /// Truncated text rendering used in error messages.
    pub fn short_text(&self) -> String {
        self.current.short_text()
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.full_name())
            .field("current", &self.current)
            .finish()
    }
}
