//! Per-call context handed to every rule.
//!
//! The validator never reads the context itself. It is threaded unchanged
//! through the whole walk, including rules that re-enter the validator,
//! so user rules can share data or observe cancellation.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// VALIDATION CONTEXT
// ============================================================================

/// Named values and a cancellation flag for one validation call.
#[derive(Debug, Default)]
pub struct ValidationContext {
    /// Named values accessible during validation.
    data: HashMap<String, Box<dyn Any + Send + Sync>>,

    /// Context this one was derived from.
    parent: Option<Arc<ValidationContext>>,

    cancelled: AtomicBool,
}

impl ValidationContext {
    /// Creates a new empty validation context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that falls back to `parent` for lookups and
    /// cancellation.
    #[must_use]
    pub fn with_parent(parent: Arc<ValidationContext>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Adds a value to the context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nebula_tagval::foundation::ValidationContext;
    ///
    /// let mut ctx = ValidationContext::new();
    /// ctx.insert("tenant", "acme".to_string());
    /// assert_eq!(ctx.get::<String>("tenant").map(String::as_str), Some("acme"));
    /// ```
    pub fn insert<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), Box::new(value));
    }

    /// Gets a value, looking through parents when absent locally.
    ///
    /// Returns `None` when the key is missing or holds another type.
    #[must_use]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        if let Some(value) = self.data.get(key) {
            return value.downcast_ref::<T>();
        }
        self.parent.as_ref().and_then(|p| p.get(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key) || self.parent.as_ref().is_some_and(|p| p.contains(key))
    }

    /// Number of local entries (excluding parent).
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flags the call as cancelled. Rules decide what to do about it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// `true` once this context or any parent was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent construction of a [`ValidationContext`].
#[derive(Debug, Default)]
pub struct ValidationContextBuilder {
    context: ValidationContext,
}

impl ValidationContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with<T: Send + Sync + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.context.insert(key, value);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn parent(mut self, parent: Arc<ValidationContext>) -> Self {
        self.context.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn build(self) -> ValidationContext {
        self.context
    }
}
