//! Predicate registry types and the built-in rule catalogue.
//!
//! A rule name in a tag resolves to a [`Func`]. Rules receive the current
//! [`Field`] and a [`FuncOption`] carrying their parameters, the validator
//! that invoked them and the per-call [`ValidationContext`].
//!
//! # Examples
//!
//! ```rust
//! use nebula_tagval::funcs::func;
//! use nebula_tagval::Validator;
//!
//! let validator = Validator::builder()
//!     .func("even", func(|field, _| {
//!         Ok(matches!(field.current().as_str(), Some(s) if s.len() % 2 == 0))
//!     }))
//!     .build();
//!
//! assert!(validator.validate_value(&"ab", "even").unwrap().is_empty());
//! assert_eq!(validator.validate_value(&"abc", "even").unwrap().len(), 1);
//! ```

mod builtin;
mod pattern;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::foundation::{Field, PredicateError, ValidationContext};
use crate::validator::Validator;

pub use builtin::{
    has_value, is_zero_value, length, max_length, min_length, or, str_length, str_max_length,
    str_min_length,
};

/// A rule predicate.
///
/// `Ok(false)` is an ordinary failure. `Err` is an internal failure; it is
/// reported on the field error and the walk keeps going either way.
pub type Func =
    Arc<dyn Fn(&Field<'_>, &FuncOption<'_>) -> Result<bool, PredicateError> + Send + Sync>;

/// Middleware wrapped around every registered predicate.
pub type Adapter = Arc<dyn Fn(Func) -> Func + Send + Sync>;

/// Rule name to predicate.
pub type FuncMap = HashMap<String, Func>;

/// Wraps a closure as a [`Func`].
pub fn func<F>(f: F) -> Func
where
    F: Fn(&Field<'_>, &FuncOption<'_>) -> Result<bool, PredicateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as an [`Adapter`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use nebula_tagval::funcs::{adapter, func};
/// use nebula_tagval::Validator;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
///
/// let validator = Validator::builder()
///     .adapter(adapter(move |inner| {
///         let counter = Arc::clone(&counter);
///         func(move |field, opt| {
///             counter.fetch_add(1, Ordering::Relaxed);
///             inner(field, opt)
///         })
///     }))
///     .build();
///
/// validator.validate_value(&"abc", "required,alpha").unwrap();
/// assert_eq!(calls.load(Ordering::Relaxed), 2);
/// ```
pub fn adapter<F>(f: F) -> Adapter
where
    F: Fn(Func) -> Func + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps `func` in `adapters` so that the first adapter runs first.
pub(crate) fn apply(func: Func, adapters: &[Adapter]) -> Func {
    adapters.iter().rev().fold(func, |inner, adapter| adapter(inner))
}

/// Every built-in rule, unwrapped.
#[must_use]
pub fn builtin_funcs() -> FuncMap {
    let mut funcs = FuncMap::new();
    builtin::register(&mut funcs);
    pattern::register(&mut funcs);
    funcs
}

// ============================================================================
// FUNC OPTION
// ============================================================================

/// Everything a rule gets besides the field.
#[derive(Clone, Copy)]
pub struct FuncOption<'a> {
    params: &'a [String],
    validator: &'a Validator,
    context: &'a ValidationContext,
}

impl<'a> FuncOption<'a> {
    pub(crate) fn new(
        params: &'a [String],
        validator: &'a Validator,
        context: &'a ValidationContext,
    ) -> Self {
        Self {
            params,
            validator,
            context,
        }
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> &'a [String] {
        self.params
    }

    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).map(String::as_str)
    }

    /// The validator running this rule, for rules that re-enter it.
    pub fn validator(&self) -> &'a Validator {
        self.validator
    }

    pub fn context(&self) -> &'a ValidationContext {
        self.context
    }
}

impl fmt::Debug for FuncOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncOption")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
