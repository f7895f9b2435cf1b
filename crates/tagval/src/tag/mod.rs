//! The tag language.
//!
//! A raw tag such as `required,len(3|10) ; alpha|numeric` is scanned into
//! tokens, parsed into a [`Chunk`] chain and cached by the validator.
//!
//! | Syntax     | Meaning                                             |
//! |------------|-----------------------------------------------------|
//! | `a,b`      | both rules apply                                    |
//! | `a\|b`     | either rule set is enough (synthetic `or` rule)     |
//! | `a ; b`    | `a` applies to the value, `b` to each element of it |
//! | `optional` | skip this level when the value is empty             |
//! | `-`        | skip the field entirely                             |

mod parser;
mod scanner;

use std::fmt;

use smallvec::SmallVec;

use crate::foundation::{Field, PredicateError};
use crate::funcs::{Func, FuncOption};

pub use parser::TagParser;
pub use scanner::{ParamScanner, TagScanner, Token};

/// Modifier literal marking a chunk optional.
pub const OPTIONAL: &str = "optional";

/// Whole-tag literal that skips a field.
pub const SKIP: &str = "-";

/// Name of the synthetic rule produced by `|`.
pub const OR_TAG: &str = "or";

/// Rule parameters; most rules take at most two.
pub type Params = SmallVec<[String; 2]>;

// ============================================================================
// TAG
// ============================================================================

/// One named rule, its parameters and the predicate it resolved to.
#[derive(Clone)]
pub struct Tag {
    name: String,
    params: Params,
    func: Func,
}

impl Tag {
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = String>, func: Func) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub(crate) fn push_param(&mut self, param: String) {
        self.params.push(param);
    }

    /// Runs the bound predicate.
    pub fn call(&self, field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
        (self.func)(field, option)
    }
}

/// Tags compare by name and parameters; the bound predicate is ignored.
impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl Eq for Tag {}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            write!(f, "({})", self.params.join("|"))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CHUNK
// ============================================================================

/// Rules for one traversal depth.
///
/// `tags` apply to the value itself; `next`, when present, applies to each
/// element one level inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub(crate) tags: Vec<Tag>,
    pub(crate) optional: bool,
    pub(crate) next: Option<Box<Chunk>>,
}

/// Chunk used for elements when a tag has no `;` continuation.
pub(crate) static EMPTY_CHUNK: Chunk = Chunk {
    tags: Vec::new(),
    optional: false,
    next: None,
};

impl Chunk {
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn next(&self) -> Option<&Chunk> {
        self.next.as_deref()
    }

    /// Number of levels in this chain, including this one.
    pub fn depth(&self) -> usize {
        1 + self.next().map_or(0, Chunk::depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::func;
    use pretty_assertions::assert_eq;

    fn noop() -> Func {
        func(|_, _| Ok(true))
    }

    #[test]
    fn tag_display() {
        assert_eq!(Tag::new("required", Params::new(), noop()).to_string(), "required");
        assert_eq!(
            Tag::new("len", ["0".to_owned(), "116".to_owned()], noop()).to_string(),
            "len(0|116)"
        );
        assert_eq!(
            Tag::new(OR_TAG, ["alpha".to_owned(), "numeric".to_owned()], noop()).to_string(),
            "or(alpha|numeric)"
        );
    }

    #[test]
    fn tags_ignore_predicate_in_equality() {
        let a = Tag::new("min", ["1".to_owned()], noop());
        let b = Tag::new("min", ["1".to_owned()], func(|_, _| Ok(false)));
        assert_eq!(a, b);
    }

    #[test]
    fn chunk_depth() {
        let chunk = Chunk {
            next: Some(Box::new(Chunk::default())),
            ..Chunk::default()
        };
        assert_eq!(chunk.depth(), 2);
        assert_eq!(EMPTY_CHUNK.depth(), 1);
    }
}
