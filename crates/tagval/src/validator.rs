//! The validator: predicate registry, caches and entry points.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::debug;

use crate::cache::{StructCache, TagCache};
use crate::config::ValidatorConfig;
use crate::engine::{Engine, can_validate};
use crate::foundation::{
    Field, ParseError, Validatable, ValidationContext, ValidationErrors, ValidatorError, Value,
};
use crate::funcs::{Adapter, Func, FuncMap, apply, builtin_funcs};
use crate::tag::{Chunk, EMPTY_CHUNK, TagParser};

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates values against tag rules.
///
/// Parsed tags and per-type struct metadata are cached inside the validator,
/// so one instance should be reused across calls. Every entry point takes
/// `&self` and is safe to call from many threads.
///
/// # Examples
///
/// ```rust
/// use nebula_tagval::Validator;
///
/// let validator = Validator::new();
///
/// let errors = validator.validate_value(&"neko-1", "required,alphanum").unwrap();
/// assert_eq!(errors.to_string(), ": 'neko-1' does validate as 'alphanum'");
///
/// let errors = validator.validate_value(&vec!["a", "b1"], "min(1) ; alpha").unwrap();
/// assert_eq!(errors.to_string(), "[1]: 'b1' does validate as 'alpha'");
/// ```
pub struct Validator {
    funcs: FuncMap,
    adapters: Vec<Adapter>,
    config: ValidatorConfig,
    tag_cache: TagCache,
    struct_cache: StructCache,
}

impl Validator {
    /// A validator with the built-in rules and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Whether a rule is registered under `name`.
    pub fn has_func(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Adds or replaces a rule, wrapped in this validator's adapters.
    ///
    /// Cached chunks hold the predicates they resolved, so both caches are
    /// cleared.
    pub fn register_func(&mut self, name: impl Into<String>, func: Func) {
        let name = name.into();
        debug!(rule = %name, "registering rule");
        self.funcs.insert(name, apply(func, &self.adapters));
        self.tag_cache.clear();
        self.struct_cache.clear();
    }

    /// Parses `raw` into a chunk chain, or returns the cached one.
    pub fn parse_tag(&self, raw: &str) -> Result<Arc<Chunk>, ParseError> {
        if let Some(chunk) = self.tag_cache.load(raw) {
            return Ok(chunk);
        }

        let chunk = TagParser::new(&self.funcs).parse(raw)?;
        debug!(tag = raw, levels = chunk.depth(), "cached parsed tag");
        Ok(self.tag_cache.store(raw.to_owned(), Arc::new(chunk)))
    }

    pub(crate) fn struct_cache(&self) -> &StructCache {
        &self.struct_cache
    }

    /// Validates every tagged field of a struct.
    ///
    /// A bare null such as `()` validates to no errors. Any other non-struct
    /// value, an absent optional included, is a
    /// [`ValidatorError::StructRequired`].
    pub fn validate_struct(
        &self,
        value: &dyn Validatable,
    ) -> Result<ValidationErrors, ValidatorError> {
        self.validate_struct_with_context(&ValidationContext::new(), value)
    }

    /// [`validate_struct`](Self::validate_struct) with a caller-provided
    /// context handed to every rule.
    pub fn validate_struct_with_context(
        &self,
        context: &ValidationContext,
        value: &dyn Validatable,
    ) -> Result<ValidationErrors, ValidatorError> {
        let field = Field::root(value);
        match field.current() {
            Value::Struct(_) => {}
            Value::Null => return Ok(ValidationErrors::new()),
            other => {
                return Err(ValidatorError::StructRequired { kind: other.kind() });
            }
        }

        let mut engine = Engine::new(self, context);
        engine.validate(&field, &EMPTY_CHUNK)?;
        Ok(engine.into_errors())
    }

    /// Validates a single value against a raw tag.
    pub fn validate_value(
        &self,
        value: &dyn Validatable,
        raw_tag: &str,
    ) -> Result<ValidationErrors, ValidatorError> {
        self.validate_value_with_context(&ValidationContext::new(), value, raw_tag)
    }

    /// [`validate_value`](Self::validate_value) with a caller-provided
    /// context handed to every rule.
    pub fn validate_value_with_context(
        &self,
        context: &ValidationContext,
        value: &dyn Validatable,
        raw_tag: &str,
    ) -> Result<ValidationErrors, ValidatorError> {
        let field = Field::root(value);
        if !can_validate(raw_tag, field.current()) {
            return Ok(ValidationErrors::new());
        }

        let chunk = self.parse_tag(raw_tag)?;
        let mut engine = Engine::new(self, context);
        engine.validate(&field, &chunk)?;
        Ok(engine.into_errors())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("funcs", &self.funcs.len())
            .field("adapters", &self.adapters.len())
            .field("config", &self.config)
            .field("tag_cache", &self.tag_cache)
            .field("struct_cache", &self.struct_cache)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent construction of a [`Validator`].
///
/// Custom rules are added on top of the built-in ones and may replace them.
/// Adapters wrap every rule, built-in and custom alike; the first adapter
/// added runs first.
#[derive(Default)]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    funcs: FuncMap,
    adapters: Vec<Adapter>,
}

impl ValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.config.tag_key = tag_key.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn suppress_field_value(mut self, suppress: bool) -> Self {
        self.config.suppress_field_value = suppress;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn func(mut self, name: impl Into<String>, func: Func) -> Self {
        self.funcs.insert(name.into(), func);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn adapter(mut self, adapter: Adapter) -> Self {
        self.adapters.push(adapter);
        self
    }

    #[must_use]
    pub fn build(self) -> Validator {
        let mut funcs = builtin_funcs();
        funcs.extend(self.funcs);
        let funcs: HashMap<_, _> = funcs
            .into_iter()
            .map(|(name, func)| (name, apply(func, &self.adapters)))
            .collect();

        Validator {
            funcs,
            adapters: self.adapters,
            config: self.config,
            tag_cache: TagCache::new(),
            struct_cache: StructCache::new(),
        }
    }
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        custom.sort_unstable();
        f.debug_struct("ValidatorBuilder")
            .field("config", &self.config)
            .field("funcs", &custom)
            .field("adapters", &self.adapters.len())
            .finish()
    }
}

// ============================================================================
// DEFAULT VALIDATOR
// ============================================================================

static DEFAULT_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

/// Process-wide validator with the built-in rules and default configuration.
pub fn default_validator() -> &'static Validator {
    &DEFAULT_VALIDATOR
}

/// [`Validator::validate_struct`] on the [`default_validator`].
pub fn validate_struct(value: &dyn Validatable) -> Result<ValidationErrors, ValidatorError> {
    default_validator().validate_struct(value)
}

/// [`Validator::validate_value`] on the [`default_validator`].
pub fn validate_value(
    value: &dyn Validatable,
    raw_tag: &str,
) -> Result<ValidationErrors, ValidatorError> {
    default_validator().validate_value(value, raw_tag)
}

/// [`Validator::validate_struct_with_context`] on the [`default_validator`].
pub fn validate_struct_with_context(
    context: &ValidationContext,
    value: &dyn Validatable,
) -> Result<ValidationErrors, ValidatorError> {
    default_validator().validate_struct_with_context(context, value)
}

/// [`Validator::validate_value_with_context`] on the [`default_validator`].
pub fn validate_value_with_context(
    context: &ValidationContext,
    value: &dyn Validatable,
    raw_tag: &str,
) -> Result<ValidationErrors, ValidatorError> {
    default_validator().validate_value_with_context(context, value, raw_tag)
}
