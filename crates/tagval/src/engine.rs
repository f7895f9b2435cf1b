//! Recursive evaluation of chunk chains against values.

use std::sync::Arc;

use tracing::debug;

use crate::cache::FieldCache;
use crate::foundation::{
    Field, FieldError, ParseError, StructValue, ValidationContext, ValidationErrors,
    ValidatorError, Value,
};
use crate::funcs::FuncOption;
use crate::tag::{Chunk, EMPTY_CHUNK, SKIP};
use crate::validator::Validator;

/// Whether a raw tag can apply to a value at all.
///
/// `-` never applies. An empty tag on a scalar has nothing to check and
/// nothing to descend into.
pub(crate) fn can_validate(raw: &str, value: &Value<'_>) -> bool {
    if raw == SKIP {
        return false;
    }
    !(raw.is_empty() && value.is_scalar())
}

/// One validation call: walks a value depth-first and collects field errors.
pub(crate) struct Engine<'v> {
    validator: &'v Validator,
    context: &'v ValidationContext,
    errors: ValidationErrors,
}

impl<'v> Engine<'v> {
    pub(crate) fn new(validator: &'v Validator, context: &'v ValidationContext) -> Self {
        Self {
            validator,
            context,
            errors: ValidationErrors::new(),
        }
    }

    pub(crate) fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    /// Applies `chunk` to `field`, then descends into its elements, entries
    /// or struct fields.
    ///
    /// Elements and entries get the next chunk of the chain, or an empty one
    /// when the chain ends here. Struct fields get their own tags.
    pub(crate) fn validate(
        &mut self,
        field: &Field<'_>,
        chunk: &Chunk,
    ) -> Result<(), ValidatorError> {
        if chunk.is_optional() && field.is_empty() {
            return Ok(());
        }

        for tag in chunk.tags() {
            let option = FuncOption::new(tag.params(), self.validator, self.context);
            let source = match tag.call(field, &option) {
                Ok(true) => continue,
                Ok(false) => None,
                Err(err) => Some(err),
            };
            self.errors.push(FieldError::new(
                field,
                tag,
                source,
                self.validator.config().suppress_field_value,
            ));
        }

        let next = chunk.next().unwrap_or(&EMPTY_CHUNK);
        match field.current() {
            Value::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    let element = Field::child(field, format!("[{index}]"), *item);
                    self.validate(&element, next)?;
                }
            }
            Value::Mapping(entries) => {
                for (key, item) in entries {
                    let entry = Field::child(field, format!("[{key}]"), *item);
                    self.validate(&entry, next)?;
                }
            }
            Value::Struct(value) => self.validate_fields(field, value)?,
            _ => {}
        }
        Ok(())
    }

    fn validate_fields(
        &mut self,
        parent: &Field<'_>,
        value: &StructValue<'_>,
    ) -> Result<(), ValidatorError> {
        let caches = field_caches(self.validator, value)?;
        for cache in caches.iter() {
            let Some(origin) = value.value(cache.index) else {
                continue;
            };
            let field = Field::child(parent, cache.name, origin);
            // Dynamic fields change kind between instances of one type.
            if !can_validate(cache.raw_tag, field.current()) {
                continue;
            }
            self.validate(&field, &cache.chunk)?;
        }
        Ok(())
    }
}

/// Exported, non-skipped fields of a struct type with their parsed rules.
///
/// Only what the type declares is cached. Whether an untagged field holds
/// a scalar depends on the instance and is decided per call.
pub(crate) fn field_caches(
    validator: &Validator,
    value: &StructValue<'_>,
) -> Result<Arc<[FieldCache]>, ParseError> {
    let cache = validator.struct_cache();
    if let Some(fields) = cache.load(&value.type_id()) {
        return Ok(fields);
    }

    let tag_key = validator.config().tag_key.as_str();
    let mut fields = Vec::new();
    for (index, descriptor) in value.fields().iter().enumerate() {
        let raw_tag = descriptor.tag(tag_key);
        if !descriptor.exported || raw_tag == SKIP {
            continue;
        }
        fields.push(FieldCache {
            index,
            name: descriptor.name,
            exported: descriptor.exported,
            raw_tag,
            chunk: validator.parse_tag(raw_tag)?,
        });
    }

    debug!(
        type_name = value.type_name(),
        fields = fields.len(),
        "cached struct field rules"
    );
    Ok(cache.store(value.type_id(), fields.into()))
}
