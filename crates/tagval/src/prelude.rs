//! Prelude module for convenient imports.
//!
//! ```rust
//! use nebula_tagval::prelude::*;
//!
//! let validator = Validator::builder()
//!     .func("even", func(|field, _| Ok(matches!(field.current(), Value::Int(i) if i % 2 == 0))))
//!     .build();
//! assert!(validator.validate_value(&4i32, "even").unwrap().is_empty());
//! ```

pub use crate::config::ValidatorConfig;
pub use crate::foundation::{
    Field, FieldDescriptor, FieldError, ParseError, PredicateError, StructValue, Validatable,
    ValidationContext, ValidationContextBuilder, ValidationErrors, ValidatorError, Value,
    ValueKind,
};
pub use crate::funcs::{Adapter, Func, FuncOption, adapter, func};
pub use crate::validator::{
    Validator, ValidatorBuilder, default_validator, validate_struct, validate_struct_with_context,
    validate_value, validate_value_with_context,
};

#[cfg(feature = "derive")]
pub use nebula_tagval_macros::Validatable;
