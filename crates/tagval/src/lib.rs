//! # nebula-tagval
//!
//! Struct validation driven by a compact per-field tag language.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_tagval::Validatable;
//!
//! #[derive(Validatable)]
//! struct Cat {
//!     #[tag(valid = "required,alpha")]
//!     pub name: String,
//!     #[tag(valid = "required,min(1)")]
//!     pub age: u32,
//!     #[tag(valid = "optional,email")]
//!     pub owner_email: Option<String>,
//! }
//!
//! let cat = Cat { name: "Tama2".into(), age: 0, owner_email: None };
//! let errors = nebula_tagval::validate_struct(&cat).unwrap();
//!
//! assert_eq!(
//!     errors.to_string(),
//!     "name: 'Tama2' does validate as 'alpha';\
//!      age: '0' does validate as 'required';\
//!      age: '0' does validate as 'min(1)'"
//! );
//! ```
//!
//! ## Tag Language
//!
//! | Tag                          | Meaning                                        |
//! |------------------------------|------------------------------------------------|
//! | `required,len(1\|10)`        | every rule must pass                           |
//! | `alpha\|numeric`             | at least one alternative must pass             |
//! | `min(1) ; required,alpha`    | rules for the slice, then for each element     |
//! | `optional,email`             | skip when the value is empty                   |
//! | `-`                          | never validate this field                      |
//!
//! Rules resolve by name against the validator's registry when a tag is
//! parsed; an unknown name is a [`ParseError`](foundation::ParseError).
//! Custom rules and adapters are added through [`ValidatorBuilder`].
//!
//! ## Results
//!
//! Entry points return `Result<ValidationErrors, ValidatorError>`. `Err` is
//! fatal (a malformed tag, or a non-struct passed to `validate_struct`); an
//! `Ok` holding an empty [`ValidationErrors`](foundation::ValidationErrors)
//! means the value passed.

extern crate self as nebula_tagval;

mod macros;

pub mod cache;
pub mod config;
mod engine;
pub mod foundation;
pub mod funcs;
pub mod prelude;
pub mod tag;
pub mod validator;

pub use config::ValidatorConfig;
pub use foundation::{
    FieldError, ParseError, PredicateError, Validatable, ValidationContext, ValidationErrors,
    ValidatorError, Value, ValueKind,
};
pub use validator::{
    Validator, ValidatorBuilder, default_validator, validate_struct, validate_struct_with_context,
    validate_value, validate_value_with_context,
};

#[cfg(feature = "derive")]
pub use nebula_tagval_macros::Validatable;
