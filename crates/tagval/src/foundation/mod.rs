//! Foundation types: the value model, the traversal cursor, the per-call
//! context and every error type.

pub mod context;
pub mod error;
pub mod field;
pub mod value;

pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{FieldError, ParseError, PredicateError, ValidationErrors, ValidatorError};
pub use field::Field;
pub use value::{FieldDescriptor, SHORT_TEXT_LIMIT, StructValue, Validatable, Value, ValueKind};
