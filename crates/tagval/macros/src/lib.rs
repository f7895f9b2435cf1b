//! # Nebula Tagval Macros
//!
//! `#[derive(Validatable)]` for `nebula-tagval`.
//!
//! ## Examples
//!
//! ```ignore
//! use nebula_tagval::Validatable;
//!
//! #[derive(Validatable)]
//! pub struct Owner {
//!     #[tag(valid = "required,alpha", rename = "Name")]
//!     pub name: String,
//!     #[tag(valid = "min(1) ; required")]
//!     pub pets: Vec<Pet>,
//!     #[tag(skip)]
//!     pub handle: std::fs::File,
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod support;
mod validatable;

/// Derive macro for the `Validatable` trait.
///
/// Only structs with named fields are supported. Each field becomes one
/// entry of the struct view, in declaration order.
///
/// # Attributes
///
/// ## Field attributes (`#[tag(...)]`)
///
/// - `<key> = "..."` - Raw tag under a tag key; the validator reads the one
///   under its configured key (default `valid`). Several keys may be given.
/// - `rename = "..."` - Name reported in error paths (default: field name)
/// - `skip` - Leave the field out entirely; its type need not implement
///   `Validatable`
///
/// Only `pub` fields are validated. Private fields still count when deciding
/// whether the struct as a whole is empty.
///
/// # Example
///
/// ```ignore
/// #[derive(Validatable)]
/// pub struct Cat {
///     #[tag(valid = "required,alpha")]
///     pub name: String,
///     #[tag(valid = "optional,min(1)")]
///     pub age: Option<u32>,
/// }
/// ```
#[proc_macro_derive(Validatable, attributes(tag))]
pub fn derive_validatable(input: TokenStream) -> TokenStream {
    validatable::derive(input)
}
