//! Compile-time tests for nebula-tagval-macros.
//!
//! Passing cases check the generated impl; failing cases pin the spanned
//! diagnostics for unsupported shapes and malformed `#[tag]` attributes.

#[test]
fn test_validatable_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/validatable_pass.rs");
}

#[test]
fn test_validatable_derive_fail() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/*_fail.rs");
}
