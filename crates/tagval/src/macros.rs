//! Internal macros.

// ============================================================================
// PATTERN FUNCS MACRO
// ============================================================================

/// Declares regex-backed rules: one lazily compiled pattern and one
/// predicate per entry, plus a `register_patterns` function that inserts every
/// predicate under each of its names.
///
/// ```rust,ignore
/// pattern_funcs! {
///     /// Letters only.
///     fn is_alpha = ALPHA(r"^[a-zA-Z]+$") => ["alpha"];
///     fn is_isbn13 = ISBN13(r"^97[89][0-9]{10}$") => ["isbn13", "isbn"];
/// }
/// ```
///
/// Predicates match against the field's text rendering, so a number is
/// checked as its decimal digits.
macro_rules! pattern_funcs {
    (
        $(
            $(#[$meta:meta])*
            fn $func:ident = $regex:ident($pattern:expr) => [$($name:literal),+ $(,)?];
        )*
    ) => {
        $(
            static $regex: ::std::sync::LazyLock<::regex::Regex> =
                ::std::sync::LazyLock::new(|| ::regex::Regex::new($pattern).unwrap());

            $(#[$meta])*
            fn $func(
                field: &$crate::foundation::Field<'_>,
                _: &$crate::funcs::FuncOption<'_>,
            ) -> ::std::result::Result<bool, $crate::foundation::PredicateError> {
                Ok($regex.is_match(&field.text()))
            }
        )*

        fn register_patterns(funcs: &mut $crate::funcs::FuncMap) {
            $($(
                funcs.insert(($name).to_owned(), $crate::funcs::func($func));
            )+)*
        }
    };
}

pub(crate) use pattern_funcs;
