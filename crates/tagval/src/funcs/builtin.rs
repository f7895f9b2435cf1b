//! Presence, length and `or` rules.

use std::fmt::Display;
use std::str::FromStr;

use crate::foundation::{Field, PredicateError, Value};
use crate::funcs::{FuncMap, FuncOption, func};

pub(super) fn register(funcs: &mut FuncMap) {
    let entries = [
        ("required", func(has_value)),
        ("req", func(has_value)),
        ("empty", func(is_zero_value)),
        ("zero", func(is_zero_value)),
        ("len", func(length)),
        ("length", func(length)),
        ("range", func(length)),
        ("min", func(min_length)),
        ("max", func(max_length)),
        ("strlen", func(str_length)),
        ("strlength", func(str_length)),
        ("runelen", func(str_length)),
        ("runelength", func(str_length)),
        ("strmin", func(str_min_length)),
        ("strmax", func(str_max_length)),
        ("or", func(or)),
    ];
    for (name, f) in entries {
        funcs.insert(name.to_owned(), f);
    }
}

// ============================================================================
// PRESENCE
// ============================================================================

/// `required`: the value is not the zero value of its kind.
pub fn has_value(field: &Field<'_>, _: &FuncOption<'_>) -> Result<bool, PredicateError> {
    Ok(!field.is_empty())
}

/// `empty`: the value is the zero value of its kind.
pub fn is_zero_value(field: &Field<'_>, _: &FuncOption<'_>) -> Result<bool, PredicateError> {
    Ok(field.is_empty())
}

// ============================================================================
// LENGTH
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Bound {
    Min,
    Max,
    Exact,
}

impl Bound {
    fn holds<T: PartialOrd>(self, actual: T, limit: T) -> bool {
        match self {
            Self::Min => limit <= actual,
            Self::Max => actual <= limit,
            Self::Exact => actual == limit,
        }
    }
}

fn parse_param<T>(param: &str) -> Result<T, PredicateError>
where
    T: FromStr,
    T::Err: Display,
{
    param
        .parse()
        .map_err(|err| PredicateError::invalid_param(param, err))
}

fn single_param<'a>(option: &FuncOption<'a>) -> Result<&'a str, PredicateError> {
    match option.params() {
        [param] => Ok(param.as_str()),
        params => Err(PredicateError::ParamCount {
            expected: "1",
            actual: params.len(),
        }),
    }
}

/// Byte length of text, element count of collections, value of numbers.
fn measure(field: &Field<'_>, param: &str, bound: Bound) -> Result<bool, PredicateError> {
    match field.current() {
        value @ (Value::Text(_) | Value::Sequence(_) | Value::Mapping(_)) => {
            let limit: i64 = parse_param(param)?;
            let len = value.len().map_or(0, |len| i64::try_from(len).unwrap_or(i64::MAX));
            Ok(bound.holds(len, limit))
        }
        Value::Int(v) => Ok(bound.holds(*v, parse_param(param)?)),
        Value::UInt(v) => Ok(bound.holds(*v, parse_param(param)?)),
        Value::Float(v) => Ok(bound.holds(*v, parse_param(param)?)),
        _ => Ok(false),
    }
}

/// Character count; only text qualifies.
fn measure_chars(field: &Field<'_>, param: &str, bound: Bound) -> Result<bool, PredicateError> {
    let Some(text) = field.current().as_str() else {
        return Ok(false);
    };
    let limit: i64 = parse_param(param)?;
    let count = i64::try_from(text.chars().count()).unwrap_or(i64::MAX);
    Ok(bound.holds(count, limit))
}

fn ranged(
    field: &Field<'_>,
    option: &FuncOption<'_>,
    measure: fn(&Field<'_>, &str, Bound) -> Result<bool, PredicateError>,
) -> Result<bool, PredicateError> {
    match option.params() {
        [exact] => measure(field, exact, Bound::Exact),
        [min, max] => {
            let above = measure(field, min, Bound::Min)?;
            let below = measure(field, max, Bound::Max)?;
            Ok(above && below)
        }
        params => Err(PredicateError::ParamCount {
            expected: "1 or 2",
            actual: params.len(),
        }),
    }
}

/// `len(n)` or `len(min|max)`.
pub fn length(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    ranged(field, option, measure)
}

/// `min(n)`.
pub fn min_length(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    measure(field, single_param(option)?, Bound::Min)
}

/// `max(n)`.
pub fn max_length(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    measure(field, single_param(option)?, Bound::Max)
}

/// `strlen(n)` or `strlen(min|max)`, counted in characters.
pub fn str_length(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    ranged(field, option, measure_chars)
}

pub fn str_min_length(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    measure_chars(field, single_param(option)?, Bound::Min)
}

pub fn str_max_length(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    measure_chars(field, single_param(option)?, Bound::Max)
}

// ============================================================================
// OR
// ============================================================================

/// `or(a|b|...)`: each param is a raw tag run against the field's value;
/// the first one that yields no errors wins.
///
/// A fatal error while re-entering the validator aborts the rule with that
/// error instead of trying the remaining alternatives.
pub fn or(field: &Field<'_>, option: &FuncOption<'_>) -> Result<bool, PredicateError> {
    for raw in option.params() {
        let errors = option
            .validator()
            .validate_value_with_context(option.context(), field.origin(), raw)?;
        if errors.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}
