//! Dynamic value model walked by the evaluation engine.
//!
//! Every type that can be validated exposes itself through [`Validatable`],
//! producing a one-level [`Value`] view. Children (struct fields, sequence
//! elements, mapping values, optional payloads) are handed out as borrowed
//! trait objects, so a deep structure is only materialised as far as the
//! engine actually walks it.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

/// Number of characters kept by [`Value::short_text`] before truncation.
pub const SHORT_TEXT_LIMIT: usize = 32;

// ============================================================================
// VALIDATABLE
// ============================================================================

/// A type whose values can be walked by the validator.
///
/// Usually implemented through `#[derive(Validatable)]` for structs; the crate
/// ships implementations for scalars, strings, collections, `Option` and the
/// common smart pointers.
///
/// # Examples
///
/// ```rust
/// use nebula_tagval::foundation::{Validatable, Value};
///
/// struct Celsius(f64);
///
/// impl Validatable for Celsius {
///     fn as_value(&self) -> Value<'_> {
///         Value::Float(self.0)
///     }
/// }
/// ```
pub trait Validatable {
    /// Returns a one-level view of this value.
    fn as_value(&self) -> Value<'_>;
}

// ============================================================================
// VALUE
// ============================================================================

/// Structural view of a value.
#[derive(Clone)]
pub enum Value<'a> {
    /// Explicit null (unit, JSON null).
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer of any width.
    Int(i64),
    /// Unsigned integer of any width.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(Cow<'a, str>),
    /// Ordered elements, addressed as `[index]`.
    Sequence(Vec<&'a dyn Validatable>),
    /// Key/value entries, addressed as `[key]`.
    Mapping(Vec<(String, &'a dyn Validatable)>),
    /// A struct with named fields.
    Struct(StructValue<'a>),
    /// A nullable wrapper.
    Optional(Option<&'a dyn Validatable>),
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Sequence,
    Mapping,
    Struct,
    Optional,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Text => "text",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Struct => "struct",
            Self::Optional => "optional",
        };
        f.write_str(name)
    }
}

impl<'a> Value<'a> {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::UInt(_) => ValueKind::UInt,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
            Self::Struct(_) => ValueKind::Struct,
            Self::Optional(_) => ValueKind::Optional,
        }
    }

    /// Strips every present optional layer.
    ///
    /// An absent optional is returned as is, so the caller can still tell
    /// "nothing here" apart from a concrete value.
    #[must_use]
    pub fn extract(self) -> Value<'a> {
        let mut value = self;
        while let Self::Optional(Some(inner)) = value {
            value = inner.as_value();
        }
        value
    }

    /// Returns `true` for the zero value of the kind.
    ///
    /// A struct is empty when all of its fields are empty. A present optional
    /// is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null | Self::Optional(None) => true,
            Self::Optional(Some(_)) => false,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::UInt(u) => *u == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(s) => s.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Mapping(entries) => entries.is_empty(),
            Self::Struct(s) => s.is_empty(),
        }
    }

    /// Returns `true` for kinds that never recurse.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Int(_) | Self::UInt(_) | Self::Float(_) | Self::Text(_)
        )
    }

    /// Returns `true` for integer and float kinds.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::UInt(_) | Self::Float(_))
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(&**s),
            _ => None,
        }
    }

    /// Length in bytes for text and element count for collections.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Text(s) => Some(s.len()),
            Self::Sequence(items) => Some(items.len()),
            Self::Mapping(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Renders the value the way rules and error messages see it.
    ///
    /// Text is returned verbatim, numbers and booleans formatted, a struct
    /// renders as its type name and collections as `<Array>` / `<Map>`.
    /// Null renders as `<nil>`.
    #[must_use]
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(&**s),
            Self::Bool(b) => Cow::Owned(b.to_string()),
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::UInt(u) => Cow::Owned(u.to_string()),
            Self::Float(f) => Cow::Owned(f.to_string()),
            Self::Struct(s) => Cow::Borrowed(s.type_name()),
            Self::Sequence(_) => Cow::Borrowed("<Array>"),
            Self::Mapping(_) => Cow::Borrowed("<Map>"),
            Self::Null | Self::Optional(None) => Cow::Borrowed("<nil>"),
            Self::Optional(Some(inner)) => Cow::Owned(inner.as_value().to_text().into_owned()),
        }
    }

    /// [`to_text`](Self::to_text) cut to [`SHORT_TEXT_LIMIT`] characters,
    /// with `...` appended when something was cut.
    #[must_use]
    pub fn short_text(&self) -> String {
        let text = self.to_text();
        match text.char_indices().nth(SHORT_TEXT_LIMIT) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.into_owned(),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::UInt(u) => f.debug_tuple("UInt").field(u).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Sequence(items) => f
                .debug_list()
                .entries(items.iter().map(|item| item.as_value()))
                .finish(),
            Self::Mapping(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v.as_value())))
                .finish(),
            Self::Struct(s) => fmt::Debug::fmt(s, f),
            Self::Optional(inner) => f
                .debug_tuple("Optional")
                .field(&inner.map(|v| v.as_value()))
                .finish(),
        }
    }
}

// ============================================================================
// STRUCTS
// ============================================================================

/// Static metadata of one declared struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name used in error paths.
    pub name: &'static str,
    /// Whether the field is public. Private fields are never traversed.
    pub exported: bool,
    /// Raw tags keyed by tag key, e.g. `[("valid", "required,alpha")]`.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    pub const fn new(
        name: &'static str,
        exported: bool,
        tags: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            name,
            exported,
            tags,
        }
    }

    /// Raw tag stored under `key`, or `""` when the field has none.
    #[must_use]
    pub fn tag(&self, key: &str) -> &'static str {
        self.tags
            .iter()
            .find_map(|(k, raw)| (*k == key).then_some(*raw))
            .unwrap_or("")
    }
}

/// A struct value: type identity, field metadata and borrowed field values.
#[derive(Clone)]
pub struct StructValue<'a> {
    type_id: TypeId,
    type_name: &'static str,
    fields: &'static [FieldDescriptor],
    values: Vec<&'a dyn Validatable>,
}

impl<'a> StructValue<'a> {
    /// Creates a struct view for type `T`.
    ///
    /// `values` must line up with `fields`, one value per descriptor.
    pub fn new<T: ?Sized + 'static>(
        type_name: &'static str,
        fields: &'static [FieldDescriptor],
        values: Vec<&'a dyn Validatable>,
    ) -> Self {
        debug_assert_eq!(
            fields.len(),
            values.len(),
            "field descriptors and values of `{type_name}` are out of sync"
        );
        Self {
            type_id: TypeId::of::<T>(),
            type_name,
            fields,
            values,
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Value of the field at `index` in declaration order.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&'a dyn Validatable> {
        self.values.get(index).copied()
    }

    /// Iterates `(descriptor, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &'a dyn Validatable)> + '_ {
        self.fields.iter().zip(self.values.iter().copied())
    }

    /// `true` when every field holds its zero value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.as_value().is_empty())
    }
}

impl fmt::Debug for StructValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name);
        for (desc, value) in self.iter() {
            s.field(desc.name, &value.as_value());
        }
        s.finish()
    }
}

// ============================================================================
// STD IMPLEMENTATIONS
// ============================================================================

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl Validatable for $ty {
            fn as_value(&self) -> Value<'_> {
                Value::Int(*self as i64)
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl Validatable for $ty {
            fn as_value(&self) -> Value<'_> {
                Value::UInt(*self as u64)
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, isize);
impl_unsigned!(u8, u16, u32, usize);

impl Validatable for i64 {
    fn as_value(&self) -> Value<'_> {
        Value::Int(*self)
    }
}

impl Validatable for u64 {
    fn as_value(&self) -> Value<'_> {
        Value::UInt(*self)
    }
}

impl Validatable for f32 {
    fn as_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl Validatable for f64 {
    fn as_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl Validatable for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Validatable for () {
    fn as_value(&self) -> Value<'_> {
        Value::Null
    }
}

impl Validatable for char {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Owned(self.to_string()))
    }
}

impl Validatable for str {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self))
    }
}

impl Validatable for String {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl Validatable for Cow<'_, str> {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(&**self))
    }
}

impl<T: Validatable> Validatable for Option<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Optional(self.as_ref().map(|v| v as &dyn Validatable))
    }
}

impl<T: Validatable> Validatable for [T] {
    fn as_value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(|v| v as &dyn Validatable).collect())
    }
}

impl<T: Validatable, const N: usize> Validatable for [T; N] {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<T: Validatable> Validatable for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<T: Validatable> Validatable for VecDeque<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(|v| v as &dyn Validatable).collect())
    }
}

fn mapping<'a, K, V, I>(entries: I) -> Value<'a>
where
    K: fmt::Display + 'a,
    V: Validatable + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    Value::Mapping(
        entries
            .map(|(k, v)| (k.to_string(), v as &dyn Validatable))
            .collect(),
    )
}

/// Entries come out in the map's own iteration order, which is unspecified.
impl<K: fmt::Display, V: Validatable, S: BuildHasher> Validatable for HashMap<K, V, S> {
    fn as_value(&self) -> Value<'_> {
        mapping(self.iter())
    }
}

impl<K: fmt::Display, V: Validatable> Validatable for BTreeMap<K, V> {
    fn as_value(&self) -> Value<'_> {
        mapping(self.iter())
    }
}

impl<K: fmt::Display, V: Validatable, S: BuildHasher> Validatable for IndexMap<K, V, S> {
    fn as_value(&self) -> Value<'_> {
        mapping(self.iter())
    }
}

impl<T: Validatable + ?Sized> Validatable for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: Validatable + ?Sized> Validatable for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: Validatable + ?Sized> Validatable for Rc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: Validatable + ?Sized> Validatable for Arc<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

#[cfg(feature = "json")]
impl Validatable for serde_json::Value {
    fn as_value(&self) -> Value<'_> {
        use serde_json::Value as Json;

        match self {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            Json::String(s) => Value::Text(Cow::Borrowed(s.as_str())),
            Json::Array(items) => {
                Value::Sequence(items.iter().map(|v| v as &dyn Validatable).collect())
            }
            Json::Object(entries) => Value::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v as &dyn Validatable))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    struct Point {
        x: i32,
        y: i32,
    }

    const POINT_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("X", true, &[("valid", "required")]),
        FieldDescriptor::new("Y", true, &[]),
    ];

    impl Validatable for Point {
        fn as_value(&self) -> Value<'_> {
            Value::Struct(StructValue::new::<Self>(
                "Point",
                POINT_FIELDS,
                vec![&self.x as &dyn Validatable, &self.y],
            ))
        }
    }

    #[rstest]
    #[case::empty_text("", true)]
    #[case::text("a", false)]
    fn emptiness_of_text(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(value.as_value().is_empty(), expected);
    }

    #[rstest]
    #[case::zero(0, true)]
    #[case::negative(-3, false)]
    #[case::positive(12, false)]
    fn emptiness_of_ints(#[case] value: i64, #[case] expected: bool) {
        assert_eq!(value.as_value().is_empty(), expected);
    }

    #[test]
    fn emptiness_of_composites() {
        assert!(Vec::<String>::new().as_value().is_empty());
        assert!(!vec![""].as_value().is_empty());
        assert!(HashMap::<String, i32>::new().as_value().is_empty());
        assert!(None::<i32>.as_value().is_empty());
        assert!(!Some(0).as_value().is_empty());
        assert!(0.0f64.as_value().is_empty());
        assert!(Point { x: 0, y: 0 }.as_value().is_empty());
        assert!(!Point { x: 0, y: 1 }.as_value().is_empty());
    }

    #[test]
    fn extract_unwraps_every_present_layer() {
        let nested = Some(Some(Box::new(7u8)));
        assert!(matches!(nested.as_value().extract(), Value::UInt(7)));

        let absent: Option<Option<u8>> = Some(None);
        assert!(matches!(absent.as_value().extract(), Value::Optional(None)));
    }

    #[test]
    fn text_rendering() {
        assert_eq!("neko".as_value().to_text(), "neko");
        assert_eq!(200i32.as_value().to_text(), "200");
        assert_eq!(1.5f64.as_value().to_text(), "1.5");
        assert_eq!(true.as_value().to_text(), "true");
        assert_eq!(vec![1, 2].as_value().to_text(), "<Array>");
        assert_eq!(BTreeMap::<String, i32>::new().as_value().to_text(), "<Map>");
        assert_eq!(None::<i32>.as_value().to_text(), "<nil>");
    }

    #[test]
    fn struct_renders_as_type_name() {
        let p = Point { x: 1, y: 2 };
        assert_eq!(p.as_value().to_text(), "Point");
    }

    #[test]
    fn short_text_truncates_on_char_boundary() {
        let long = "あ".repeat(40);
        let short = long.as_value().short_text();
        assert_eq!(short.chars().count(), SHORT_TEXT_LIMIT + 3);
        assert!(short.ends_with("..."));

        let exact = "a".repeat(SHORT_TEXT_LIMIT);
        assert_eq!(exact.as_value().short_text(), exact);
    }

    #[test]
    fn descriptor_tag_lookup() {
        assert_eq!(POINT_FIELDS[0].tag("valid"), "required");
        assert_eq!(POINT_FIELDS[0].tag("other"), "");
        assert_eq!(POINT_FIELDS[1].tag("valid"), "");
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_values_map_onto_kinds() {
        let doc = serde_json::json!({"a": [1, "x", null], "b": -2, "c": 1.5});
        let Value::Mapping(entries) = doc.as_value() else {
            panic!("object should be a mapping");
        };
        assert_eq!(entries.len(), 3);
        let kinds: Vec<_> = entries.iter().map(|(_, v)| v.as_value().kind()).collect();
        assert_eq!(kinds, vec![ValueKind::Sequence, ValueKind::Int, ValueKind::Float]);
    }
}
