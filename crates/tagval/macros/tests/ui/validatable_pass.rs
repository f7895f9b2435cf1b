//! Tests for the Validatable derive macro - successful cases.

use std::collections::BTreeMap;

use nebula_tagval::foundation::{Validatable, Value};

/// Plain struct with renames and several tag keys.
#[derive(nebula_tagval::Validatable)]
pub struct Cat {
    #[tag(valid = "required,alpha", check = "min(1)", rename = "Name")]
    pub name: String,
    #[tag(valid = "optional,max(30)")]
    pub age: Option<u8>,
    #[tag(valid = "-")]
    pub nickname: String,
    pub r#type: String,
}

/// Nested values, collections and a skipped field of a foreign type.
#[derive(nebula_tagval::Validatable)]
pub struct Owner {
    #[tag(valid = "min(1) ; required")]
    pub cats: Vec<Cat>,
    #[tag(valid = "; required")]
    pub notes: BTreeMap<String, String>,
    #[tag(skip)]
    pub lock: std::sync::Mutex<()>,
    private: u32,
}

/// Generic struct; field types are bounded on the impl.
#[derive(nebula_tagval::Validatable)]
pub struct Wrapper<T> {
    #[tag(valid = "required")]
    pub inner: T,
}

/// Empty struct.
#[derive(nebula_tagval::Validatable)]
pub struct Marker {}

fn main() {
    let owner = Owner {
        cats: vec![Cat {
            name: "tama".into(),
            age: Some(3),
            nickname: String::new(),
            r#type: "house".into(),
        }],
        notes: BTreeMap::new(),
        lock: std::sync::Mutex::new(()),
        private: 0,
    };
    let Value::Struct(value) = owner.as_value() else {
        panic!("expected a struct");
    };
    assert_eq!(value.type_name(), "Owner");
    assert_eq!(value.fields().len(), 3);
    assert!(!value.fields()[2].exported);
    let _ = owner.private;

    let Value::Struct(cat) = owner.cats[0].as_value() else {
        panic!("expected a struct");
    };
    assert_eq!(cat.fields()[0].name, "Name");
    assert_eq!(cat.fields()[0].tag("check"), "min(1)");
    assert_eq!(cat.fields()[3].name, "type");

    let wrapped = Wrapper { inner: 5u32 };
    assert!(matches!(wrapped.as_value(), Value::Struct(_)));
    assert!(Marker {}.as_value().is_empty());
}
