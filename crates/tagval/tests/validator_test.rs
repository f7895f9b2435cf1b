use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nebula_tagval::foundation::ValidationContextBuilder;
use nebula_tagval::funcs::{adapter, func};
use nebula_tagval::{
    PredicateError, Validatable, ValidationContext, Validator, ValidatorConfig, validate_value,
    validate_struct_with_context, validate_value_with_context,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[derive(Validatable)]
struct Account {
    #[tag(valid = "required,alphanum", check = "min(3)", rename = "Name")]
    pub name: String,
    #[tag(valid = "optional,email", rename = "Email")]
    pub email: String,
}

fn account(name: &str, email: &str) -> Account {
    Account {
        name: name.into(),
        email: email.into(),
    }
}

#[test]
fn value_entry_point_uses_default_validator() {
    assert!(validate_value(&"test", "req").unwrap().is_empty());

    let context = ValidationContext::new();
    let errors = nebula_tagval::default_validator()
        .validate_value_with_context(&context, &"", "req")
        .unwrap();
    assert_eq!(errors.to_string(), ": '' does validate as 'req'");
}

#[test]
fn struct_entry_point_with_context() {
    let validator = Validator::new();
    let context = ValidationContext::new();
    let errors = validator
        .validate_struct_with_context(&context, &account("neko", ""))
        .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn default_validator_entry_points_with_context() {
    let mut context = ValidationContext::new();
    context.insert("tenant", "acme".to_owned());

    let errors = validate_struct_with_context(&context, &account("ne-ko", "")).unwrap();
    assert_eq!(errors.to_string(), "Name: 'ne-ko' does validate as 'alphanum'");

    let errors = validate_value_with_context(&context, &"", "required").unwrap();
    assert_eq!(errors.to_string(), ": '' does validate as 'required'");
    assert!(validate_value_with_context(&context, &"neko", "required").unwrap().is_empty());
}

/// A validator whose `count` rule always fails and counts its calls.
fn counting_validator() -> (Validator, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let validator = Validator::builder()
        .func(
            "count",
            func(move |_, _| {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(false)
            }),
        )
        .build();
    (validator, calls)
}

#[rstest]
#[case::empty_sequence(Box::new(Vec::<String>::new()))]
#[case::absent_sequence(Box::new(None::<Vec<String>>))]
#[case::empty_mapping(Box::new(BTreeMap::<String, String>::new()))]
#[case::empty_text(Box::new(String::new()))]
#[case::zero(Box::new(0u32))]
fn optional_skips_every_level(#[case] value: Box<dyn Validatable>) {
    let (validator, calls) = counting_validator();
    let errors = validator
        .validate_value(value.as_ref(), "optional,count ; count")
        .unwrap();
    assert!(errors.is_empty());
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn optional_runs_both_levels_when_present() {
    let (validator, calls) = counting_validator();
    let errors = validator
        .validate_value(&vec!["a"], "optional,count ; count")
        .unwrap();
    assert_eq!(
        errors.to_string(),
        ": '<Array>' does validate as 'count';[0]: 'a' does validate as 'count'"
    );
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn element_rules_dig_into_each_index() {
    let errors = validate_value(&vec!["a", "", "c"], "len(3); required,alpha").unwrap();
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "[1]: '' does validate as 'required'".to_owned(),
            "[1]: '' does validate as 'alpha'".to_owned(),
        ]
    );
}

#[test]
fn failing_custom_rule_reports_its_error() {
    let validator = Validator::builder()
        .func(
            "test",
            func(|_, _| Err(PredicateError::custom("set func failure"))),
        )
        .build();

    let errors = validator.validate_value(&"", "test").unwrap();
    assert_eq!(
        errors.to_string(),
        ": an internal error occurred in 'test': set func failure"
    );

    let error = &errors.as_slice()[0];
    assert_eq!(error.path(), "");
    assert_eq!(error.tag().name(), "test");
    assert_eq!(
        error.predicate_error(),
        Some(&PredicateError::custom("set func failure"))
    );
}

#[test]
fn adapters_run_in_registration_order() {
    let trace = Arc::new(Mutex::new(String::new()));
    let mut builder = Validator::builder();
    for mark in ['1', '2', '3'] {
        let trace = Arc::clone(&trace);
        builder = builder.adapter(adapter(move |inner| {
            let trace = Arc::clone(&trace);
            func(move |field, option| {
                trace.lock().unwrap().push(mark);
                inner(field, option)
            })
        }));
    }
    let validator = builder.build();

    assert!(validator.validate_value(&"test", "req").unwrap().is_empty());
    assert_eq!(*trace.lock().unwrap(), "123");
}

#[test]
fn adapters_wrap_rules_registered_later() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut validator = Validator::builder()
        .adapter(adapter(move |inner| {
            let counter = Arc::clone(&counter);
            func(move |field, option| {
                counter.fetch_add(1, Ordering::Relaxed);
                inner(field, option)
            })
        }))
        .build();
    validator.register_func("always", func(|_, _| Ok(true)));

    validator.validate_value(&"x", "always,required").unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn rules_read_params_and_context() {
    let validator = Validator::builder()
        .func(
            "one_of_tenant",
            func(|field, option| {
                let Some(allowed) = option.context().get::<Vec<String>>("tenants") else {
                    return Err(PredicateError::custom("no tenants in context"));
                };
                let prefix = option.param(0).unwrap_or_default();
                let text = field.text();
                Ok(allowed
                    .iter()
                    .any(|tenant| text == format!("{prefix}{tenant}")))
            }),
        )
        .build();

    let context = ValidationContextBuilder::new()
        .with("tenants", vec!["acme".to_owned(), "globex".to_owned()])
        .build();

    let ok = validator
        .validate_value_with_context(&context, &"t-acme", "one_of_tenant(t-)")
        .unwrap();
    assert!(ok.is_empty());

    let miss = validator
        .validate_value_with_context(&context, &"t-initech", "one_of_tenant(t-)")
        .unwrap();
    assert_eq!(
        miss.to_string(),
        ": 't-initech' does validate as 'one_of_tenant(t-)'"
    );

    let no_context = validator.validate_value(&"t-acme", "one_of_tenant(t-)").unwrap();
    assert_eq!(
        no_context.to_string(),
        ": an internal error occurred in 'one_of_tenant(t-)': no tenants in context"
    );
}

#[test]
fn context_reaches_nested_or_alternatives() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let validator = Validator::builder()
        .func(
            "flagged",
            func(move |_, option| {
                if option.context().contains("flag") {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
                Ok(false)
            }),
        )
        .build();

    let mut context = ValidationContext::new();
    context.insert("flag", true);
    let errors = validator
        .validate_value_with_context(&context, &"abc", "flagged|numeric")
        .unwrap();

    assert_eq!(errors.to_string(), ": 'abc' does validate as 'or(flagged|numeric)'");
    assert_eq!(seen.load(Ordering::Relaxed), 1);
}

#[rstest]
#[case::first("abc", "")]
#[case::second("123", "")]
#[case::neither("a-1", ": 'a-1' does validate as 'or(alpha|numeric)'")]
fn or_groups(#[case] value: &str, #[case] expected: &str) {
    let errors = validate_value(&value, "alpha|numeric").unwrap();
    assert_eq!(errors.to_string(), expected);
}

#[test]
fn suppressed_values_stay_out_of_messages() {
    let validator = Validator::builder().suppress_field_value(true).build();
    let errors = validator
        .validate_struct(&account("ne-ko", "not-mail"))
        .unwrap();
    assert_eq!(
        errors.to_string(),
        "Name: The value does validate as 'alphanum';\
         Email: The value does validate as 'email'"
    );
    assert_eq!(errors.as_slice()[0].value(), "ne-ko");
}

#[test]
fn tag_key_selects_rules() {
    let validator = Validator::builder()
        .config(ValidatorConfig::new().with_tag_key("check"))
        .build();
    assert_eq!(validator.config().tag_key, "check");

    let errors = validator.validate_struct(&account("ne", "not-mail")).unwrap();
    assert_eq!(errors.to_string(), "Name: 'ne' does validate as 'min(3)'");

    let errors = Validator::new()
        .validate_struct(&account("ne", "not-mail"))
        .unwrap();
    assert_eq!(errors.to_string(), "Email: 'not-mail' does validate as 'email'");
}

#[test]
fn long_values_are_truncated_in_messages() {
    let long = "x".repeat(40);
    let errors = validate_value(&long, "numeric").unwrap();
    let expected = format!(": '{}...' does validate as 'numeric'", "x".repeat(32));
    assert_eq!(errors.to_string(), expected);
}

#[test]
fn rule_errors_keep_walking() {
    let errors = validate_value(&vec!["a", ""], "len(x) ; required").unwrap();
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            ": an internal error occurred in 'len(x)': invalid param `x`: invalid digit found in string"
                .to_owned(),
            "[1]: '' does validate as 'required'".to_owned(),
        ]
    );
}

#[test]
fn concurrent_calls_share_caches() {
    let validator = Validator::new();
    std::thread::scope(|scope| {
        for worker in 0..8 {
            let validator = &validator;
            scope.spawn(move || {
                for round in 0..50 {
                    let name = if (worker + round) % 2 == 0 { "neko" } else { "ne-ko" };
                    let errors = validator.validate_struct(&account(name, "")).unwrap();
                    assert_eq!(errors.len(), usize::from(name.contains('-')));
                }
            });
        }
    });

    let first = validator.parse_tag("required,alphanum").unwrap();
    let second = validator.parse_tag("required,alphanum").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[cfg(feature = "json")]
#[test]
fn json_documents() {
    let doc = serde_json::json!({ "tags": ["rust", ""], "count": 3 });
    let errors = validate_value(&doc, "required ; min(1) ; required").unwrap();
    assert_eq!(errors.to_string(), "[tags][1]: '' does validate as 'required'");

    let errors = validate_value(&doc["count"], "max(2)").unwrap();
    assert_eq!(errors.to_string(), ": '3' does validate as 'max(2)'");
}
