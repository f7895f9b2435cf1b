//! Basic usage example for nebula-tagval
//!
//! Run with `RUST_LOG=nebula_tagval=debug` to see the caches being filled.

use nebula_tagval::funcs::func;
use nebula_tagval::{Validatable, Validator, ValidatorError};
use tracing_subscriber::EnvFilter;

#[derive(Validatable)]
struct User {
    #[tag(valid = "required,alphanum", rename = "Name")]
    pub name: String,
    #[tag(valid = "required,len(0|116)", rename = "Age")]
    pub age: u32,
    #[tag(valid = "optional,email", rename = "Email")]
    pub email: String,
}

#[derive(Validatable)]
struct Content {
    #[tag(valid = "contentType(image/jpeg|image/png|image/gif)", rename = "Type")]
    pub kind: String,
}

#[derive(Validatable)]
struct Account {
    #[tag(valid = "or(alpha|numeric)", rename = "ID")]
    pub id: String,
}

fn report(label: &str, value: &dyn Validatable, validator: &Validator) -> Result<(), ValidatorError> {
    let errors = validator.validate_struct(value)?;
    if errors.is_empty() {
        println!("✓ {label}");
    } else {
        println!("✗ {label}: {errors}");
    }
    Ok(())
}

fn main() -> Result<(), ValidatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let validator = Validator::builder()
        .func(
            "contentType",
            func(|field, option| {
                let text = field.text();
                Ok(option.params().iter().any(|param| *param == text))
            }),
        )
        .build();

    let gopher = User {
        name: "gopher".into(),
        age: 9,
        email: String::new(),
    };
    report("gopher", &gopher, &validator)?;

    let broken = User {
        name: "_".into(),
        age: 200,
        email: "invalid".into(),
    };
    report("broken user", &broken, &validator)?;

    for kind in ["image/jpeg", "image/bmp"] {
        let content = Content { kind: kind.into() };
        report(kind, &content, &validator)?;
    }

    for id in ["abc", "123", "abc123"] {
        let account = Account { id: id.into() };
        report(id, &account, &validator)?;
    }

    let errors = validator.validate_value(&vec!["tama", ""], "min(1) ; required")?;
    println!("pets: {errors}");

    Ok(())
}
