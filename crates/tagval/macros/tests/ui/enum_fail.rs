#![allow(dead_code)]

use nebula_tagval::Validatable;

#[derive(Validatable)]
enum Kind {
    Cat,
}

fn main() {}
