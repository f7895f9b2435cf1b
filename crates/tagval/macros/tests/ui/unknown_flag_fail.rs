#![allow(dead_code)]

use nebula_tagval::Validatable;

#[derive(Validatable)]
struct Cat {
    #[tag(valid = "required", optional)]
    pub name: String,
}

fn main() {}
