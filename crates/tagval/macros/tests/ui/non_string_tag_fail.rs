#![allow(dead_code)]

use nebula_tagval::Validatable;

#[derive(Validatable)]
struct Cat {
    #[tag(valid = 3)]
    pub name: String,
}

fn main() {}
