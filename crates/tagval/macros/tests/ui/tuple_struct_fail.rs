#![allow(dead_code)]

use nebula_tagval::Validatable;

#[derive(Validatable)]
struct Tuple(String);

fn main() {}
