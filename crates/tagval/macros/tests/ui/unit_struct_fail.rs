#![allow(dead_code)]

use nebula_tagval::Validatable;

#[derive(Validatable)]
struct Unit;

fn main() {}
