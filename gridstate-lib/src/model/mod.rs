//! Row and value models

mod row;
mod value;

pub use row::*;
pub use value::*;
