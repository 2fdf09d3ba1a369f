pub mod convert;
pub mod print;
