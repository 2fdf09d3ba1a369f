pub mod date_parser;
pub mod document;
pub mod mapper;
pub mod string_safety;
pub mod tags;

pub use document::{Element, LoadError, XmlDocument, XmlParseError};
pub use mapper::{MapError, ResultMapper};
