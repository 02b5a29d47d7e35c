//! Generic XML tree primitives: parsing, writing and slash-path addressing.

pub mod parser;
pub mod path;
pub mod tree;
pub mod writer;

pub use parser::{parse, ParseError};
pub use path::{ElementPath, PathError};
pub use tree::XmlNode;
pub use writer::{write, write_string, WriteError};
