pub mod node;
pub mod parse;
pub mod scan;

pub use node::{Attributes, Node};
pub use parse::{parse, parse_fragment, siblings, ParseResult, Parser, Siblings};
pub use scan::{Scanner, Tag};
