//! A small recursive-descent parser for a restricted dialect of XML.
//!
//! ```
//! let result = xmltree::parse(r#"<a k="v"><b>x</b></a>"#);
//! assert_eq!("a", result.node.name());
//! assert_eq!(Some("v"), result.node.attr("k"));
//! assert_eq!("<b>x</b>", result.node.children()[0].dump());
//! ```
//!
//! No namespaces, CDATA, entity decoding or validation: text and attribute
//! values are kept exactly as written.

pub mod xml;

pub use xml::{parse, parse_fragment, siblings, Attributes, Node, ParseResult, Parser, Siblings};
