use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::iter::FromIterator;
use std::sync::LazyLock;

/// `key="value"` pairs. Keys may contain colons, values must be double quoted.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w:]+)\s*=\s*"([^"]*)""#).expect("attribute pattern is valid")
});

const TREE_INDENT: &str = "   ";
const DEBUG_INDENT: &str = "  ";

/// Attributes of an element, ordered by key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Extract every `key="value"` pair from a raw attribute list.
    /// Anything that does not match is ignored, so malformed input yields
    /// an empty or partial mapping. A repeated key keeps its last value.
    pub fn parse(raw: &str) -> Self {
        ATTRIBUTE
            .captures_iter(raw)
            .map(|cap| (cap[1].to_string(), cap[2].to_string()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&str> for Attributes {
    fn from(raw: &str) -> Self {
        Attributes::parse(raw)
    }
}

impl From<BTreeMap<String, String>> for Attributes {
    fn from(map: BTreeMap<String, String>) -> Self {
        Attributes(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Writes the list back out as `k="v" k2="v2"`.
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}=\"{}\"", k, v)?;
        }
        Ok(())
    }
}

/// One element of a parsed document. Nodes are immutable once built.
///
/// An empty `name` marks "no element found"; the parser uses it to drop
/// plain text from a children list.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    attribs: Attributes,
    text: String,
    children: Vec<Node>,
    selfclosing: bool,
}

impl Node {
    /// `attribs` is either a ready mapping or a raw `key="value" ...` list.
    pub fn new(
        name: impl Into<String>,
        attribs: impl Into<Attributes>,
        text: impl Into<String>,
        children: Vec<Node>,
        selfclosing: bool,
    ) -> Self {
        Node {
            name: name.into(),
            attribs: attribs.into(),
            text: text.into(),
            children,
            selfclosing,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribs(&self) -> &Attributes {
        &self.attribs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attribs.get(key)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_selfclosing(&self) -> bool {
        self.selfclosing
    }

    /// Serialize the element's own tag and text. For a parsed element the
    /// text is its raw content, markup included; `children` are not
    /// serialized, use [`Node::render_tree`] for that.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn open_tag(&self) -> String {
        let mut tag = format!("<{}", self.name);
        if !self.attribs.is_empty() {
            tag.push(' ');
            tag.push_str(&self.attribs.to_string());
        }
        if self.selfclosing {
            tag.push('/');
        }
        tag.push('>');
        tag
    }

    /// Render the subtree as markup, one child per line, each nesting level
    /// indented by three spaces. Leaf elements keep their text inline.
    pub fn render_tree(&self, depth: usize) -> String {
        let mut txt = self.open_tag();
        if self.children.is_empty() {
            txt.push_str(&self.text);
        } else {
            txt.push('\n');
            for child in &self.children {
                txt.push_str(&child.render_tree(depth + 1));
                txt.push('\n');
            }
        }
        if !self.selfclosing {
            txt.push_str(&format!("</{}>", self.name));
        }
        if depth == 0 {
            txt
        } else {
            indent(&txt, TREE_INDENT)
        }
    }

    /// Write [`Node::render_tree`] and a newline to `w`.
    pub fn write_tree<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", self.render_tree(0))
    }

    /// Write the tree to stdout.
    pub fn print_tree(&self) -> io::Result<()> {
        self.write_tree(&mut io::stdout().lock())
    }

    /// Verbose structural dump for debugging, indented two spaces per level.
    pub fn tree(&self, depth: usize) -> String {
        let mut lines = vec![
            "Node {".to_string(),
            format!("  name:        {}", self.name),
            format!("  attrs:       {:?}", self.attribs),
            format!("  selfclosing: {}", self.selfclosing),
            format!("  text:        {:?}", self.text),
        ];
        if self.children.is_empty() {
            lines.push("  children:    -".to_string());
        } else {
            lines.push("  children:".to_string());
            lines.extend(self.children.iter().map(|child| child.tree(1)));
        }
        lines.push("}".to_string());
        indent(&lines.join("\n"), &DEBUG_INDENT.repeat(depth))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.open_tag())?;
        if !self.selfclosing {
            write!(f, "{}</{}>", self.text, self.name)?;
        }
        Ok(())
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().cloned().collect()
    }

    fn leaf(name: &str, text: &str) -> Node {
        Node::new(name, "", text, vec![], false)
    }

    #[test]
    fn parse_attributes() {
        let tests = vec![
            ("single", r#"k="v""#, attrs(&[("k", "v")])),
            (
                "padding around pairs and equals",
                r#"  a = "1"   b="2" "#,
                attrs(&[("a", "1"), ("b", "2")]),
            ),
            (
                "colon in key",
                r#"xml:lang="en""#,
                attrs(&[("xml:lang", "en")]),
            ),
            ("empty value", r#"k="""#, attrs(&[("k", "")])),
            (
                "value keeps its spaces",
                r#"k=" spaced out ""#,
                attrs(&[("k", " spaced out ")]),
            ),
            ("repeated key, last wins", r#"a="1" a="2""#, attrs(&[("a", "2")])),
            ("unquoted value", "k=v", attrs(&[])),
            ("single quoted value", "k='v'", attrs(&[])),
            ("boolean attribute", "checked", attrs(&[])),
            (
                "partial, malformed pair skipped",
                r#"a=1 b="2""#,
                attrs(&[("b", "2")]),
            ),
            ("empty", "", attrs(&[])),
        ];
        for (desc, input, want) in tests {
            assert_eq!(want, Attributes::parse(input), "{}", desc);
        }
    }

    #[test]
    fn attributes_from_mapping() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), "v".to_string());
        let node = Node::new("a", map, "", vec![], true);
        assert_eq!(Some("v"), node.attr("k"));
        assert_eq!(None, node.attr("missing"));
        assert_eq!(1, node.attribs().len());
    }

    #[test]
    fn dump() {
        let tests = vec![
            (
                "self closing with attributes",
                Node::new("a", r#"k="v""#, "", vec![], true),
                r#"<a k="v"/>"#,
            ),
            ("text", leaf("a", "hello"), "<a>hello</a>"),
            ("empty text keeps close tag", leaf("a", ""), "<a></a>"),
            (
                "attributes ordered by key",
                Node::new("a", r#"z="1" b="2""#, "t", vec![], false),
                r#"<a b="2" z="1">t</a>"#,
            ),
            (
                "children are not written",
                Node::new("a", "", "", vec![leaf("b", "x")], false),
                "<a></a>",
            ),
        ];
        for (desc, node, want) in tests {
            assert_eq!(want, node.dump(), "{}", desc);
        }
    }

    #[test]
    fn render_tree() {
        let tests = vec![
            ("leaf", leaf("a", "hello"), "<a>hello</a>"),
            (
                "self closing",
                Node::new("a", r#"k="v""#, "", vec![], true),
                r#"<a k="v"/>"#,
            ),
            (
                "children",
                Node::new(
                    "a",
                    "",
                    "",
                    vec![leaf("b", "x"), Node::new("c", r#"k="v""#, "", vec![], true)],
                    false,
                ),
                "<a>\n   <b>x</b>\n   <c k=\"v\"/>\n</a>",
            ),
            (
                "nested",
                Node::new(
                    "a",
                    "",
                    "",
                    vec![Node::new("b", "", "", vec![leaf("c", "y")], false)],
                    false,
                ),
                "<a>\n   <b>\n      <c>y</c>\n   </b>\n</a>",
            ),
        ];
        for (desc, node, want) in tests {
            assert_eq!(want, node.render_tree(0), "{}", desc);
        }
    }

    #[test]
    fn render_tree_indents_below_top_level() {
        assert_eq!("   <b>x</b>", leaf("b", "x").render_tree(1));
    }

    #[test]
    fn write_tree() {
        let node = Node::new("a", "", "", vec![leaf("b", "x")], false);
        let mut out = vec![];
        node.write_tree(&mut out).unwrap();
        assert_eq!("<a>\n   <b>x</b>\n</a>\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn tree() {
        let node = Node::new("a", r#"k="v""#, "hi", vec![], false);
        let want = r#"Node {
  name:        a
  attrs:       {"k": "v"}
  selfclosing: false
  text:        "hi"
  children:    -
}"#;
        assert_eq!(want, node.tree(0));
    }

    #[test]
    fn tree_with_children() {
        let node = Node::new("r", "", "", vec![leaf("b", "x")], false);
        let want = r#"Node {
  name:        r
  attrs:       {}
  selfclosing: false
  text:        ""
  children:
  Node {
    name:        b
    attrs:       {}
    selfclosing: false
    text:        "x"
    children:    -
  }
}"#;
        assert_eq!(want, node.tree(0));
    }

    #[test]
    fn tree_at_depth() {
        let node = Node::new("a", "", "", vec![], true);
        let want = "    Node {\n      name:        a\n      attrs:       {}\n      selfclosing: true\n      text:        \"\"\n      children:    -\n    }";
        assert_eq!(want, node.tree(2));
    }
}
