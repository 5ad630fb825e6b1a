use log::{trace, warn};

use super::node::{Attributes, Node};
use super::scan::{Scanner, Tag};

/// Outcome of parsing the first element of a source.
///
/// `skipped` and `all` are views into the parsed source: `all` is exactly
/// the text consumed, so `&source[result.all.len()..]` is what follows the
/// element.
#[derive(Debug, PartialEq)]
pub struct ParseResult<'a> {
    /// Text before the element's opening tag.
    pub skipped: &'a str,
    /// The element, or a node with an empty name if none was found.
    pub node: Node,
    pub all: &'a str,
    /// The source ran out before the element was closed.
    pub is_eof: bool,
}

/// Opening tag of the element currently being read.
#[derive(Debug, Clone, Copy)]
struct Open<'a> {
    start: usize,
    name: &'a str,
    attribs: &'a str,
    content_start: usize,
}

/// Parser reads one element, then recurses on its content to build the
/// children.
///
/// Nesting is tracked by counting same-named tags opened inside the
/// element, not by matching every tag name, so mismatched markup that
/// balances that count is accepted as is.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    open: Option<Open<'a>>,
    // tags with our name opened inside our content and not yet closed.
    stack: usize,
    // off while re-reading the content of an element that already reported
    // running out of input.
    report_eof: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(source),
            open: None,
            stack: 0,
            report_eof: true,
        }
    }

    fn quiet(source: &'a str) -> Self {
        Parser {
            report_eof: false,
            ..Parser::new(source)
        }
    }

    pub fn parse(mut self) -> ParseResult<'a> {
        loop {
            let lt = self.scanner.position();
            match self.scanner.advance() {
                Some('<') => {}
                Some(_) => continue,
                None => {
                    if let (Some(open), true) = (self.open, self.report_eof) {
                        warn!("end of input before </{}>", open.name);
                    }
                    return self.finish(lt, true);
                }
            }
            if self.scanner.starts_with("!--") {
                if self.scanner.skip_past("-->").is_none() {
                    return self.truncated();
                }
                continue;
            }
            let body = match self.scanner.collect_until('>') {
                Some(body) => body,
                None => return self.truncated(),
            };
            match self.open {
                None => match Tag::classify(body) {
                    Tag::Open {
                        name,
                        attribs,
                        selfclosing: true,
                    } => return self.selfclosing(lt, name, attribs),
                    Tag::Open { name, attribs, .. } => {
                        trace!("opening <{}> at {}", name, lt);
                        self.open = Some(Open {
                            start: lt,
                            name,
                            attribs,
                            content_start: self.scanner.position(),
                        });
                    }
                    Tag::Declaration(decl) => trace!("skipping <{}>", decl),
                    // stray close tags and empty brackets are noise before the element.
                    Tag::Close { .. } | Tag::Empty => {}
                },
                Some(open) => match Tag::classify(body) {
                    Tag::Close { name } if name == open.name => {
                        if self.stack == 0 {
                            return self.finish(lt, false);
                        }
                        self.stack -= 1;
                    }
                    Tag::Open {
                        name,
                        selfclosing: false,
                        ..
                    } if name == open.name => self.stack += 1,
                    _ => {}
                },
            }
        }
    }

    // the source ran out in the middle of tag markup.
    fn truncated(self) -> ParseResult<'a> {
        if self.report_eof {
            match self.open {
                Some(open) => warn!("end of input inside a tag within <{}>", open.name),
                None => warn!("end of input inside a tag"),
            }
        }
        let end = self.scanner.source().len();
        self.finish(end, true)
    }

    fn selfclosing(self, lt: usize, name: &'a str, attribs: &'a str) -> ParseResult<'a> {
        let source = self.scanner.source();
        ParseResult {
            skipped: &source[..lt],
            node: Node::new(name, attribs, "", vec![], true),
            all: &source[..self.scanner.position()],
            is_eof: false,
        }
    }

    // content_end is where the element's content stops: the start of its
    // closing tag, or the end of the source.
    fn finish(self, content_end: usize, is_eof: bool) -> ParseResult<'a> {
        let source = self.scanner.source();
        let all = &source[..self.scanner.position()];
        let open = match self.open {
            Some(open) => open,
            None => {
                return ParseResult {
                    skipped: all,
                    node: Node::new("", Attributes::default(), "", vec![], true),
                    all,
                    is_eof,
                }
            }
        };
        let content = &source[open.content_start..content_end];
        let children: Vec<Node> = Siblings {
            rest: content,
            report_eof: self.report_eof && !is_eof,
        }
        .filter_map(ParseResult::element)
        .collect();
        let selfclosing = content.is_empty() && children.is_empty();
        ParseResult {
            skipped: &source[..open.start],
            node: Node::new(open.name, open.attribs, content, children, selfclosing),
            all,
            is_eof,
        }
    }
}

impl<'a> ParseResult<'a> {
    /// The node, unless no element was found.
    pub fn element(self) -> Option<Node> {
        if self.node.name().is_empty() {
            None
        } else {
            Some(self.node)
        }
    }
}

/// Siblings parses a source one element at a time, each result starting
/// where the previous one's `all` ended.
#[derive(Debug)]
pub struct Siblings<'a> {
    rest: &'a str,
    report_eof: bool,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = ParseResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let parser = if self.report_eof {
            Parser::new(self.rest)
        } else {
            Parser::quiet(self.rest)
        };
        let result = parser.parse();
        self.rest = &self.rest[result.all.len()..];
        Some(result)
    }
}

/// Parse the first element of `source`.
pub fn parse(source: &str) -> ParseResult<'_> {
    Parser::new(source).parse()
}

pub fn siblings(source: &str) -> Siblings<'_> {
    Siblings {
        rest: source,
        report_eof: true,
    }
}

/// Parse every top-level element of `source` in document order. Text
/// between elements is dropped.
pub fn parse_fragment(source: &str) -> Vec<Node> {
    siblings(source).filter_map(ParseResult::element).collect()
}
