/// Scanner is a forward-only cursor over an in-memory source.
/// Every read returns `None` once the source is exhausted; the cursor is
/// then left at the end of the source.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner { source, pos: 0 }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset of the next unread char.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    // advance past the current char and return it.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    // peek the next char without advancing to it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn starts_with(&self, needle: &str) -> bool {
        self.rest().starts_with(needle)
    }

    // collect chars until the needle is found.
    // The slice will not include the needle, the cursor is left past it.
    pub fn collect_until(&mut self, needle: char) -> Option<&'a str> {
        let start = self.pos;
        while let Some(c) = self.advance() {
            if c == needle {
                return Some(&self.source[start..self.pos - c.len_utf8()]);
            }
        }
        None
    }

    // skip everything up to and including the needle.
    // The slice will contain the needle.
    pub fn skip_past(&mut self, needle: &str) -> Option<&'a str> {
        let start = self.pos;
        match self.rest().find(needle) {
            Some(idx) => {
                self.pos += idx + needle.len();
                Some(&self.source[start..self.pos])
            }
            None => {
                self.pos = self.source.len();
                None
            }
        }
    }
}

/// Tag is the meaning of the markup found between `<` and `>`.
#[derive(Debug, PartialEq)]
pub enum Tag<'a> {
    /// `<name attribs>` or `<name attribs/>`.
    Open {
        name: &'a str,
        attribs: &'a str,
        selfclosing: bool,
    },
    /// `</name>`
    Close { name: &'a str },
    /// `<?xml ...?>`, `<!DOCTYPE ...>` and friends.
    Declaration(&'a str),
    /// `<>`
    Empty,
}

impl<'a> Tag<'a> {
    /// Classify a tag body, the text between `<` and `>` exclusive.
    pub fn classify(body: &'a str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            return Tag::Empty;
        }
        if let Some(name) = body.strip_prefix('/') {
            return Tag::Close { name: name.trim() };
        }
        if body.starts_with('?') || body.starts_with('!') {
            return Tag::Declaration(body);
        }
        let (body, selfclosing) = match body.strip_suffix('/') {
            Some(body) => (body.trim_end(), true),
            None => (body, false),
        };
        let (name, attribs) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], body[idx..].trim()),
            None => (body, ""),
        };
        Tag::Open {
            name,
            attribs,
            selfclosing,
        }
    }
}
