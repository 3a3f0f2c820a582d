//! The parse table row

use crate::language::Kind;

/// Row identifier. Positive for real rows; a negative `parent` marks a
/// comment attached to the top-level expression whose id it negates, and a
/// parent of 0 marks a top-level row.
pub type Id = i32;

/// How a token's indentation is derived when it starts a line. Written only
/// by indention rules; resolved by the serializer against the position the
/// referenced token was emitted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentRef {
    /// Base indentation.
    Own,
    /// One indent step beyond the line holding the referenced token.
    Inside(Id),
    /// Same indentation as the line holding the referenced token.
    Beside(Id),
    /// One column past the end of the referenced token itself.
    After(Id),
}

/// Whitespace and spelling captured for a token inside an ignore region
/// before any rule runs, and restored before serialization.
#[derive(Debug, Clone)]
pub struct Hold {
    pub lag_newlines: u32,
    pub lag_spaces: u32,
    pub spaces: u32,
    pub text: String,
}

/// One row of the parse table. The flat table is a `Vec<Token>` with empty
/// `children`; the nester moves every row with a positive parent into the
/// `children` vector of its parent row.
#[derive(Debug, Clone)]
pub struct Token {
    // identity, assigned by the host parser
    pub id: Id,
    pub parent: Id,

    // source span, 1-based, inclusive
    pub line1: u32,
    pub col1: u32,
    pub line2: u32,
    pub col2: u32,

    pub kind: Kind,
    pub text: String,
    pub terminal: bool,

    // derived columns, attached by the pipeline
    pub pos_id: u32,
    pub kind_before: Option<Kind>,
    pub kind_after: Option<Kind>,
    pub lag_newlines: u32,
    pub newlines: u32,
    pub spaces: u32,
    pub lag_spaces: u32,
    pub multi_line: bool,
    pub indent_ref: IndentRef,
    pub block: u32,
    pub is_cached: bool,
    pub verbatim: bool,
    pub held: Option<Hold>,

    pub children: Vec<Token>,
}

impl Token {
    pub fn new(kind: Kind, text: impl Into<String>) -> Token {
        Token {
            id: 0,
            parent: 0,
            line1: 0,
            col1: 0,
            line2: 0,
            col2: 0,
            kind,
            text: text.into(),
            terminal: true,
            pos_id: 0,
            kind_before: None,
            kind_after: None,
            lag_newlines: 0,
            newlines: 0,
            spaces: 0,
            lag_spaces: 0,
            multi_line: false,
            indent_ref: IndentRef::Own,
            block: 0,
            is_cached: false,
            verbatim: false,
            held: None,
            children: Vec::new(),
        }
    }

    /// A non-terminal expression row spanning the given children.
    pub fn nest_of(children: Vec<Token>) -> Token {
        let mut token = Token::new(Kind::Expr, "");
        token.terminal = false;
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            token.line1 = first.line1;
            token.col1 = first.col1;
            token.line2 = last.line2;
            token.col2 = last.col2;
        }
        token.children = children;
        token
    }

    pub fn with_span(mut self, line1: u32, col1: u32, line2: u32, col2: u32) -> Token {
        self.line1 = line1;
        self.col1 = col1;
        self.line2 = line2;
        self.col2 = col2;
        self
    }

    /// The span of this row covers more than one source line.
    pub fn spans_multiple_lines(&self) -> bool {
        self.line2 > self.line1
    }

    /// First terminal in this subtree, in source order.
    pub fn first_terminal(&self) -> Option<&Token> {
        if self.terminal {
            return Some(self);
        }
        self.children
            .first()
            .and_then(|child| child.first_terminal())
    }

    /// Id of the first terminal in this subtree.
    pub fn first_terminal_id(&self) -> Option<Id> {
        self.first_terminal()
            .map(|token| token.id)
    }
}

/// Ordering used whenever rows are laid out in source-output order: wider
/// spans sort before the rows they contain, parents before children.
pub fn row_order(a: &Token, b: &Token) -> std::cmp::Ordering {
    a.line1
        .cmp(&b.line1)
        .then(a.col1.cmp(&b.col1))
        .then(b.line2.cmp(&a.line2))
        .then(b.col2.cmp(&a.col2))
        .then(a.terminal.cmp(&b.terminal))
}

/// Extract the text covered by a 1-based inclusive span. Used to recover
/// the spelling of a cached expression and to splice ignore regions.
pub fn slice_span(source: &str, line1: u32, col1: u32, line2: u32, col2: u32) -> String {
    let mut out = String::new();
    for (i, line) in source
        .lines()
        .enumerate()
    {
        let lineno = i as u32 + 1;
        if lineno < line1 || lineno > line2 {
            continue;
        }
        let chars: Vec<char> = line
            .chars()
            .collect();
        let from = if lineno == line1 { col1 as usize - 1 } else { 0 };
        let to = if lineno == line2 {
            (col2 as usize).min(chars.len())
        } else {
            chars.len()
        };
        if lineno > line1 {
            out.push('\n');
        }
        if from < to {
            out.extend(&chars[from..to]);
        }
    }
    out
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn span_extraction() {
        let source = "first line\nsecond line\nthird";
        assert_eq!(slice_span(source, 1, 1, 1, 5), "first");
        assert_eq!(slice_span(source, 2, 8, 2, 11), "line");
        assert_eq!(slice_span(source, 2, 1, 3, 5), "second line\nthird");
    }

    #[test]
    fn ordering_puts_parents_first() {
        let parent = Token::nest_of(vec![]).with_span(1, 1, 2, 5);
        let child = Token::new(Kind::Symbol, "x").with_span(1, 1, 1, 1);
        assert_eq!(row_order(&parent, &child), std::cmp::Ordering::Less);
    }

    #[test]
    fn first_terminal_descends() {
        let inner = Token::new(Kind::Symbol, "a").with_span(1, 1, 1, 1);
        let nest = Token::nest_of(vec![Token::nest_of(vec![inner])]);
        assert_eq!(
            nest.first_terminal()
                .map(|t| t.text.as_str()),
            Some("a")
        );
    }
}
