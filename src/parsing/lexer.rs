//! Lexer for the R-flavoured surface syntax
//!
//! Produces spanned terminals only; pairing tokens into expressions is the
//! parser's job. Spans are 1-based and inclusive on both ends, matching the
//! parse table convention.

use crate::language::Kind;
use crate::problem::{Location, ParseProblem, StyleError};

#[derive(Debug, Clone)]
pub struct Lexeme {
    pub kind: Kind,
    pub text: String,
    pub line1: u32,
    pub col1: u32,
    pub line2: u32,
    pub col2: u32,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

pub fn lex(source: &str) -> Result<Vec<Lexeme>, StyleError> {
    let mut lexer = Lexer {
        chars: source
            .chars()
            .collect(),
        pos: 0,
        line: 1,
        col: 1,
    };
    lexer.run()
}

impl Lexer {
    fn run(&mut self) -> Result<Vec<Lexeme>, StyleError> {
        let mut lexemes = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '#' => lexemes.push(self.take_comment()),
                '"' | '\'' => lexemes.push(self.take_string(c)?),
                '`' => lexemes.push(self.take_backquoted()?),
                '%' => lexemes.push(self.take_special()?),
                c if c.is_ascii_digit() => lexemes.push(self.take_number()),
                '.' => {
                    // A dot starts a number when followed by a digit,
                    // otherwise a symbol like `.x` or `...`.
                    if self
                        .peek_at(1)
                        .is_some_and(|c| c.is_ascii_digit())
                    {
                        lexemes.push(self.take_number());
                    } else {
                        lexemes.push(self.take_word());
                    }
                }
                c if c.is_alphabetic() => lexemes.push(self.take_word()),
                _ => lexemes.push(self.take_operator()?),
            }
        }

        Ok(lexemes)
    }

    fn peek(&self) -> Option<char> {
        self.chars
            .get(self.pos)
            .copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars
            .get(self.pos + ahead)
            .copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn here(&self) -> Location {
        Location {
            line: self.line,
            col: self.col,
        }
    }

    fn fail(&self, problem: impl Into<String>) -> StyleError {
        StyleError::Parse(ParseProblem {
            location: self.here(),
            problem: problem.into(),
        })
    }

    /// Build a lexeme from a span that started at the given position. The
    /// end columns are those of the last consumed character.
    fn emit(&self, kind: Kind, text: String, line1: u32, col1: u32) -> Lexeme {
        let (line2, col2) = if self.col > 1 {
            (self.line, self.col - 1)
        } else {
            // The last consumed character was a newline; that cannot happen
            // for any token we emit, but keep the span well-formed.
            (self.line - 1, 1)
        };
        Lexeme {
            kind,
            text,
            line1,
            col1,
            line2,
            col2,
        }
    }

    fn take_comment(&mut self) -> Lexeme {
        let (line1, col1) = (self.line, self.col);
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        let text = text
            .trim_end()
            .to_string();
        Lexeme {
            kind: Kind::Comment,
            text: text.clone(),
            line1,
            col1,
            line2: line1,
            col2: col1 + text.chars().count() as u32 - 1,
        }
    }

    fn take_string(&mut self, quote: char) -> Result<Lexeme, StyleError> {
        let (line1, col1) = (self.line, self.col);
        let mut text = String::new();
        text.push(
            self.bump()
                .unwrap(),
        );
        loop {
            let Some(c) = self.bump() else {
                return Err(self.fail("unterminated string constant"));
            };
            text.push(c);
            if c == '\\' {
                let Some(escaped) = self.bump() else {
                    return Err(self.fail("unterminated string constant"));
                };
                text.push(escaped);
            } else if c == quote {
                break;
            }
        }
        Ok(self.emit(Kind::StrConst, text, line1, col1))
    }

    fn take_backquoted(&mut self) -> Result<Lexeme, StyleError> {
        let (line1, col1) = (self.line, self.col);
        let mut text = String::new();
        text.push(
            self.bump()
                .unwrap(),
        );
        loop {
            let Some(c) = self.bump() else {
                return Err(self.fail("unterminated backquoted name"));
            };
            text.push(c);
            if c == '`' {
                break;
            }
        }
        Ok(self.emit(Kind::Symbol, text, line1, col1))
    }

    fn take_special(&mut self) -> Result<Lexeme, StyleError> {
        let (line1, col1) = (self.line, self.col);
        let mut text = String::new();
        text.push(
            self.bump()
                .unwrap(),
        );
        loop {
            let Some(c) = self.bump() else {
                return Err(self.fail("unterminated %...% operator"));
            };
            if c == '\n' {
                return Err(self.fail("unterminated %...% operator"));
            }
            text.push(c);
            if c == '%' {
                break;
            }
        }
        Ok(self.emit(Kind::Special, text, line1, col1))
    }

    fn take_number(&mut self) -> Lexeme {
        let (line1, col1) = (self.line, self.col);
        let mut text = String::new();

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            text.push(self.bump().unwrap());
            text.push(self.bump().unwrap());
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_hexdigit())
            {
                text.push(self.bump().unwrap());
            }
        } else {
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_digit())
            {
                text.push(self.bump().unwrap());
            }
            if self.peek() == Some('.') {
                text.push(self.bump().unwrap());
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_digit())
                {
                    text.push(self.bump().unwrap());
                }
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let mut ahead = 1;
                if matches!(self.peek_at(1), Some('+') | Some('-')) {
                    ahead = 2;
                }
                if self
                    .peek_at(ahead)
                    .is_some_and(|c| c.is_ascii_digit())
                {
                    for _ in 0..ahead {
                        text.push(self.bump().unwrap());
                    }
                    while self
                        .peek()
                        .is_some_and(|c| c.is_ascii_digit())
                    {
                        text.push(self.bump().unwrap());
                    }
                }
            }
        }

        // integer and imaginary suffixes
        if matches!(self.peek(), Some('L') | Some('i')) {
            text.push(self.bump().unwrap());
        }

        self.emit(Kind::NumConst, text, line1, col1)
    }

    fn take_word(&mut self) -> Lexeme {
        let (line1, col1) = (self.line, self.col);
        let mut text = String::new();
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '_')
        {
            text.push(self.bump().unwrap());
        }

        let kind = match text.as_str() {
            "if" => Kind::If,
            "else" => Kind::Else,
            "for" => Kind::For,
            "while" => Kind::While,
            "repeat" => Kind::Repeat,
            "function" => Kind::Function,
            "in" => Kind::In,
            "break" => Kind::Break,
            "next" => Kind::Next,
            "NULL" => Kind::Null,
            "TRUE" | "FALSE" | "NA" | "NA_integer_" | "NA_real_" | "NA_character_" | "Inf"
            | "NaN" => Kind::NumConst,
            _ => Kind::Symbol,
        };

        self.emit(kind, text, line1, col1)
    }

    fn take_operator(&mut self) -> Result<Lexeme, StyleError> {
        let (line1, col1) = (self.line, self.col);
        let c = self
            .bump()
            .unwrap();

        let (kind, text) = match c {
            '(' => (Kind::LeftParen, "(".to_string()),
            ')' => (Kind::RightParen, ")".to_string()),
            '{' => (Kind::LeftBrace, "{".to_string()),
            '}' => (Kind::RightBrace, "}".to_string()),
            ']' => (Kind::RightBracket, "]".to_string()),
            ',' => (Kind::Comma, ",".to_string()),
            ';' => (Kind::Semicolon, ";".to_string()),
            '$' => (Kind::Dollar, "$".to_string()),
            '@' => (Kind::At, "@".to_string()),
            '+' => (Kind::Plus, "+".to_string()),
            '*' => (Kind::Star, "*".to_string()),
            '/' => (Kind::Slash, "/".to_string()),
            '^' => (Kind::Caret, "^".to_string()),
            '~' => (Kind::Tilde, "~".to_string()),
            '?' => (Kind::Help, "?".to_string()),
            '\\' => (Kind::Function, "\\".to_string()),
            '[' => {
                if self.peek() == Some('[') {
                    self.bump();
                    (Kind::LeftBracket2, "[[".to_string())
                } else {
                    (Kind::LeftBracket, "[".to_string())
                }
            }
            '-' => {
                if self.peek() == Some('>') {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        (Kind::RightAssign, "->>".to_string())
                    } else {
                        (Kind::RightAssign, "->".to_string())
                    }
                } else {
                    (Kind::Minus, "-".to_string())
                }
            }
            '<' => {
                if self.peek() == Some('-') {
                    self.bump();
                    (Kind::LeftAssign, "<-".to_string())
                } else if self.peek() == Some('<') && self.peek_at(1) == Some('-') {
                    self.bump();
                    self.bump();
                    (Kind::LeftAssign, "<<-".to_string())
                } else if self.peek() == Some('=') {
                    self.bump();
                    (Kind::Le, "<=".to_string())
                } else {
                    (Kind::Lt, "<".to_string())
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.bump();
                    (Kind::Ge, ">=".to_string())
                } else {
                    (Kind::Gt, ">".to_string())
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.bump();
                    (Kind::Eq2, "==".to_string())
                } else {
                    (Kind::EqAssign, "=".to_string())
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.bump();
                    (Kind::Ne, "!=".to_string())
                } else {
                    (Kind::Bang, "!".to_string())
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.bump();
                    (Kind::And2, "&&".to_string())
                } else {
                    (Kind::And, "&".to_string())
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.bump();
                    (Kind::Or2, "||".to_string())
                } else if self.peek() == Some('>') {
                    self.bump();
                    (Kind::Pipe, "|>".to_string())
                } else {
                    (Kind::Or, "|".to_string())
                }
            }
            ':' => {
                if self.peek() == Some(':') {
                    self.bump();
                    if self.peek() == Some(':') {
                        self.bump();
                        (Kind::NamespaceGet, ":::".to_string())
                    } else {
                        (Kind::NamespaceGet, "::".to_string())
                    }
                } else {
                    (Kind::Colon, ":".to_string())
                }
            }
            other => {
                return Err(StyleError::Parse(ParseProblem {
                    location: Location {
                        line: line1,
                        col: col1,
                    },
                    problem: format!("unexpected character '{}'", other),
                }))
            }
        };

        Ok(self.emit(kind, text, line1, col1))
    }
}
