//! Parser for the R-flavoured surface syntax
//!
//! Builds the expression tree the nester later reconstructs from the flat
//! table. Every expression becomes a non-terminal row whose children are
//! the participating tokens in source order; comments are placed into the
//! innermost expression whose span contains them, or between top-level
//! expressions.

use crate::language::{Kind, Token};
use crate::parsing::lexer::Lexeme;
use crate::problem::{Location, ParseProblem, StyleError};

pub fn parse_program(lexemes: Vec<Lexeme>) -> Result<Vec<Token>, StyleError> {
    let (comments, code): (Vec<Lexeme>, Vec<Lexeme>) = lexemes
        .into_iter()
        .partition(|l| l.kind == Kind::Comment);

    let mut parser = Parser {
        lexemes: code,
        pos: 0,
    };

    let mut items = Vec::new();
    while !parser.is_finished() {
        if parser.at(Kind::Semicolon) {
            items.push(parser.bump());
            continue;
        }
        items.push(parser.parse_statement(true)?);
    }

    for comment in comments {
        let comment = terminal(&comment);
        match place_comment(&mut items, comment) {
            Ok(()) => {}
            Err(comment) => {
                let index = items
                    .iter()
                    .position(|item| (item.line1, item.col1) > (comment.line1, comment.col1))
                    .unwrap_or(items.len());
                items.insert(index, comment);
            }
        }
    }

    Ok(items)
}

fn terminal(lexeme: &Lexeme) -> Token {
    Token::new(lexeme.kind, lexeme.text.clone()).with_span(
        lexeme.line1,
        lexeme.col1,
        lexeme.line2,
        lexeme.col2,
    )
}

/// Insert a comment into the innermost expression whose span contains it.
/// Hands the comment back when no expression contains it.
fn place_comment(nodes: &mut Vec<Token>, comment: Token) -> Result<(), Token> {
    for node in nodes.iter_mut() {
        if node.terminal {
            continue;
        }
        let starts_inside = (node.line1, node.col1) <= (comment.line1, comment.col1);
        let ends_inside = (comment.line2, comment.col2) <= (node.line2, node.col2);
        if starts_inside && ends_inside {
            let comment = match place_comment(&mut node.children, comment) {
                Ok(()) => return Ok(()),
                Err(comment) => comment,
            };
            let index = node
                .children
                .iter()
                .position(|child| (child.line1, child.col1) > (comment.line1, comment.col1))
                .unwrap_or(node.children.len());
            node.children
                .insert(index, comment);
            return Ok(());
        }
    }
    Err(comment)
}

struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
}

/// Left/right binding powers for infix operators; right < left means the
/// operator is right-associative.
fn infix_bp(kind: Kind) -> Option<(u8, u8)> {
    match kind {
        Kind::RightAssign => Some((5, 6)),
        Kind::LeftAssign => Some((8, 7)),
        Kind::Tilde => Some((9, 10)),
        Kind::Or | Kind::Or2 => Some((11, 12)),
        Kind::And | Kind::And2 => Some((13, 14)),
        Kind::Gt | Kind::Ge | Kind::Lt | Kind::Le | Kind::Eq2 | Kind::Ne => Some((17, 18)),
        Kind::Plus | Kind::Minus => Some((19, 20)),
        Kind::Star | Kind::Slash => Some((21, 22)),
        Kind::Special | Kind::Pipe => Some((23, 24)),
        Kind::Colon => Some((25, 26)),
        Kind::Caret => Some((32, 31)),
        _ => None,
    }
}

impl Parser {
    fn is_finished(&self) -> bool {
        self.pos
            >= self
                .lexemes
                .len()
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes
            .get(self.pos)
    }

    fn peek_kind(&self) -> Option<Kind> {
        self.peek()
            .map(|l| l.kind)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<Kind> {
        self.lexemes
            .get(self.pos + ahead)
            .map(|l| l.kind)
    }

    /// True when the upcoming token sits on a later line than the last
    /// consumed one. Statement contexts stop at such a boundary; inside
    /// parentheses and brackets line breaks are insignificant.
    fn newline_before_next(&self) -> bool {
        if self.pos == 0 {
            return false;
        }
        match (self.lexemes.get(self.pos - 1), self.peek()) {
            (Some(prev), Some(next)) => next.line1 > prev.line2,
            _ => false,
        }
    }

    fn at(&self, kind: Kind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump(&mut self) -> Token {
        let token = terminal(&self.lexemes[self.pos]);
        self.pos += 1;
        token
    }

    fn here(&self) -> Location {
        match self.peek() {
            Some(lexeme) => Location {
                line: lexeme.line1,
                col: lexeme.col1,
            },
            None => {
                let last = self
                    .lexemes
                    .last();
                Location {
                    line: last.map_or(1, |l| l.line2),
                    col: last.map_or(1, |l| l.col2 + 1),
                }
            }
        }
    }

    fn fail(&self, problem: impl Into<String>) -> StyleError {
        StyleError::Parse(ParseProblem {
            location: self.here(),
            problem: problem.into(),
        })
    }

    fn expect(&mut self, kind: Kind, what: &'static str) -> Result<Token, StyleError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            match self.peek() {
                Some(lexeme) => Err(self.fail(format!(
                    "expected {} but found '{}'",
                    what, lexeme.text
                ))),
                None => Err(self.fail(format!("expected {} but the input ended", what))),
            }
        }
    }

    /// One statement: an expression, possibly continued by `=` assignment.
    /// The host grammar keeps `=` chains flat at one level, unlike `<-`;
    /// the normalizer later rewrites them into the `<-` shape.
    fn parse_statement(&mut self, nl: bool) -> Result<Token, StyleError> {
        let first = self.parse_expr(0, nl)?;

        if !self.at(Kind::EqAssign) || (nl && self.newline_before_next()) {
            return Ok(first);
        }

        let mut parts = vec![first];
        while self.at(Kind::EqAssign) && !(nl && self.newline_before_next()) {
            parts.push(self.bump());
            parts.push(self.parse_expr(0, nl)?);
        }
        Ok(Token::nest_of(parts))
    }

    fn parse_expr(&mut self, min_bp: u8, nl: bool) -> Result<Token, StyleError> {
        let mut lhs = self.parse_prefix(nl)?;

        loop {
            let Some(kind) = self.peek_kind() else {
                break;
            };
            if nl && self.newline_before_next() {
                break;
            }

            match kind {
                Kind::LeftParen => {
                    lhs = self.parse_call(lhs)?;
                }
                Kind::LeftBracket | Kind::LeftBracket2 => {
                    lhs = self.parse_index(lhs)?;
                }
                Kind::Dollar | Kind::At | Kind::NamespaceGet => {
                    let op = self.bump();
                    let name = match self.peek_kind() {
                        Some(Kind::Symbol) | Some(Kind::StrConst) => self.bump(),
                        _ => return Err(self.fail(format!("expected a name after '{}'", op.text))),
                    };
                    lhs = Token::nest_of(vec![lhs, op, name]);
                }
                _ => {
                    let Some((l_bp, r_bp)) = infix_bp(kind) else {
                        break;
                    };
                    if l_bp < min_bp {
                        break;
                    }
                    let op = self.bump();
                    let rhs = self.parse_expr(r_bp, nl)?;
                    lhs = Token::nest_of(vec![lhs, op, rhs]);
                }
            }
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self, nl: bool) -> Result<Token, StyleError> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.fail("expected an expression but the input ended"));
        };

        match kind {
            Kind::Symbol | Kind::NumConst | Kind::StrConst | Kind::Null | Kind::Break
            | Kind::Next => Ok(self.bump()),
            Kind::Minus | Kind::Plus => {
                let op = self.bump();
                let operand = self.parse_expr(27, nl)?;
                Ok(Token::nest_of(vec![op, operand]))
            }
            Kind::Bang => {
                let op = self.bump();
                let operand = self.parse_expr(15, nl)?;
                Ok(Token::nest_of(vec![op, operand]))
            }
            Kind::Tilde => {
                let op = self.bump();
                let operand = self.parse_expr(10, nl)?;
                Ok(Token::nest_of(vec![op, operand]))
            }
            Kind::Help => {
                let op = self.bump();
                let operand = self.parse_expr(4, nl)?;
                Ok(Token::nest_of(vec![op, operand]))
            }
            Kind::LeftParen => {
                let open = self.bump();
                let inner = self.parse_statement(false)?;
                let close = self.expect(Kind::RightParen, "')'")?;
                Ok(Token::nest_of(vec![open, inner, close]))
            }
            Kind::LeftBrace => self.parse_braces(),
            Kind::If => self.parse_if(nl),
            Kind::For => self.parse_for(nl),
            Kind::While => self.parse_while(nl),
            Kind::Repeat => {
                let kw = self.bump();
                let body = self.parse_expr(0, nl)?;
                Ok(Token::nest_of(vec![kw, body]))
            }
            Kind::Function => self.parse_function(nl),
            _ => {
                let lexeme = self
                    .peek()
                    .unwrap();
                Err(self.fail(format!("unexpected '{}'", lexeme.text)))
            }
        }
    }

    fn parse_braces(&mut self) -> Result<Token, StyleError> {
        let open = self.bump();
        let mut children = vec![open];
        loop {
            if self.at(Kind::RightBrace) {
                break;
            }
            if self.is_finished() {
                return Err(self.fail("expected '}' but the input ended"));
            }
            if self.at(Kind::Semicolon) {
                children.push(self.bump());
                continue;
            }
            children.push(self.parse_statement(true)?);
        }
        children.push(self.bump());
        Ok(Token::nest_of(children))
    }

    fn parse_if(&mut self, nl: bool) -> Result<Token, StyleError> {
        let kw = self.bump();
        let open = self.expect(Kind::LeftParen, "'(' after if")?;
        let cond = self.parse_statement(false)?;
        let close = self.expect(Kind::RightParen, "')'")?;
        let then = self.parse_expr(0, nl)?;

        let mut children = vec![kw, open, cond, close, then];
        if self.at(Kind::Else) {
            children.push(self.bump());
            children.push(self.parse_expr(0, nl)?);
        }
        Ok(Token::nest_of(children))
    }

    fn parse_for(&mut self, nl: bool) -> Result<Token, StyleError> {
        let kw = self.bump();
        let open = self.expect(Kind::LeftParen, "'(' after for")?;
        let var = self.expect(Kind::Symbol, "a loop variable")?;
        let keyword_in = self.expect(Kind::In, "'in'")?;
        let seq = self.parse_expr(0, false)?;
        let close = self.expect(Kind::RightParen, "')'")?;
        let body = self.parse_expr(0, nl)?;
        Ok(Token::nest_of(vec![kw, open, var, keyword_in, seq, close, body]))
    }

    fn parse_while(&mut self, nl: bool) -> Result<Token, StyleError> {
        let kw = self.bump();
        let open = self.expect(Kind::LeftParen, "'(' after while")?;
        let cond = self.parse_statement(false)?;
        let close = self.expect(Kind::RightParen, "')'")?;
        let body = self.parse_expr(0, nl)?;
        Ok(Token::nest_of(vec![kw, open, cond, close, body]))
    }

    fn parse_function(&mut self, nl: bool) -> Result<Token, StyleError> {
        let kw = self.bump();
        let open = self.expect(Kind::LeftParen, "'(' after function")?;
        let mut children = vec![kw, open];

        loop {
            match self.peek_kind() {
                Some(Kind::RightParen) => break,
                Some(Kind::Comma) => {
                    children.push(self.bump());
                }
                Some(Kind::Symbol) => {
                    let name = self.bump();
                    if self.at(Kind::EqAssign) {
                        let mut eq = self.bump();
                        eq.kind = Kind::EqFormals;
                        let default = self.parse_expr(0, false)?;
                        children.push(Token::nest_of(vec![name, eq, default]));
                    } else {
                        children.push(name);
                    }
                }
                _ => return Err(self.fail("expected a parameter name or ')'")),
            }
        }

        children.push(self.bump());
        children.push(self.parse_expr(0, nl)?);
        Ok(Token::nest_of(children))
    }

    fn parse_call(&mut self, callee: Token) -> Result<Token, StyleError> {
        let open = self.bump();
        let mut children = vec![callee, open];
        self.parse_arguments(&mut children, Kind::RightParen)?;
        children.push(self.expect(Kind::RightParen, "')'")?);
        Ok(Token::nest_of(children))
    }

    fn parse_index(&mut self, object: Token) -> Result<Token, StyleError> {
        let open = self.bump();
        let double = open.kind == Kind::LeftBracket2;
        let mut children = vec![object, open];
        self.parse_arguments(&mut children, Kind::RightBracket)?;
        children.push(self.expect(Kind::RightBracket, "']'")?);
        if double {
            children.push(self.expect(Kind::RightBracket, "']'")?);
        }
        Ok(Token::nest_of(children))
    }

    fn parse_arguments(
        &mut self,
        children: &mut Vec<Token>,
        closing: Kind,
    ) -> Result<(), StyleError> {
        loop {
            match self.peek_kind() {
                None => return Err(self.fail("expected a closing delimiter but the input ended")),
                Some(kind) if kind == closing => return Ok(()),
                Some(Kind::Comma) => {
                    children.push(self.bump());
                }
                Some(Kind::Symbol | Kind::StrConst)
                    if self.peek_kind_at(1) == Some(Kind::EqAssign) =>
                {
                    let name = self.bump();
                    let mut eq = self.bump();
                    eq.kind = Kind::EqSub;
                    match self.peek_kind() {
                        // `f(x = )` leaves the value absent
                        Some(k) if k == closing || k == Kind::Comma => {
                            children.push(Token::nest_of(vec![name, eq]));
                        }
                        _ => {
                            let value = self.parse_expr(0, false)?;
                            children.push(Token::nest_of(vec![name, eq, value]));
                        }
                    }
                }
                _ => {
                    children.push(self.parse_expr(0, false)?);
                }
            }
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::parsing::lexer::lex;

    fn parse(source: &str) -> Vec<Token> {
        parse_program(lex(source).unwrap()).unwrap()
    }

    fn shape(token: &Token) -> String {
        if token.terminal {
            return token
                .text
                .clone();
        }
        let inner: Vec<String> = token
            .children
            .iter()
            .map(shape)
            .collect();
        format!("({})", inner.join(" "))
    }

    #[test]
    fn binary_is_left_associative() {
        let items = parse("a - b - c");
        assert_eq!(shape(&items[0]), "((a - b) - c)");
    }

    #[test]
    fn precedence() {
        let items = parse("a + b * c");
        assert_eq!(shape(&items[0]), "(a + (b * c))");
        let items = parse("-x^2");
        assert_eq!(shape(&items[0]), "(- (x ^ 2))");
        let items = parse("-1:2");
        assert_eq!(shape(&items[0]), "((- 1) : 2)");
    }

    #[test]
    fn left_assign_is_right_associative() {
        let items = parse("a <- b <- 1");
        assert_eq!(shape(&items[0]), "(a <- (b <- 1))");
    }

    #[test]
    fn eq_assign_stays_flat() {
        let items = parse("a = b = 1");
        assert_eq!(shape(&items[0]), "(a = b = 1)");
    }

    #[test]
    fn call_with_named_argument() {
        let items = parse("mean(x, na.rm = TRUE)");
        assert_eq!(shape(&items[0]), "(mean ( x , (na.rm = TRUE) ))");
    }

    #[test]
    fn statements_split_at_newlines() {
        let items = parse("a\n+ b");
        assert_eq!(items.len(), 2);
        let items = parse("a +\nb");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn newlines_inside_parens_continue() {
        let items = parse("f(a\n+ b)");
        assert_eq!(items.len(), 1);
        assert_eq!(shape(&items[0]), "(f ( (a + b) ))");
    }

    #[test]
    fn if_else_and_braces() {
        let items = parse("if (a > 1) {\n  b\n} else c");
        assert_eq!(shape(&items[0]), "(if ( (a > 1) ) ({ b }) else c)");
    }

    #[test]
    fn function_with_defaults() {
        let items = parse("function(x, y = 2) x + y");
        assert_eq!(shape(&items[0]), "(function ( x , (y = 2) ) (x + y))");
    }

    #[test]
    fn pipes_chain() {
        let items = parse("a %>% b %>% c");
        assert_eq!(shape(&items[0]), "((a %>% b) %>% c)");
    }

    #[test]
    fn double_bracket_index() {
        let items = parse("x[[i]]");
        assert_eq!(shape(&items[0]), "(x [[ i ] ])");
    }

    #[test]
    fn comments_attach_to_containing_expression() {
        let items = parse("f <- function(x) {\n  # inner note\n  x\n}");
        let text = shape(&items[0]);
        assert!(text.contains("# inner note"));
    }

    #[test]
    fn top_level_comment_stays_top_level() {
        let items = parse("# leading\nx <- 1");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, Kind::Comment);
    }

    #[test]
    fn unbalanced_parens_fail() {
        assert!(parse_program(lex("f(a").unwrap()).is_err());
    }
}
