//! Indention rules of the tidy guide
//!
//! Indention rules write the `indent_ref` column only. The serializer
//! resolves each reference against the line the referenced token ended up
//! on, so the decisions here are positional, not numeric.

use crate::guides::{shape_of, Nest, RuleContext, Shape};
use crate::language::{IndentRef, Kind};

/// Everything between `{` and `}` is indented one step past the line
/// holding the `{`; the `}` returns to that line's indentation.
pub fn indent_braces(nest: &mut Nest, _context: &RuleContext) {
    if shape_of(nest.tokens) != Shape::Braces {
        return;
    }
    let open = nest.tokens[0].id;
    let last = nest
        .tokens
        .len()
        - 1;
    for i in 1..last {
        nest.tokens[i].indent_ref = IndentRef::Inside(open);
    }
    nest.tokens[last].indent_ref = IndentRef::Beside(open);
}

/// Content of parentheses and brackets is indented one step past the line
/// of the opening delimiter; the closing delimiter returns beside it.
pub fn indent_delimiters(nest: &mut Nest, _context: &RuleContext) {
    if !matches!(
        shape_of(nest.tokens),
        Shape::Call
            | Shape::Index
            | Shape::Group
            | Shape::If
            | Shape::For
            | Shape::While
            | Shape::Function
    ) {
        return;
    }

    let Some(open_at) = nest
        .tokens
        .iter()
        .position(|token| {
            token
                .kind
                .is_opening()
        })
    else {
        return;
    };
    let open = nest.tokens[open_at].id;

    let Some(close_at) = nest.tokens[open_at + 1..]
        .iter()
        .position(|token| {
            token
                .kind
                .is_closing()
        })
        .map(|offset| open_at + 1 + offset)
    else {
        return;
    };

    for i in open_at + 1..close_at {
        nest.tokens[i].indent_ref = IndentRef::Inside(open);
    }
    // `]]` closes with two bracket tokens; both return beside the opener
    for token in nest.tokens[close_at..].iter_mut() {
        if token
            .kind
            .is_closing()
        {
            token.indent_ref = IndentRef::Beside(open);
        }
    }
}

/// Bodies of `if`, `for`, `while`, `repeat`, and `function` that start on
/// a fresh line are indented one step past the keyword's line; a dangling
/// `else` returns beside it.
pub fn indent_keyword_bodies(nest: &mut Nest, _context: &RuleContext) {
    let shape = shape_of(nest.tokens);
    if !matches!(
        shape,
        Shape::If | Shape::For | Shape::While | Shape::Repeat | Shape::Function
    ) {
        return;
    }
    let keyword = nest.tokens[0].id;

    let body_from = if shape == Shape::Repeat {
        1
    } else {
        match nest
            .tokens
            .iter()
            .rposition(|token| token.kind == Kind::RightParen)
        {
            Some(close) => close + 1,
            None => return,
        }
    };

    for i in body_from..nest
        .tokens
        .len()
    {
        nest.tokens[i].indent_ref = if nest.tokens[i].kind == Kind::Else {
            IndentRef::Beside(keyword)
        } else {
            IndentRef::Inside(keyword)
        };
    }
}

/// Function declarations whose first formal stays on the line of the `(`
/// align the remaining formals one column past it.
pub fn align_function_formals(nest: &mut Nest, _context: &RuleContext) {
    if shape_of(nest.tokens) != Shape::Function {
        return;
    }
    let Some(open_at) = nest
        .tokens
        .iter()
        .position(|token| token.kind == Kind::LeftParen)
    else {
        return;
    };
    let Some(close_at) = nest
        .tokens
        .iter()
        .position(|token| token.kind == Kind::RightParen)
    else {
        return;
    };
    if close_at <= open_at + 1 {
        return;
    }

    let spread = nest.tokens[open_at + 1..=close_at]
        .iter()
        .any(|token| token.lag_newlines > 0);
    let first_on_open_line = nest.tokens[open_at + 1].lag_newlines == 0;
    if !spread || !first_on_open_line {
        return;
    }

    let open = nest.tokens[open_at].id;
    for i in open_at + 1..close_at {
        nest.tokens[i].indent_ref = IndentRef::After(open);
    }
}

/// Operands continuing an operator chain on later lines are indented one
/// step past the line the chain starts on. Covers assignments, pipes, and
/// every other binary chain.
pub fn indent_op_continuations(nest: &mut Nest, _context: &RuleContext) {
    if shape_of(nest.tokens) != Shape::Ops {
        return;
    }
    let Some(anchor) = nest.tokens[0].first_terminal_id() else {
        return;
    };
    for i in 1..nest
        .tokens
        .len()
    {
        nest.tokens[i].indent_ref = IndentRef::Inside(anchor);
    }
}
