//! Line break rules of the tidy guide
//!
//! Line break rules write the `lag_newlines` column only: the number of
//! line breaks before a token. A rule that would remove a line break never
//! applies across an end-of-line comment, which would otherwise drag the
//! comment into the following code.

use crate::guides::{shape_of, Nest, RuleContext, Shape};
use crate::language::{Kind, Token};

/// Separator semicolons are re-expressed as line breaks: the `;` row is
/// eliminated and whatever followed it starts a new line. Semicolons in
/// ignore regions stay.
pub fn resolve_semicolons(nest: &mut Nest, _context: &RuleContext) {
    let mut i = 0;
    while i < nest
        .tokens
        .len()
    {
        if nest.tokens[i].kind != Kind::Semicolon || nest.tokens[i].verbatim {
            i += 1;
            continue;
        }
        let removed = nest
            .tokens
            .remove(i);
        if i > 0 {
            nest.tokens[i - 1].kind_after = removed.kind_after;
        }
        if i < nest
            .tokens
            .len()
        {
            let follower = &mut nest.tokens[i];
            follower.kind_before = removed.kind_before;
            follower.lag_newlines = follower
                .lag_newlines
                .max(1);
        }
    }
}

/// Is this child a braced expression?
fn is_brace_nest(token: &Token) -> bool {
    !token.terminal
        && token
            .children
            .first()
            .is_some_and(|child| child.kind == Kind::LeftBrace)
}

/// Opening braces stay on the line of what introduces them; their content
/// starts on a fresh line and the closing brace sits on its own line.
/// Empty `{}` is left alone.
pub fn break_around_braces(nest: &mut Nest, context: &RuleContext) {
    let shape = shape_of(nest.tokens);

    // pull a braced body up to the line of its construct
    if matches!(
        shape,
        Shape::If | Shape::For | Shape::While | Shape::Repeat | Shape::Function
    ) {
        for i in 1..nest
            .tokens
            .len()
        {
            if is_brace_nest(&nest.tokens[i])
                && nest.tokens[i].lag_newlines > 0
                && nest.tokens[i].kind_before != Some(Kind::Comment)
            {
                nest.tokens[i].lag_newlines = 0;
            }
        }
    }

    if shape != Shape::Braces {
        return;
    }
    let len = nest
        .tokens
        .len();
    if len <= 2 {
        return;
    }

    // content begins on the line after `{`; a trailing comment may stay
    let first = if nest.tokens[1].kind == Kind::Comment && nest.tokens[1].lag_newlines == 0 {
        2
    } else {
        1
    };
    if first < len - 1 && !nest.tokens[first].verbatim {
        nest.tokens[first].lag_newlines = if context.strict {
            1
        } else {
            nest.tokens[first]
                .lag_newlines
                .max(1)
        };
    }

    // `}` goes on its own line
    if !nest.tokens[len - 1].verbatim {
        nest.tokens[len - 1].lag_newlines = if context.strict {
            1
        } else {
            nest.tokens[len - 1]
                .lag_newlines
                .max(1)
        };
    }
}

/// `else` continues the line of the closing brace of the branch before it.
pub fn attach_else_to_brace(nest: &mut Nest, _context: &RuleContext) {
    if shape_of(nest.tokens) != Shape::If {
        return;
    }
    for i in 1..nest
        .tokens
        .len()
    {
        if nest.tokens[i].kind == Kind::Else
            && nest.tokens[i].lag_newlines > 0
            && is_brace_nest(&nest.tokens[i - 1])
            && nest.tokens[i].kind_before == Some(Kind::RightBrace)
        {
            nest.tokens[i].lag_newlines = 0;
        }
    }
}

/// A call's opening parenthesis never starts a line of its own.
pub fn attach_call_paren(nest: &mut Nest, _context: &RuleContext) {
    if !matches!(shape_of(nest.tokens), Shape::Call | Shape::Index) {
        return;
    }
    if nest.tokens[1].lag_newlines > 0 && nest.tokens[1].kind_before != Some(Kind::Comment) {
        nest.tokens[1].lag_newlines = 0;
    }
}

/// When a call or index spans multiple lines, its closing delimiter gets a
/// line of its own.
pub fn break_before_call_close(nest: &mut Nest, _context: &RuleContext) {
    if !matches!(shape_of(nest.tokens), Shape::Call | Shape::Index) {
        return;
    }
    let spread = nest.tokens[2..]
        .iter()
        .any(|token| token.lag_newlines > 0);
    if !spread {
        return;
    }
    let Some(close_at) = nest
        .tokens
        .iter()
        .position(|token| {
            token
                .kind
                .is_closing()
        })
    else {
        return;
    };
    let close = &mut nest.tokens[close_at];
    if !close.verbatim {
        close.lag_newlines = close
            .lag_newlines
            .max(1);
    }
}

/// Commas never start a line; the break moves behind the comma.
pub fn break_after_commas(nest: &mut Nest, _context: &RuleContext) {
    let len = nest
        .tokens
        .len();
    for i in 0..len {
        if nest.tokens[i].kind != Kind::Comma || nest.tokens[i].lag_newlines == 0 {
            continue;
        }
        if nest.tokens[i].kind_before == Some(Kind::Comment) || nest.tokens[i].verbatim {
            continue;
        }
        let moved = nest.tokens[i].lag_newlines;
        nest.tokens[i].lag_newlines = 0;
        if i + 1 < len && !nest.tokens[i + 1].verbatim {
            let follower = &mut nest.tokens[i + 1];
            follower.lag_newlines = follower
                .lag_newlines
                .max(moved);
        }
    }
}

/// At most two consecutive blank lines anywhere; none before the first
/// token of the file.
pub fn cap_blank_lines(nest: &mut Nest, _context: &RuleContext) {
    for token in nest
        .tokens
        .iter_mut()
    {
        if !token.verbatim && token.lag_newlines > 3 {
            token.lag_newlines = 3;
        }
    }
    if nest.top {
        if let Some(first) = nest
            .tokens
            .first_mut()
        {
            if !first.verbatim {
                first.lag_newlines = 0;
            }
        }
    }
}
