//! Space rules of the tidy guide
//!
//! Space rules write the `spaces` column only: the number of spaces after
//! a token when no line break follows it. Strict styling sets exact
//! counts; relaxed styling only adds missing spaces and leaves deliberate
//! extra alignment alone.

use crate::guides::{shape_of, Nest, RuleContext, Shape};
use crate::language::{Kind, Token};

fn one(token: &mut Token, strict: bool) {
    token.spaces = if strict {
        1
    } else {
        token
            .spaces
            .max(1)
    };
}

fn at_least_one(token: &mut Token) {
    token.spaces = token
        .spaces
        .max(1);
}

fn zero(token: &mut Token) {
    token.spaces = 0;
}

/// Exactly one space around binary operators, none around tight operators
/// (`$`, `@`, `::`, `:`) and the zero-group of the math spacing spec, none
/// after a unary operator.
pub fn style_op_spacing(nest: &mut Nest, context: &RuleContext) {
    match shape_of(nest.tokens) {
        Shape::Unary => {
            zero(&mut nest.tokens[0]);
        }
        Shape::Ops => {
            for i in 1..nest
                .tokens
                .len()
            {
                let kind = nest.tokens[i].kind;
                if !kind.is_binary_op() && !kind.is_tight_op() {
                    continue;
                }
                let tight = kind.is_tight_op()
                    || context
                        .math_spacing
                        .zero
                        .contains(&kind);
                if tight {
                    zero(&mut nest.tokens[i - 1]);
                    zero(&mut nest.tokens[i]);
                } else {
                    one(&mut nest.tokens[i - 1], context.strict);
                    one(&mut nest.tokens[i], context.strict);
                }
            }
        }
        _ => {}
    }
}

/// No space just inside parentheses or brackets, and none between a
/// callee, indexed object, or `function` keyword and its opening
/// delimiter.
pub fn style_delimiter_spacing(nest: &mut Nest, _context: &RuleContext) {
    match shape_of(nest.tokens) {
        Shape::Call | Shape::Index | Shape::Function => {
            zero(&mut nest.tokens[0]);
        }
        Shape::Group | Shape::If | Shape::For | Shape::While => {}
        _ => return,
    }

    for i in 0..nest
        .tokens
        .len()
    {
        let kind = nest.tokens[i].kind;
        if kind.is_opening() && kind != Kind::LeftBrace {
            zero(&mut nest.tokens[i]);
        }
        if kind.is_closing() && kind != Kind::RightBrace && i > 0 {
            if nest.tokens[i - 1].kind != Kind::Comment {
                zero(&mut nest.tokens[i - 1]);
            }
        }
    }
}

/// No space before a comma, one after.
pub fn style_comma_spacing(nest: &mut Nest, context: &RuleContext) {
    for i in 0..nest
        .tokens
        .len()
    {
        if nest.tokens[i].kind != Kind::Comma {
            continue;
        }
        if i > 0 && nest.tokens[i - 1].kind != Kind::Comment {
            zero(&mut nest.tokens[i - 1]);
        }
        one(&mut nest.tokens[i], context.strict);
    }
}

/// One space after `if`, `for`, and `while` before their condition, around
/// `in` and `else`, and between a closing condition parenthesis and the
/// body that follows it.
pub fn style_keyword_spacing(nest: &mut Nest, context: &RuleContext) {
    let shape = shape_of(nest.tokens);
    if !matches!(
        shape,
        Shape::If | Shape::For | Shape::While | Shape::Repeat | Shape::Function
    ) {
        return;
    }

    let last = nest
        .tokens
        .len()
        - 1;
    for i in 0..=last {
        match nest.tokens[i].kind {
            Kind::If | Kind::For | Kind::While => one(&mut nest.tokens[i], context.strict),
            Kind::Repeat => {
                if i < last {
                    one(&mut nest.tokens[i], context.strict);
                }
            }
            Kind::In => {
                if i > 0 {
                    one(&mut nest.tokens[i - 1], context.strict);
                }
                one(&mut nest.tokens[i], context.strict);
            }
            Kind::Else => {
                if i > 0 {
                    one(&mut nest.tokens[i - 1], context.strict);
                }
                if i < last {
                    one(&mut nest.tokens[i], context.strict);
                }
            }
            Kind::RightParen => {
                // the body follows the condition or formals
                if i < last {
                    one(&mut nest.tokens[i], context.strict);
                }
            }
            _ => {}
        }
    }
}

/// One space before an opening brace and, when the braces share a line
/// with their content, just inside them. Empty `{}` stays tight.
pub fn style_brace_spacing(nest: &mut Nest, _context: &RuleContext) {
    let len = nest
        .tokens
        .len();
    for i in 0..len {
        match nest.tokens[i].kind {
            Kind::LeftBrace => {
                if i > 0 && nest.tokens[i - 1].kind != Kind::Comment {
                    at_least_one(&mut nest.tokens[i - 1]);
                }
                if i + 1 < len
                    && nest.tokens[i + 1].lag_newlines == 0
                    && nest.tokens[i + 1].kind != Kind::RightBrace
                {
                    at_least_one(&mut nest.tokens[i]);
                }
            }
            Kind::RightBrace => {
                if i > 0
                    && nest.tokens[i].lag_newlines == 0
                    && nest.tokens[i - 1].kind != Kind::LeftBrace
                    && nest.tokens[i - 1].kind != Kind::Comment
                {
                    at_least_one(&mut nest.tokens[i - 1]);
                }
            }
            _ => {}
        }
    }
}

/// At least one space before a trailing comment; alignment beyond that is
/// left alone.
pub fn style_comment_spacing(nest: &mut Nest, _context: &RuleContext) {
    for i in 1..nest
        .tokens
        .len()
    {
        if nest.tokens[i].kind == Kind::Comment && nest.tokens[i].lag_newlines == 0 {
            at_least_one(&mut nest.tokens[i - 1]);
        }
    }
}
