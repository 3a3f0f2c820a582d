//! Post-nesting rewrites applied before any rule runs

use crate::language::{Kind, Token};
use crate::styling::nest::lift_boundary_whitespace;

pub fn normalize(root: &mut Token, caching: bool) {
    flatten_operators(root);
    relocate_eq_assign(root);
    assign_blocks(root, caching);
    // rebuilt nests need their boundary whitespace lifted again
    lift_boundary_whitespace(root);
}

/// Operators whose chains are flattened into a single nest. Plus and minus
/// share a class because they share precedence; the two pipe operators are
/// kept apart so a rule can treat them differently.
fn chain_class(kind: Kind) -> Option<u8> {
    match kind {
        Kind::Plus | Kind::Minus => Some(1),
        Kind::SpecialPipe => Some(2),
        Kind::Pipe => Some(3),
        _ => None,
    }
}

/// The class of a nest that is itself an operator chain, judged by the
/// operator in second position (binary nests are `[lhs, op, rhs]`).
fn nest_chain_class(token: &Token) -> Option<u8> {
    if token.terminal
        || token
            .children
            .len()
            < 3
    {
        return None;
    }
    chain_class(token.children[1].kind)
}

/// `a + b + c` parses as `((a + b) + c)`; splice the nested left operand
/// into its parent so the whole chain sits in one nest and spacing or
/// line-break decisions see every operand at once. Emitted token order is
/// unchanged.
fn flatten_operators(token: &mut Token) {
    for child in token
        .children
        .iter_mut()
    {
        flatten_operators(child);
    }

    let Some(class) = nest_chain_class(token) else {
        return;
    };
    if nest_chain_class(&token.children[0]) == Some(class) {
        let first = token
            .children
            .remove(0);
        token
            .children
            .splice(0..0, first.children);
    }
}

/// The host grammar leaves `=` assignment chains flat in one nest; regroup
/// them right-associatively so the layout matches what `<-` produces and
/// one set of rules covers both spellings.
fn relocate_eq_assign(token: &mut Token) {
    for child in token
        .children
        .iter_mut()
    {
        relocate_eq_assign(child);
    }

    if token.terminal {
        return;
    }
    let is_flat_chain = token
        .children
        .len()
        >= 5
        && token.children[1].kind == Kind::EqAssign;
    if !is_flat_chain {
        return;
    }

    while token
        .children
        .len()
        > 3
    {
        let at = token
            .children
            .len()
            - 3;
        let tail = token
            .children
            .split_off(at);
        token
            .children
            .push(Token::nest_of(tail));
    }
}

/// Two top-level expressions share a block iff they share a source line.
/// Blocks are the unit of the cache decision; with caching off they are
/// not needed and everything lands in block 1.
fn assign_blocks(root: &mut Token, caching: bool) {
    let mut block = 1;
    let mut previous_end: Option<u32> = None;

    for child in root
        .children
        .iter_mut()
    {
        if caching {
            if let Some(end) = previous_end {
                if child.line1 > end {
                    block += 1;
                }
            }
            previous_end = Some(child.line2);
        }
        child.block = block;
    }
}
