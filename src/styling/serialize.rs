//! Serializer: nested parse table back to text
//!
//! Emission walks the terminals in order. The rule phases leave their
//! decisions in `lag_newlines` (breaks before a token) and `spaces`
//! (spaces after a token); just before emission the mirror columns are
//! derived from them — each token's `newlines` from its successor's
//! `lag_newlines`, each token's `lag_spaces` from its predecessor's
//! `spaces` — so the pair agrees and the whitespace between two terminals
//! is their common value. After a line break the next token is indented by
//! resolving its `indent_ref` against the position its referenced token
//! was emitted at. Verbatim tokens (ignore regions) keep their held
//! whitespace untouched, which splices the original source back in place
//! of styled text.

use std::collections::HashMap;

use crate::guides::StyleGuide;
use crate::language::{Id, IndentRef, Token};

struct Emit {
    id: Id,
    text: String,
    lag_newlines: u32,
    lag_spaces: u32,
    spaces: u32,
    verbatim: bool,
    indent_ref: IndentRef,
}

pub fn serialize(root: &mut Token, guide: &StyleGuide) -> String {
    // the root is synthetic: no rule addresses it as a child row, so its
    // lifted boundary whitespace is stale; re-sync it before pushing down
    if let Some(first) = root
        .children
        .first()
    {
        root.lag_newlines = first.lag_newlines;
        root.lag_spaces = first.lag_spaces;
    }
    if let Some(last) = root
        .children
        .last()
    {
        root.spaces = last.spaces;
        root.newlines = last.newlines;
    }

    push_down(root, IndentRef::Own);

    let mut emits: Vec<Emit> = Vec::new();
    collect_terminals(root, &mut emits);
    reconcile(&mut emits);

    let resolve_refs = !guide
        .indention
        .is_empty();
    let base = guide.base_indention;

    let mut out = String::new();
    // positions of already-emitted tokens, for resolving indent references
    let mut line_indents: HashMap<Id, usize> = HashMap::new();
    let mut columns: HashMap<Id, usize> = HashMap::new();

    let mut current_line_indent = 0usize;
    let mut column = 0usize;

    for (i, token) in emits
        .iter()
        .enumerate()
    {
        if token.lag_newlines > 0 || i == 0 {
            for _ in 0..token.lag_newlines {
                out.push('\n');
            }
            let indent = if token.verbatim {
                token.lag_spaces as usize
            } else if !resolve_refs {
                // indentation is out of scope; keep the original column
                token.lag_spaces as usize + base
            } else {
                match resolve(token, guide, &line_indents, &columns) {
                    Some(indent) => indent + base,
                    None => token.lag_spaces as usize + base,
                }
            };
            for _ in 0..indent {
                out.push(' ');
            }
            current_line_indent = indent;
            column = indent;
        } else {
            for _ in 0..token.lag_spaces {
                out.push(' ');
            }
            column += token.lag_spaces as usize;
        }

        line_indents.insert(token.id, current_line_indent);
        columns.insert(token.id, column);
        out.push_str(&token.text);
        match token
            .text
            .rfind('\n')
        {
            Some(at) => {
                column = token.text[at + 1..]
                    .chars()
                    .count();
            }
            None => {
                column += token
                    .text
                    .chars()
                    .count();
            }
        }
    }

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Derive the mirror columns: the gap before a styled token is what the
/// token before it asked for; line-starting tokens keep their original
/// `lag_spaces`, which carries the source indentation for the raw
/// indention path. Verbatim tokens keep their held values on both sides.
fn reconcile(emits: &mut [Emit]) {
    for i in 1..emits.len() {
        if emits[i].verbatim || emits[i].lag_newlines > 0 {
            continue;
        }
        emits[i].lag_spaces = emits[i - 1].spaces;
    }
}

/// Resolve a token's indent reference against already-emitted positions.
/// Returns None when the token has no reference and the guide keeps raw
/// indention for untouched lines.
fn resolve(
    token: &Emit,
    guide: &StyleGuide,
    line_indents: &HashMap<Id, usize>,
    columns: &HashMap<Id, usize>,
) -> Option<usize> {
    match token.indent_ref {
        IndentRef::Own => {
            if guide.use_raw_indention {
                None
            } else {
                Some(0)
            }
        }
        IndentRef::Inside(id) => Some(
            line_indents
                .get(&id)
                .copied()
                .unwrap_or(0)
                + guide.indent_by,
        ),
        IndentRef::Beside(id) => Some(
            line_indents
                .get(&id)
                .copied()
                .unwrap_or(0),
        ),
        IndentRef::After(id) => Some(
            columns
                .get(&id)
                .copied()
                .unwrap_or(0)
                + 1,
        ),
    }
}

/// Push nest-level attributes down to the terminals that realize them:
/// the leading whitespace of a nest lands on its first terminal, its
/// trailing spacing on its last, and its indent reference on every
/// descendant that was not given one of its own. Verbatim subtrees keep
/// their held whitespace.
fn push_down(token: &mut Token, inherited: IndentRef) {
    let own = if token.indent_ref == IndentRef::Own {
        inherited
    } else {
        token.indent_ref
    };
    token.indent_ref = own;

    if token.terminal
        || token
            .children
            .is_empty()
    {
        return;
    }

    let first = &mut token.children[0];
    if !first.verbatim {
        first.lag_newlines = token.lag_newlines;
        first.lag_spaces = token.lag_spaces;
    }
    let last = token
        .children
        .len()
        - 1;
    let trailing = &mut token.children[last];
    if !trailing.verbatim {
        trailing.spaces = token.spaces;
        trailing.newlines = token.newlines;
    }

    for child in token
        .children
        .iter_mut()
    {
        push_down(child, own);
    }
}

fn collect_terminals(token: &Token, out: &mut Vec<Emit>) {
    if token.terminal {
        out.push(Emit {
            id: token.id,
            text: token
                .text
                .clone(),
            lag_newlines: token.lag_newlines,
            lag_spaces: token.lag_spaces,
            spaces: token.spaces,
            verbatim: token.verbatim,
            indent_ref: token.indent_ref,
        });
        return;
    }
    for child in &token.children {
        collect_terminals(child, out);
    }
}
