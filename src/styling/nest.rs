//! Nester: flat parse table to recursively-nested parse table

use std::collections::{HashMap, HashSet};

use crate::language::{Id, Token};

/// Convert the flat table into a tree by repeated parent-child joins.
///
/// Each round partitions the rows into *internal* rows (rows that some
/// other row names as its parent, plus every row with a non-positive
/// parent) and *child* rows (the rest, i.e. the current leaves). The child
/// rows are grouped by parent and moved into the `children` vector of the
/// matching internal row, merged with any children attached in an earlier
/// round and kept sorted by `pos_id`. The round strictly shrinks the set of
/// rows with positive parents, so the loop terminates with the top-level
/// rows only, which become the children of a synthetic root.
pub fn nest(rows: Vec<Token>) -> Token {
    let mut rows = rows;

    loop {
        let referenced: HashSet<Id> = rows
            .iter()
            .map(|row| row.parent)
            .filter(|parent| *parent > 0)
            .collect();
        if referenced.is_empty() {
            break;
        }

        let (mut internal, leaves): (Vec<Token>, Vec<Token>) = rows
            .into_iter()
            .partition(|row| referenced.contains(&row.id) || row.parent <= 0);

        let mut grouped: HashMap<Id, Vec<Token>> = HashMap::new();
        for leaf in leaves {
            grouped
                .entry(leaf.parent)
                .or_default()
                .push(leaf);
        }

        for row in internal.iter_mut() {
            if let Some(mut children) = grouped.remove(&row.id) {
                row.children
                    .append(&mut children);
                row.children
                    .sort_by_key(|child| child.pos_id);
            }
        }

        rows = internal;
    }

    rows.sort_by_key(|row| row.pos_id);

    let mut root = Token::nest_of(rows);
    lift_boundary_whitespace(&mut root);
    root
}

/// Copy the leading whitespace of each nest's first terminal up onto the
/// nest row, and the trailing spacing of its last terminal likewise, so
/// rules that address a non-terminal child speak for the whole subtree.
/// The serializer performs the inverse push before emission.
pub(crate) fn lift_boundary_whitespace(token: &mut Token) {
    for child in token
        .children
        .iter_mut()
    {
        lift_boundary_whitespace(child);
    }
    if token.terminal {
        return;
    }
    if let Some(first) = token
        .children
        .first()
    {
        token.lag_newlines = first.lag_newlines;
        token.lag_spaces = first.lag_spaces;
    }
    if let Some(last) = token
        .children
        .last()
    {
        token.newlines = last.newlines;
        token.spaces = last.spaces;
    }
}
