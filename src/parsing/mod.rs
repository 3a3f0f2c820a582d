// Parsing: source text in, flat parse table out

use std::path::Path;

use tracing::debug;

use crate::language::{row_order, Id, Kind, Token};
use crate::problem::StyleError;

mod lexer;
mod parser;

pub use lexer::{lex, Lexeme};

/// Read a source file, insisting on UTF-8.
pub fn load(path: &Path) -> Result<String, StyleError> {
    std::fs::read_to_string(path).map_err(|e| {
        StyleError::Load(format!("{}: {}", path.display(), e))
    })
}

/// Parse source text into the flat parse table: one row per token, parents
/// referenced by id, every derived column initialized from the source
/// spans. This is the boundary behind which the host parser lives; the
/// styling engine only ever sees the table.
pub fn parse(source: &str) -> Result<Vec<Token>, StyleError> {
    let lexemes = lexer::lex(source)?;
    let items = parser::parse_program(lexemes)?;
    let mut rows = flatten(items);

    for row in rows.iter_mut() {
        row.kind = row
            .kind
            .enhance(&row.text);
    }

    rows.sort_by(row_order);
    for (i, row) in rows
        .iter_mut()
        .enumerate()
    {
        row.pos_id = i as u32 + 1;
    }

    attach_neighbours(&mut rows);
    initialize_whitespace(&mut rows);

    debug!(rows = rows.len(), "parsed");

    Ok(rows)
}

/// Walk the expression trees in pre-order, assigning ids and parent
/// references. Top-level comments that precede a top-level expression get
/// the negated id of that expression as their parent.
fn flatten(items: Vec<Token>) -> Vec<Token> {
    let mut rows = Vec::new();
    let mut next_id: Id = 1;

    for item in items {
        walk(item, 0, &mut rows, &mut next_id);
    }

    // attach leading top-level comments to the expression that follows
    let top_level: Vec<(usize, Id, Kind)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.parent == 0)
        .map(|(i, row)| (i, row.id, row.kind))
        .collect();
    for (slot, window) in top_level
        .iter()
        .enumerate()
    {
        let (index, _, kind) = *window;
        if kind != Kind::Comment {
            continue;
        }
        if let Some((_, next_id, _)) = top_level[slot + 1..]
            .iter()
            .find(|(_, _, kind)| *kind != Kind::Comment && *kind != Kind::Semicolon)
        {
            rows[index].parent = -next_id;
        }
    }

    rows
}

fn walk(mut node: Token, parent: Id, rows: &mut Vec<Token>, next_id: &mut Id) {
    let id = *next_id;
    *next_id += 1;

    let children = std::mem::take(&mut node.children);
    node.id = id;
    node.parent = parent;
    rows.push(node);

    for child in children {
        walk(child, id, rows, next_id);
    }
}

/// Record, for every row, the kind of the nearest terminal before and
/// after its span. Rules consult these without reaching across nests.
fn attach_neighbours(rows: &mut [Token]) {
    let terminals: Vec<(u32, u32, u32, u32, Kind)> = rows
        .iter()
        .filter(|row| row.terminal)
        .map(|row| (row.line1, row.col1, row.line2, row.col2, row.kind))
        .collect();

    for row in rows.iter_mut() {
        row.kind_before = terminals
            .iter()
            .rev()
            .find(|(_, _, line2, col2, _)| (*line2, *col2) < (row.line1, row.col1))
            .map(|(_, _, _, _, kind)| *kind);
        row.kind_after = terminals
            .iter()
            .find(|(line1, col1, _, _, _)| (*line1, *col1) > (row.line2, row.col2))
            .map(|(_, _, _, _, kind)| *kind);
    }
}

/// Seed the whitespace columns from the source spans: how many line breaks
/// and spaces preceded each terminal, mirrored as `newlines`/`spaces` on
/// the terminal before it. Re-run by the cache pre-filter after it turns
/// expression rows into terminals.
pub(crate) fn initialize_whitespace(rows: &mut [Token]) {
    let mut previous: Option<usize> = None;

    for index in 0..rows.len() {
        if !rows[index].terminal {
            continue;
        }
        match previous {
            None => {
                rows[index].lag_newlines = rows[index].line1 - 1;
                rows[index].lag_spaces = rows[index].col1 - 1;
            }
            Some(prev) => {
                let lag_newlines = rows[index].line1 - rows[prev].line2;
                let lag_spaces = if lag_newlines == 0 {
                    rows[index].col1 - rows[prev].col2 - 1
                } else {
                    rows[index].col1 - 1
                };
                rows[index].lag_newlines = lag_newlines;
                rows[index].lag_spaces = lag_spaces;
                rows[prev].newlines = lag_newlines;
                rows[prev].spaces = if lag_newlines == 0 { lag_spaces } else { 0 };
            }
        }
        previous = Some(index);
    }
}
