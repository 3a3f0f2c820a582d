//! Ignore regions
//!
//! Comments matching the configured markers bracket regions the formatter
//! must leave alone. Tokens inside such a region are tagged `verbatim`,
//! their original whitespace and spelling are held aside before any rule
//! runs, and restored before serialization; the serializer then emits them
//! untouched, which splices the original source back into the output.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::language::{Hold, Token};

const DEFAULT_START: &str = "refmt: off";
const DEFAULT_STOP: &str = "refmt: on";

pub struct Markers {
    pub start: Regex,
    pub stop: Regex,
}

impl Markers {
    pub fn new(start: &str, stop: &str) -> Markers {
        Markers {
            start: Regex::new(start).unwrap_or_else(|e| panic!("{}", e)),
            stop: Regex::new(stop).unwrap_or_else(|e| panic!("{}", e)),
        }
    }

    /// Read the marker patterns from the environment, falling back to the
    /// defaults when unset or invalid.
    fn from_env() -> Markers {
        let start = std::env::var("REFMT_IGNORE_START").unwrap_or_else(|_| DEFAULT_START.to_string());
        let stop = std::env::var("REFMT_IGNORE_STOP").unwrap_or_else(|_| DEFAULT_STOP.to_string());

        let start = Regex::new(&start).unwrap_or_else(|e| {
            warn!("invalid REFMT_IGNORE_START pattern ({}); using the default", e);
            Regex::new(DEFAULT_START).unwrap_or_else(|e| panic!("{}", e))
        });
        let stop = Regex::new(&stop).unwrap_or_else(|e| {
            warn!("invalid REFMT_IGNORE_STOP pattern ({}); using the default", e);
            Regex::new(DEFAULT_STOP).unwrap_or_else(|e| panic!("{}", e))
        });

        Markers { start, stop }
    }
}

/// The process-wide marker configuration, read once on first use.
pub fn markers() -> &'static Markers {
    static MARKERS: OnceLock<Markers> = OnceLock::new();
    MARKERS.get_or_init(Markers::from_env)
}

/// Tag every token overlapping an ignore range and hold its original
/// whitespace and spelling. Unbalanced markers mark nothing and return
/// false with a warning; the caller then leaves the file untouched, since
/// the author's intent about what to preserve cannot be trusted.
pub fn mark_verbatim(rows: &mut [Token], markers: &Markers) -> bool {
    let ranges = match collect_ranges(rows, markers) {
        Some(ranges) => ranges,
        None => {
            warn!("unbalanced ignore markers; leaving the file unstyled");
            return false;
        }
    };
    if ranges.is_empty() {
        return true;
    }

    for row in rows.iter_mut() {
        let inside = ranges
            .iter()
            .any(|(lo, hi)| row.line1 <= *hi && row.line2 >= *lo);
        if inside {
            row.verbatim = true;
            if row.terminal {
                row.held = Some(Hold {
                    lag_newlines: row.lag_newlines,
                    lag_spaces: row.lag_spaces,
                    spaces: row.spaces,
                    text: row
                        .text
                        .clone(),
                });
            }
        }
    }
    true
}

/// Contiguous line ranges bracketed by markers. A start marker trailing an
/// expression on its own line covers only that line. Returns None on
/// unbalanced markers.
fn collect_ranges(rows: &[Token], markers: &Markers) -> Option<Vec<(u32, u32)>> {
    let comments: Vec<(u32, u32, &str)> = rows
        .iter()
        .filter(|row| row.terminal && row.kind == crate::language::Kind::Comment)
        .map(|row| (row.line1, row.col1, row.text.as_str()))
        .collect();

    let mut ranges = Vec::new();
    let mut open: Option<u32> = None;

    for (line, col, text) in &comments {
        if markers
            .start
            .is_match(text)
        {
            if open.is_some() {
                return None;
            }
            let inline = rows
                .iter()
                .any(|row| row.terminal && row.line2 == *line && row.col2 < *col);
            if inline {
                ranges.push((*line, *line));
            } else {
                open = Some(*line);
            }
        } else if markers
            .stop
            .is_match(text)
        {
            match open.take() {
                Some(from) => ranges.push((from, *line)),
                None => return None,
            }
        }
    }

    if open.is_some() {
        return None;
    }
    Some(ranges)
}

/// Put the held whitespace and spelling back on every verbatim terminal.
/// Runs after all rule phases, before serialization.
pub fn restore_verbatim(token: &mut Token) {
    if let Some(hold) = token
        .held
        .take()
    {
        token.lag_newlines = hold.lag_newlines;
        token.lag_spaces = hold.lag_spaces;
        token.spaces = hold.spaces;
        token.text = hold.text;
    }
    for child in token
        .children
        .iter_mut()
    {
        restore_verbatim(child);
    }
}
