//! Styling of executable examples in documentation comments
//!
//! Runs of `#'` comments may carry an `@examples` section whose body is
//! code. When `include_roxygen_examples` is on, that code is styled with
//! the same guide and re-embedded behind the `#'` prefix. The pass runs on
//! the raw text before the main pipeline; the main pipeline then treats
//! the rewritten comments like any others. Example code that does not
//! parse is left exactly as written.

use std::collections::HashSet;

use tracing::warn;

use crate::pattern;
use crate::guides::StyleGuide;
use crate::styling::ignore::Markers;

pub fn style_examples(source: &str, guide: &StyleGuide, markers: &Markers) -> String {
    let lines: Vec<&str> = source
        .lines()
        .collect();
    let skip = ignored_lines(&lines, markers);

    let mut result: Vec<String> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !is_roxygen(lines[i]) {
            result.push(lines[i].to_string());
            i += 1;
            continue;
        }

        let start = i;
        while i < lines.len() && is_roxygen(lines[i]) {
            i += 1;
        }

        if (start..i).any(|line| skip.contains(&line)) {
            // the run touches an ignore region; leave it alone
            for line in &lines[start..i] {
                result.push(line.to_string());
            }
            continue;
        }

        result.extend(style_run(&lines[start..i], guide));
    }

    let mut out = result.join("\n");
    if source.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn is_roxygen(line: &str) -> bool {
    pattern!(r"^\s*#'").is_match(line)
}

fn is_tag(line: &str) -> bool {
    pattern!(r"^\s*#'\s*@[a-zA-Z]").is_match(line)
}

fn is_examples_tag(line: &str) -> bool {
    pattern!(r"^\s*#'\s*@examples?(\s|$)").is_match(line)
}

/// Strip the `#'` prefix and at most one following space.
fn strip_prefix(line: &str) -> String {
    let after = match line.find("#'") {
        Some(at) => &line[at + 2..],
        None => line,
    };
    after
        .strip_prefix(' ')
        .unwrap_or(after)
        .to_string()
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}

/// Style the `@examples` sections of one roxygen run.
fn style_run(run: &[&str], guide: &StyleGuide) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut j = 0;

    while j < run.len() {
        if !is_examples_tag(run[j]) {
            out.push(run[j].to_string());
            j += 1;
            continue;
        }

        out.push(run[j].to_string());
        let prefix = format!("{}#'", leading_whitespace(run[j]));
        j += 1;

        let code_from = j;
        while j < run.len() && !is_tag(run[j]) {
            j += 1;
        }
        let code: String = run[code_from..j]
            .iter()
            .map(|line| strip_prefix(line))
            .collect::<Vec<String>>()
            .join("\n");

        if code
            .trim()
            .is_empty()
        {
            for line in &run[code_from..j] {
                out.push(line.to_string());
            }
            continue;
        }

        let mut inner = guide.clone();
        inner.include_roxygen_examples = false;
        match crate::styling::style_text(&code, &inner) {
            Ok(styled) => {
                for line in styled
                    .text
                    .trim_end_matches('\n')
                    .lines()
                {
                    if line.is_empty() {
                        out.push(prefix.clone());
                    } else {
                        out.push(format!("{} {}", prefix, line));
                    }
                }
            }
            Err(error) => {
                warn!("example code left unstyled: {}", error);
                for line in &run[code_from..j] {
                    out.push(line.to_string());
                }
            }
        }
    }

    out
}

/// Line indexes covered by ignore regions, judged from the raw lines the
/// same way the token scanner judges comments. Unbalanced markers ignore
/// nothing, matching the scanner.
fn ignored_lines(lines: &[&str], markers: &Markers) -> HashSet<usize> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut open: Option<usize> = None;

    for (index, line) in lines
        .iter()
        .enumerate()
    {
        if markers
            .start
            .is_match(line)
        {
            if open.is_some() {
                return HashSet::new();
            }
            if line
                .trim_start()
                .starts_with('#')
            {
                open = Some(index);
            } else {
                ranges.push((index, index));
            }
        } else if markers
            .stop
            .is_match(line)
        {
            match open.take() {
                Some(from) => ranges.push((from, index)),
                None => return HashSet::new(),
            }
        }
    }
    if open.is_some() {
        return HashSet::new();
    }

    ranges
        .into_iter()
        .flat_map(|(from, to)| from..=to)
        .collect()
}
