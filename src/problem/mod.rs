// Program wide top-level error handling

use std::fmt;
use std::path::Path;

use owo_colors::OwoColorize;

/// Where in the source something went wrong, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// The source does not parse. The input is returned to the caller
/// unchanged when this is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProblem {
    pub location: Location,
    pub problem: String,
}

/// Re-parsing the styled output produced a different token sequence than
/// the input. The first diverging pair is carried as a hint; the original
/// text is returned and never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftProblem {
    pub expected: String,
    pub found: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// Reading or writing a file failed.
    Load(String),
    /// The source does not parse.
    Parse(ParseProblem),
    /// Styling would have changed the program itself.
    Drift(DriftProblem),
    /// An unrecognized or inconsistent option was supplied.
    InvalidOption(String),
    /// A file needs changes but the caller asked for dry-run failure.
    Dirty(std::path::PathBuf),
}

impl StyleError {
    /// A one-line problem statement and a longer explanation, following
    /// the same split the parser errors use for terminal presentation.
    pub fn message(&self) -> (String, String) {
        match self {
            StyleError::Load(details) => ("Unable to read input".to_string(), details.clone()),
            StyleError::Parse(parse) => (
                format!("Invalid syntax at {}", parse.location),
                parse
                    .problem
                    .clone(),
            ),
            StyleError::Drift(drift) => (
                "Styling would have changed the program".to_string(),
                format!(
                    "After styling, the token '{}' appeared where '{}' was expected. \
                     The result has been discarded and the original text kept.",
                    drift.found, drift.expected
                ),
            ),
            StyleError::InvalidOption(details) => ("Invalid option".to_string(), details.clone()),
            StyleError::Dirty(path) => (
                "Changes needed".to_string(),
                format!(
                    "{} is not styled according to the guide and dry mode is 'fail'.",
                    path.display()
                ),
            ),
        }
    }
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (problem, details) = self.message();
        write!(f, "{}: {}", problem, details)
    }
}

impl std::error::Error for StyleError {}

/// Format an error with full details: the problem statement, the offending
/// source line behind a line-number gutter, an underline covering the
/// token under the cursor, and the longer explanation.
pub fn full_error(error: &StyleError, filename: &Path, source: &str) -> String {
    let (problem, details) = error.message();

    let StyleError::Parse(parse) = error else {
        return format!("{}: {}\n{}", "error".bright_red(), problem.bold(), details);
    };

    let line = parse
        .location
        .line as usize;
    let col = parse
        .location
        .col as usize;
    let code = source
        .lines()
        .nth(line - 1)
        .unwrap_or("");

    // gutter wide enough for the line number, minimum two columns
    let gutter = line
        .to_string()
        .len()
        .max(2);

    // the underline spans from the cursor to the end of whatever token
    // sits there, never less than one column
    let reach = code
        .chars()
        .skip(col - 1)
        .take_while(|c| !c.is_whitespace())
        .count()
        .max(1);

    // pad before colouring; escape codes would defeat the width
    let number = format!("{:>gutter$}", line);

    let mut out = String::new();
    out.push_str(&format!(
        "{}: {}:{}\n",
        "error".bright_red(),
        filename.display(),
        parse.location
    ));
    out.push_str(&format!("{}\n\n", problem.bold()));
    out.push_str(&format!(
        "{} {} {}\n",
        number.bright_cyan(),
        ">".bright_cyan(),
        code
    ));
    out.push_str(&format!(
        "{} {} {}{}\n",
        " ".repeat(gutter),
        ">".bright_cyan(),
        " ".repeat(col - 1),
        "~"
            .repeat(reach)
            .bright_red()
    ));
    out.push('\n');
    out.push_str(&details);
    out
}

/// Format an error as a single line suitable for batch output.
pub fn concise_error(error: &StyleError, filename: &Path) -> String {
    let (problem, _) = error.message();
    match error {
        StyleError::Parse(parse) => format!(
            "{}: {} at {}:{}",
            "error".bright_red(),
            problem,
            filename.display(),
            parse.location
        ),
        _ => format!("{}: {}: {}", "error".bright_red(), filename.display(), problem),
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn messages() {
        let error = StyleError::Parse(ParseProblem {
            location: Location { line: 3, col: 7 },
            problem: "unexpected ')'".to_string(),
        });
        let (problem, details) = error.message();
        assert_eq!(problem, "Invalid syntax at 3:7");
        assert_eq!(details, "unexpected ')'");
    }

    #[test]
    fn drift_carries_hint() {
        let error = StyleError::Drift(DriftProblem {
            expected: "x".to_string(),
            found: "y".to_string(),
        });
        let (_, details) = error.message();
        assert!(details.contains("'y'"));
        assert!(details.contains("'x'"));
    }
}
