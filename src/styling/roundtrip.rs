//! Round-trip validation
//!
//! Whenever the scope keeps token rewrites out, styling must not change
//! the program: re-lexing the output has to give the same token sequence
//! as the input, ignoring comments (which may re-flow) and separator
//! semicolons (which are re-expressed as line breaks). On a mismatch the
//! styled text is discarded.

use crate::language::Kind;
use crate::parsing;
use crate::problem::{DriftProblem, StyleError};

pub fn verify(input: &str, output: &str) -> Result<(), StyleError> {
    let expected = significant(input)?;
    let found = match significant(output) {
        Ok(found) => found,
        Err(_) => {
            return Err(drift("<parseable input>", "<unparseable output>"));
        }
    };

    for (have, want) in found
        .iter()
        .zip(expected.iter())
    {
        if have != want {
            return Err(drift(&want.1, &have.1));
        }
    }
    if expected.len() != found.len() {
        if expected.len() > found.len() {
            return Err(drift(&expected[found.len()].1, "<end of output>"));
        }
        return Err(drift("<end of input>", &found[expected.len()].1));
    }
    Ok(())
}

fn drift(expected: &str, found: &str) -> StyleError {
    StyleError::Drift(DriftProblem {
        expected: expected.to_string(),
        found: found.to_string(),
    })
}

fn significant(source: &str) -> Result<Vec<(Kind, String)>, StyleError> {
    Ok(parsing::lex(source)?
        .into_iter()
        .filter(|lexeme| !matches!(lexeme.kind, Kind::Comment | Kind::Semicolon))
        .map(|lexeme| (lexeme.kind, lexeme.text))
        .collect())
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn whitespace_changes_pass() {
        assert!(verify("a<-1", "a <- 1\n").is_ok());
        assert!(verify("f( x,y )", "f(x, y)\n").is_ok());
    }

    #[test]
    fn dropped_semicolons_pass() {
        assert!(verify("a; b", "a\nb\n").is_ok());
    }

    #[test]
    fn comment_reflow_passes() {
        assert!(verify("x# note", "x # note\n").is_ok());
    }

    #[test]
    fn lost_tokens_fail() {
        let error = verify("a <- 1", "a <-\n").unwrap_err();
        assert!(matches!(error, StyleError::Drift(_)));
    }

    #[test]
    fn changed_tokens_fail() {
        let error = verify("a = 1", "a <- 1\n").unwrap_err();
        match error {
            StyleError::Drift(problem) => {
                assert_eq!(problem.expected, "=");
                assert_eq!(problem.found, "<-");
            }
            other => panic!("expected drift, got {:?}", other),
        }
    }
}
