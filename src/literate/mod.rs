//! Literate documents
//!
//! R Markdown and Quarto documents carry code in fenced chunks opened with
//! ```` ```{r} ```` and closed with ```` ``` ````; Sweave documents open
//! chunks with `<<...>>=` and close them with `@`. Only the chunk bodies
//! are styled; the surrounding prose is copied through unchanged. A chunk
//! that does not parse is left as written.

use tracing::warn;

use crate::pattern;
use crate::guides::StyleGuide;
use crate::language::FileType;
use crate::problem::StyleError;
use crate::styling::{style_text_with, Store, Styled};

pub fn style_document(
    source: &str,
    filetype: FileType,
    guide: &StyleGuide,
    store: &dyn Store,
) -> Result<Styled, StyleError> {
    let chunks: (fn(&str) -> bool, fn(&str) -> bool) = match filetype {
        FileType::Rnw => (is_noweb_open, is_noweb_close),
        _ => (is_fence_open, is_fence_close),
    };
    let (is_open, is_close) = chunks;

    let lines: Vec<&str> = source
        .lines()
        .collect();
    let mut out: Vec<String> = Vec::new();
    let mut changed = false;

    let mut i = 0;
    while i < lines.len() {
        if !is_open(lines[i]) {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        }

        out.push(lines[i].to_string());
        i += 1;
        let body_from = i;
        while i < lines.len() && !is_close(lines[i]) {
            i += 1;
        }

        if i == lines.len() {
            // unclosed chunk; copy the remainder untouched
            warn!("unclosed code chunk; leaving it unstyled");
            for line in &lines[body_from..] {
                out.push(line.to_string());
            }
            break;
        }

        let body = lines[body_from..i].join("\n");
        match style_text_with(&body, guide, store) {
            Ok(styled) => {
                changed = changed || styled.changed;
                for line in styled
                    .text
                    .trim_end_matches('\n')
                    .lines()
                {
                    out.push(line.to_string());
                }
                if styled
                    .text
                    .is_empty()
                    && !body.is_empty()
                {
                    changed = true;
                }
            }
            Err(error) => {
                warn!("code chunk left unstyled: {}", error);
                for line in &lines[body_from..i] {
                    out.push(line.to_string());
                }
            }
        }

        out.push(lines[i].to_string());
        i += 1;
    }

    let mut text = out.join("\n");
    if source.ends_with('\n') {
        text.push('\n');
    }

    Ok(Styled {
        changed: changed || text != source,
        text,
    })
}

fn is_fence_open(line: &str) -> bool {
    pattern!(r"^\s*```+\s*\{\s*[rR]\b[^}]*\}\s*$").is_match(line)
}

fn is_fence_close(line: &str) -> bool {
    pattern!(r"^\s*```+\s*$").is_match(line)
}

fn is_noweb_open(line: &str) -> bool {
    pattern!(r"^<<[^>]*>>=\s*$").is_match(line)
}

fn is_noweb_close(line: &str) -> bool {
    pattern!(r"^@\s*$").is_match(line)
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::guides;
    use crate::styling::NoStore;

    #[test]
    fn fences_are_recognized() {
        assert!(is_fence_open("```{r}"));
        assert!(is_fence_open("```{r setup, echo=FALSE}"));
        assert!(is_fence_open("  ```{R}"));
        assert!(!is_fence_open("```"));
        assert!(!is_fence_open("```{python}"));
        assert!(is_fence_close("```"));
        assert!(is_fence_close("  ``` "));
    }

    #[test]
    fn only_chunk_bodies_change() {
        let document = "# Title\n\nSome prose with a<-1 in it.\n\n```{r}\na<-1\n```\n\nMore prose.\n";
        let styled = style_document(
            document,
            FileType::Rmd,
            &guides::tidy(),
            &NoStore,
        )
        .unwrap();
        assert!(styled.changed);
        assert!(styled
            .text
            .contains("a <- 1"));
        assert!(styled
            .text
            .contains("Some prose with a<-1 in it."));
    }

    #[test]
    fn broken_chunks_are_left_alone() {
        let document = "```{r}\nf(\n```\n";
        let styled = style_document(
            document,
            FileType::Rmd,
            &guides::tidy(),
            &NoStore,
        )
        .unwrap();
        assert!(styled
            .text
            .contains("f("));
    }

    #[test]
    fn noweb_chunks() {
        let document = "\\section{Intro}\n<<setup>>=\nx<-2\n@\nText.\n";
        let styled = style_document(
            document,
            FileType::Rnw,
            &guides::tidy(),
            &NoStore,
        )
        .unwrap();
        assert!(styled
            .text
            .contains("x <- 2"));
        assert!(styled
            .text
            .contains("\\section{Intro}"));
    }
}
