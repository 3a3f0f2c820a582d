// The styling engine: parse table in, styled text out

use tracing::debug;

use crate::guides::StyleGuide;
use crate::language::Scope;
use crate::problem::StyleError;

pub mod cache;
pub mod ignore;
pub mod nest;
pub mod normalize;
pub mod roundtrip;
pub mod roxygen;
pub mod serialize;
pub mod visit;

pub use cache::{DirStore, NoStore, Store};

/// The result of one styling job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styled {
    pub text: String,
    pub changed: bool,
}

/// Style a text buffer without consulting any cache.
pub fn style_text(source: &str, guide: &StyleGuide) -> Result<Styled, StyleError> {
    style_text_with(source, guide, &NoStore)
}

/// Style a text buffer. The pipeline: roxygen example pre-pass, parse to a
/// flat table, tag ignore regions, drop cached expressions, nest,
/// normalize, apply the guide's rule phases, serialize, validate the
/// round trip, record fresh cache entries.
pub fn style_text_with(
    source: &str,
    guide: &StyleGuide,
    store: &dyn Store,
) -> Result<Styled, StyleError> {
    guide.validate()?;

    if source.is_empty() {
        return Ok(Styled {
            text: String::new(),
            changed: false,
        });
    }

    let markers = ignore::markers();

    let working = if guide.include_roxygen_examples {
        roxygen::style_examples(source, guide, markers)
    } else {
        source.to_string()
    };

    let mut rows = crate::parsing::parse(&working)?;
    if !ignore::mark_verbatim(&mut rows, markers) {
        return Ok(Styled {
            text: source.to_string(),
            changed: false,
        });
    }

    // a base indention shifts every emitted line, which recorded hashes
    // know nothing about, so the cache only serves unshifted jobs
    let caching = guide.base_indention == 0;
    if caching {
        cache::prefilter(&mut rows, &working, guide, store);
    }

    let mut root = nest::nest(rows);
    normalize::normalize(&mut root, caching);
    cache::terminalize_cached(&mut root);

    visit::apply_guide(&mut root, guide);
    ignore::restore_verbatim(&mut root);

    let styled = serialize::serialize(&mut root, guide);

    if guide.scope != Scope::Tokens {
        roundtrip::verify(&working, &styled)?;
    }
    if caching {
        cache::record(&styled, guide, store);
    }

    let changed = styled != source;
    debug!(changed, bytes = styled.len(), "styled");

    Ok(Styled {
        changed,
        text: styled,
    })
}
