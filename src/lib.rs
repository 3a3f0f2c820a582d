//! refmt — a style-guide driven formatter for R-flavoured scripts
//!
//! The pipeline converts source text into a flat parse table (one row per
//! token, each row carrying a parent reference), nests that table into a
//! tree, walks the tree applying the rules of a style guide, and serializes
//! the result back to text. Regions bracketed by `refmt: off` / `refmt: on`
//! comments are preserved verbatim, and top-level expressions that already
//! conform to the guide are skipped via a content-addressed cache.

pub mod files;
pub mod guides;
pub mod language;
pub mod literate;
pub mod parsing;
pub mod problem;
pub mod regex;
pub mod styling;
