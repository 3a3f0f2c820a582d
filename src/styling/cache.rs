//! Expression-level cache
//!
//! Top-level expressions whose text already conforms to the guide are
//! skipped: a content hash of the expression text plus the guide identity
//! is looked up in a store, and on a hit the expression's descendants are
//! dropped from the table before nesting, leaving a shallow terminal row
//! that serializes its original text. After a successful run the output
//! hashes are recorded so the next run short-circuits.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::guides::StyleGuide;
use crate::language::{slice_span, Kind, Token};

/// The on-disk store interface. Entries carry no content; existence of the
/// hash is the whole answer, which makes concurrent recording idempotent.
pub trait Store {
    fn lookup(&self, hash: &str) -> bool;
    fn record(&self, hash: &str);
}

/// The disabled cache.
pub struct NoStore;

impl Store for NoStore {
    fn lookup(&self, _hash: &str) -> bool {
        false
    }

    fn record(&self, _hash: &str) {}
}

/// A directory of zero-byte files named by hex-encoded hash. I/O failures
/// are demoted to warnings; a broken cache only costs speed.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<DirStore> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(DirStore { root })
    }

    /// The per-version cache directory: `REFMT_CACHE_DIR` when set,
    /// otherwise `~/.cache/refmt/<version>`, otherwise under the system
    /// temporary directory.
    pub fn default_location() -> PathBuf {
        if let Ok(root) = std::env::var("REFMT_CACHE_DIR") {
            return PathBuf::from(root);
        }
        let version = concat!("v", env!("CARGO_PKG_VERSION"));
        match std::env::var("HOME") {
            Ok(home) => Path::new(&home)
                .join(".cache")
                .join("refmt")
                .join(version),
            Err(_) => std::env::temp_dir()
                .join("refmt-cache")
                .join(version),
        }
    }
}

impl Store for DirStore {
    fn lookup(&self, hash: &str) -> bool {
        self.root
            .join(hash)
            .exists()
    }

    fn record(&self, hash: &str) {
        let path = self
            .root
            .join(hash);
        if let Err(error) = std::fs::File::create(&path) {
            warn!("unable to record cache entry {}: {}", path.display(), error);
        }
    }
}

/// Hash of an expression's text under a given guide identity.
pub fn expression_hash(text: &str, guide: &StyleGuide) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([0]);
    hasher.update(
        guide
            .signature()
            .as_bytes(),
    );
    hex::encode(hasher.finalize())
}

/// Mark cached top-level expressions and drop their descendants before
/// nesting. Rows are grouped by the cumulative count of `parent == 0`
/// rows; within a cached group only rows with `parent <= 0` survive, which
/// keeps the shallow top-level row and any negative-parented leading
/// comments. Comments themselves are never cached.
pub fn prefilter(rows: &mut Vec<Token>, source: &str, guide: &StyleGuide, store: &dyn Store) {
    let mut group = 0u32;
    let groups: Vec<u32> = rows
        .iter()
        .map(|row| {
            if row.parent == 0 {
                group += 1;
            }
            group
        })
        .collect();

    let mut cached_groups = Vec::new();
    for (index, row) in rows
        .iter_mut()
        .enumerate()
    {
        if row.parent != 0 || matches!(row.kind, Kind::Comment | Kind::Semicolon) {
            continue;
        }
        let text = slice_span(source, row.line1, row.col1, row.line2, row.col2);
        if store.lookup(&expression_hash(&text, guide)) {
            row.is_cached = true;
            row.terminal = true;
            row.text = text;
            cached_groups.push(groups[index]);
        }
    }

    if cached_groups.is_empty() {
        return;
    }
    debug!(expressions = cached_groups.len(), "cache hits");

    let keep: Vec<bool> = groups
        .iter()
        .enumerate()
        .map(|(index, group)| !cached_groups.contains(group) || rows[index].parent <= 0)
        .collect();
    let mut keep = keep.into_iter();
    rows.retain(|_| {
        keep.next()
            .unwrap()
    });

    // the shallowed rows are terminals now; their whitespace columns were
    // computed before they were, so derive them again from the spans
    crate::parsing::initialize_whitespace(rows);
}

/// Pipeline-invoked rule: a cached expression stays a terminal with its
/// literal text even when it shares a block with uncached peers and the
/// whole block is re-processed.
pub fn terminalize_cached(root: &mut Token) {
    for child in root
        .children
        .iter_mut()
    {
        if child.is_cached {
            child.terminal = true;
            child
                .children
                .clear();
        }
    }
}

/// Record the hash of every top-level expression of the styled output, so
/// a future run over this text is a cache hit. The output re-parses by
/// construction; if it somehow does not, recording is skipped.
pub fn record(output: &str, guide: &StyleGuide, store: &dyn Store) {
    let rows = match crate::parsing::parse(output) {
        Ok(rows) => rows,
        Err(error) => {
            warn!("styled output does not re-parse; cache not updated: {}", error);
            return;
        }
    };

    for row in &rows {
        if row.parent != 0 || matches!(row.kind, Kind::Comment | Kind::Semicolon) {
            continue;
        }
        let text = slice_span(output, row.line1, row.col1, row.line2, row.col2);
        store.record(&expression_hash(&text, guide));
    }
}
