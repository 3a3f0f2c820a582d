//! File-level entry points: single files, directory trees, and packages

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::guides::StyleGuide;
use crate::language::{Dry, FileOptions, FileType};
use crate::literate;
use crate::parsing;
use crate::problem::StyleError;
use crate::styling::{self, DirStore, NoStore, Store, Styled};

/// Package sub-directories that carry code.
const PKG_DIRS: [&str; 4] = ["R", "tests", "data-raw", "demo"];

/// Style one file in place. Returns whether the file needed changes.
pub fn style_file(
    path: &Path,
    guide: &StyleGuide,
    options: &FileOptions,
) -> Result<bool, StyleError> {
    let store = open_store(options);
    style_file_with(path, guide, options, store.as_ref())
}

fn style_file_with(
    path: &Path,
    guide: &StyleGuide,
    options: &FileOptions,
    store: &dyn Store,
) -> Result<bool, StyleError> {
    let Some(filetype) = FileType::of_path(path) else {
        return Err(StyleError::InvalidOption(format!(
            "{} is not a recognized input file",
            path.display()
        )));
    };

    let source = parsing::load(path)?;
    let styled = style_source(&source, filetype, guide, store)?;

    match options.dry {
        Dry::Off => {
            if styled.changed {
                info!("styling {}", path.display());
                std::fs::write(path, &styled.text)
                    .map_err(|e| StyleError::Load(format!("{}: {}", path.display(), e)))?;
            }
        }
        Dry::On => {}
        Dry::Fail => {
            if styled.changed {
                return Err(StyleError::Dirty(path.to_path_buf()));
            }
        }
    }

    Ok(styled.changed)
}

fn style_source(
    source: &str,
    filetype: FileType,
    guide: &StyleGuide,
    store: &dyn Store,
) -> Result<Styled, StyleError> {
    if filetype.is_literate() {
        literate::style_document(source, filetype, guide, store)
    } else {
        styling::style_text_with(source, guide, store)
    }
}

/// Style every recognized file under a directory. Results are reported in
/// path order so runs are reproducible.
pub fn style_dir(
    path: &Path,
    guide: &StyleGuide,
    options: &FileOptions,
    recursive: bool,
) -> Result<Vec<(PathBuf, bool)>, StyleError> {
    let store = open_store(options);
    style_dir_with(path, guide, options, recursive, store.as_ref())
}

fn style_dir_with(
    path: &Path,
    guide: &StyleGuide,
    options: &FileOptions,
    recursive: bool,
    store: &dyn Store,
) -> Result<Vec<(PathBuf, bool)>, StyleError> {
    let mut files = discover(path, options, recursive);
    files.sort();

    let mut results = Vec::new();
    for file in files {
        let changed = style_file_with(&file, guide, options, store)?;
        results.push((file, changed));
    }
    Ok(results)
}

/// Style the code directories of a source package. The root must carry a
/// DESCRIPTION file.
pub fn style_pkg(
    root: &Path,
    guide: &StyleGuide,
    options: &FileOptions,
) -> Result<Vec<(PathBuf, bool)>, StyleError> {
    if !root
        .join("DESCRIPTION")
        .exists()
    {
        return Err(StyleError::InvalidOption(format!(
            "{} is not a package root (no DESCRIPTION file)",
            root.display()
        )));
    }

    let store = open_store(options);
    let mut results = Vec::new();
    for dir in PKG_DIRS {
        let sub = root.join(dir);
        if sub.is_dir() {
            results.extend(style_dir_with(&sub, guide, options, true, store.as_ref())?);
        }
    }
    Ok(results)
}

/// Walk a directory for recognized, non-excluded input files. Hidden
/// directories are skipped; hidden files like `.Rprofile` are kept.
fn discover(path: &Path, options: &FileOptions, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(path);
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_entry(|entry| {
            if !entry
                .file_type()
                .is_dir()
            {
                return true;
            }
            if entry.depth() == 0 {
                return true;
            }
            let name = entry
                .file_name()
                .to_string_lossy()
                .to_string();
            if name.starts_with('.') {
                return false;
            }
            !options
                .exclude_dirs
                .iter()
                .any(|excluded| {
                    Path::new(&name) == excluded.as_path()
                        || entry
                            .path()
                            .ends_with(excluded)
                })
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_type()
                .is_file()
        })
        .map(|entry| {
            entry
                .path()
                .to_path_buf()
        })
        .filter(|file| {
            let Some(filetype) = FileType::of_path(file) else {
                return false;
            };
            if !options
                .filetypes
                .contains(&filetype)
            {
                return false;
            }
            !options
                .exclude_files
                .iter()
                .any(|excluded| file == excluded || file.ends_with(excluded))
        })
        .collect()
}

/// The store the options ask for. A broken cache directory only costs
/// speed, never correctness, so failures degrade to the disabled store.
fn open_store(options: &FileOptions) -> Box<dyn Store> {
    if !options.cache {
        return Box::new(NoStore);
    }
    let location = DirStore::default_location();
    match DirStore::open(&location) {
        Ok(store) => {
            debug!("cache at {}", location.display());
            Box::new(store)
        }
        Err(error) => {
            warn!(
                "unable to open cache at {}: {}; continuing without",
                location.display(),
                error
            );
            Box::new(NoStore)
        }
    }
}
