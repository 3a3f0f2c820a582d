//! Options accepted by the styling entry points

use std::path::{Path, PathBuf};

use crate::language::Kind;
use crate::problem::StyleError;

/// Invasiveness of styling. Each level includes the less invasive ones:
/// spaces ⊂ indention ⊂ line_breaks ⊂ tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    Spaces,
    Indention,
    LineBreaks,
    Tokens,
}

impl Scope {
    pub fn includes(self, other: Scope) -> bool {
        self >= other
    }

    pub fn parse(name: &str) -> Result<Scope, StyleError> {
        match name {
            "spaces" => Ok(Scope::Spaces),
            "indention" => Ok(Scope::Indention),
            "line_breaks" => Ok(Scope::LineBreaks),
            "tokens" => Ok(Scope::Tokens),
            _ => Err(StyleError::InvalidOption(format!(
                "unknown scope '{}' (expected spaces, indention, line_breaks, or tokens)",
                name
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Spaces => "spaces",
            Scope::Indention => "indention",
            Scope::LineBreaks => "line_breaks",
            Scope::Tokens => "tokens",
        }
    }
}

/// What to do with the styled result of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dry {
    /// Write the result back to the file.
    Off,
    /// Leave the file alone, only report whether it would change.
    On,
    /// Leave the file alone and fail if a change would be needed.
    Fail,
}

impl Dry {
    pub fn parse(name: &str) -> Result<Dry, StyleError> {
        match name {
            "off" => Ok(Dry::Off),
            "on" => Ok(Dry::On),
            "fail" => Ok(Dry::Fail),
            _ => Err(StyleError::InvalidOption(format!(
                "unknown dry mode '{}' (expected off, on, or fail)",
                name
            ))),
        }
    }
}

/// Recognized input flavours, determined from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    R,
    Rprofile,
    Rmd,
    Rmarkdown,
    Rnw,
    Qmd,
}

impl FileType {
    pub fn parse(name: &str) -> Result<FileType, StyleError> {
        match name
            .trim_start_matches('.')
            .to_ascii_lowercase()
            .as_str()
        {
            "r" => Ok(FileType::R),
            "rprofile" => Ok(FileType::Rprofile),
            "rmd" => Ok(FileType::Rmd),
            "rmarkdown" => Ok(FileType::Rmarkdown),
            "rnw" => Ok(FileType::Rnw),
            "qmd" => Ok(FileType::Qmd),
            _ => Err(StyleError::InvalidOption(format!(
                "unknown filetype '{}'",
                name
            ))),
        }
    }

    /// Detect the flavour of a path, if it is one we recognize.
    pub fn of_path(path: &Path) -> Option<FileType> {
        let name = path
            .file_name()?
            .to_str()?;
        if name.eq_ignore_ascii_case(".rprofile") || name.eq_ignore_ascii_case("rprofile") {
            return Some(FileType::Rprofile);
        }
        let extension = path
            .extension()?
            .to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "r" => Some(FileType::R),
            "rmd" => Some(FileType::Rmd),
            "rmarkdown" => Some(FileType::Rmarkdown),
            "rnw" => Some(FileType::Rnw),
            "qmd" => Some(FileType::Qmd),
            _ => None,
        }
    }

    /// Literate documents carry code in chunks; plain scripts are styled
    /// wholesale.
    pub fn is_literate(self) -> bool {
        matches!(self, FileType::Rmd | FileType::Rmarkdown | FileType::Rnw | FileType::Qmd)
    }
}

/// Which math operators attract spaces and which are set tight. `strict`
/// styling applies these exactly; relaxed styling only adds the missing
/// spaces for the `one` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathTokenSpacing {
    pub zero: Vec<Kind>,
    pub one: Vec<Kind>,
}

impl Default for MathTokenSpacing {
    fn default() -> MathTokenSpacing {
        MathTokenSpacing {
            zero: vec![Kind::Caret],
            one: vec![Kind::Plus, Kind::Minus, Kind::Star, Kind::Slash],
        }
    }
}

impl MathTokenSpacing {
    /// Stable identity of this spec, fed into the cache hash.
    pub fn signature(&self) -> String {
        format!("zero={:?};one={:?}", self.zero, self.one)
    }
}

/// Reindention applied to comment-embedded code. Disabled in the shipped
/// guide; carried because its identity feeds the cache hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reindention {
    pub enabled: bool,
    pub indent_by: usize,
}

impl Reindention {
    pub fn none() -> Reindention {
        Reindention {
            enabled: false,
            indent_by: 0,
        }
    }

    pub fn signature(&self) -> String {
        format!("enabled={};indent_by={}", self.enabled, self.indent_by)
    }
}

impl Default for Reindention {
    fn default() -> Reindention {
        Reindention::none()
    }
}

/// Knobs that shape a style guide.
#[derive(Debug, Clone)]
pub struct GuideOptions {
    pub scope: Scope,
    pub strict: bool,
    pub indent_by: usize,
    pub base_indention: usize,
    pub include_roxygen_examples: bool,
    pub math_spacing: MathTokenSpacing,
    pub reindention: Reindention,
}

impl Default for GuideOptions {
    fn default() -> GuideOptions {
        GuideOptions {
            scope: Scope::Tokens,
            strict: true,
            indent_by: 2,
            base_indention: 0,
            include_roxygen_examples: true,
            math_spacing: MathTokenSpacing::default(),
            reindention: Reindention::none(),
        }
    }
}

/// Knobs for the file-level entry points.
#[derive(Debug, Clone)]
pub struct FileOptions {
    pub dry: Dry,
    pub filetypes: Vec<FileType>,
    pub exclude_files: Vec<PathBuf>,
    pub exclude_dirs: Vec<PathBuf>,
    pub cache: bool,
}

impl Default for FileOptions {
    fn default() -> FileOptions {
        FileOptions {
            dry: Dry::Off,
            filetypes: vec![
                FileType::R,
                FileType::Rprofile,
                FileType::Rmd,
                FileType::Rmarkdown,
                FileType::Rnw,
                FileType::Qmd,
            ],
            exclude_files: Vec::new(),
            exclude_dirs: vec![PathBuf::from("renv"), PathBuf::from("packrat")],
            cache: true,
        }
    }
}
