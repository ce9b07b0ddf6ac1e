use std::path::PathBuf;

/// Which family of exclusion directives a configuration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Folder names, extensions and explicit file paths. Includes are paths.
    #[default]
    Structured,
    /// Base-name globs for both includes and excludes.
    Glob,
}

/// One configured predicate that removes a file or a whole subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// Matches the final segment of a directory; prunes the subtree.
    FolderName(String),
    /// Normalized `*.ext` pattern, matched case-sensitively on the file name.
    Extension(String),
    /// Slash-normalized path relative to the base directory, or a bare file name.
    ExactPath(String),
    /// Base-name glob pattern.
    Glob(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HeadingStyle {
    /// Path relative to the base directory.
    #[default]
    Relative,
    /// Resolved absolute path.
    Absolute,
}

/// The parsed scan configuration, immutable once validated.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub header_text: String,
    pub base_dir: PathBuf,
    pub includes: Vec<String>,
    pub exclusions: Vec<ExclusionRule>,
    pub scheme: Scheme,
    pub heading: HeadingStyle,
}

/// A file chosen for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Slash-separated, relative to the base directory.
    pub relative_path: String,
    pub absolute_path: PathBuf,
}
