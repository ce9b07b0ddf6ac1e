use crate::app::models::{Configuration, ExclusionRule, Scheme};
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use pathdiff::diff_paths;
use std::path::Path;

/// Evaluates the configured exclusion rules (and, in the glob scheme, the
/// include patterns) against candidate paths.
#[derive(Debug, Clone)]
pub struct PathFilter {
    folder_names: Vec<String>,
    extensions: GlobSet,
    exact_paths: Vec<String>,
    excludes: GlobSet,
    /// Present only in the glob scheme, where includes are base-name patterns.
    includes: Option<GlobSet>,
}

impl PathFilter {
    pub fn new(config: &Configuration) -> Result<Self> {
        let mut folder_names = Vec::new();
        let mut extensions = Vec::new();
        let mut exact_paths = Vec::new();
        let mut excludes = Vec::new();

        for rule in &config.exclusions {
            match rule {
                ExclusionRule::FolderName(name) => folder_names.push(name.clone()),
                ExclusionRule::Extension(pattern) => extensions.push(pattern.clone()),
                ExclusionRule::ExactPath(path) => exact_paths.push(path.clone()),
                ExclusionRule::Glob(pattern) => excludes.push(pattern.clone()),
            }
        }

        let includes = match config.scheme {
            Scheme::Glob => Some(build_globset(&config.includes)?),
            Scheme::Structured => None,
        };

        Ok(Self {
            folder_names,
            extensions: build_globset(&extensions)?,
            exact_paths,
            excludes: build_globset(&excludes)?,
            includes,
        })
    }

    pub fn prunes_folders(&self) -> bool {
        !self.folder_names.is_empty()
    }

    /// True iff the directory's final segment equals an excluded folder name.
    pub fn is_excluded_folder(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |name| self.folder_names.iter().any(|f| f == name))
    }

    pub fn is_excluded_extension(&self, file: &Path) -> bool {
        matches_any_pattern(file, &self.extensions)
    }

    /// Matches either the slash-normalized path relative to `base_dir` or the
    /// bare file name.
    pub fn is_excluded_file(&self, file: &Path, base_dir: &Path) -> bool {
        if self.exact_paths.is_empty() {
            return false;
        }
        let name = file.file_name().map(|n| n.to_string_lossy());
        let relative = diff_paths(file, base_dir).map(|r| slash_path(&r));

        self.exact_paths.iter().any(|entry| {
            name.as_deref() == Some(entry.as_str()) || relative.as_deref() == Some(entry.as_str())
        })
    }

    /// Glob scheme only; structured includes are paths and always pass.
    pub fn is_included(&self, file: &Path) -> bool {
        self.includes
            .as_ref()
            .map_or(true, |set| matches_any_pattern(file, set))
    }

    /// Combined file-level verdict: include patterns, then every exclusion rule
    /// that applies to files.
    pub fn is_excluded(&self, file: &Path, base_dir: &Path) -> bool {
        !self.is_included(file)
            || matches_any_pattern(file, &self.excludes)
            || self.is_excluded_extension(file)
            || self.is_excluded_file(file, base_dir)
    }
}

/// Matches the base name of `path` against every pattern in `set`.
pub fn matches_any_pattern(path: &Path, set: &GlobSet) -> bool {
    path.file_name().map_or(false, |name| set.is_match(name))
}

/// Forward-slash rendering of a relative path.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Single-level globs: `*` never crosses a separator.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid glob pattern: {}", pat))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
