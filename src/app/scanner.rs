use crate::app::classifier::is_binary;
use crate::app::config::{lexical_clean, normalize_relative};
use crate::app::filter::{slash_path, PathFilter};
use crate::app::models::{Configuration, Scheme, SelectedFile};
use anyhow::{anyhow, Result};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Scanner<'a> {
    config: &'a Configuration,
    filter: PathFilter,
}

impl<'a> Scanner<'a> {
    /// `config` must already be validated.
    pub fn new(config: &'a Configuration) -> Result<Self> {
        Ok(Self {
            config,
            filter: PathFilter::new(config)?,
        })
    }

    /// Produces the selected files in output order.
    ///
    /// Structured includes are scanned one after another; the glob scheme
    /// walks the whole base directory once. Children are visited in sorted
    /// name order.
    pub fn scan(&self) -> Result<Vec<SelectedFile>> {
        let mut selection = Selection::default();

        match self.config.scheme {
            Scheme::Glob => self.walk(&self.config.base_dir, None, &mut selection)?,
            Scheme::Structured => {
                for include in &self.config.includes {
                    self.scan_include(include, &mut selection)?;
                }
            }
        }

        Ok(selection.files)
    }

    fn scan_include(&self, include: &str, selection: &mut Selection) -> Result<()> {
        let path = lexical_clean(&self.config.base_dir.join(include));
        let prefix = lexical_clean(Path::new(include));

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(err) => {
                log::warn!("Skipping include {:?}: {}", include, err);
                return Ok(());
            }
        };

        if metadata.is_dir() {
            self.walk(&path, Some(prefix.as_path()), selection)
        } else {
            self.consider(path, normalize_relative(&slash_path(&prefix)), selection);
            Ok(())
        }
    }

    /// Recursive walk of `root`. Relative paths are taken from `root` and, when
    /// given, re-prefixed with the cleaned include entry that named it.
    ///
    /// Directory symlinks are never followed, so descent stays under `root`.
    /// A symlink to a regular file is read as that file even when its target
    /// lies outside the base directory.
    fn walk(&self, root: &Path, prefix: Option<&Path>, selection: &mut Selection) -> Result<()> {
        if self.filter.is_excluded_folder(root) {
            log::debug!("Pruned folder: {}", root.display());
            return Ok(());
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        if self.filter.prunes_folders() {
            let folders = self.filter.clone();
            builder.filter_entry(move |entry| {
                let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
                if is_dir && folders.is_excluded_folder(entry.path()) {
                    log::debug!("Pruned folder: {}", entry.path().display());
                    return false;
                }
                true
            });
        }

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if err.io_error().is_some() => {
                    log::warn!("Error walking entry: {}", err);
                    continue;
                }
                Err(err) => return Err(anyhow!("Error walking {}: {}", root.display(), err)),
            };

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() || (file_type.is_symlink() && !entry.path().is_file()) {
                continue;
            }

            let Ok(within_root) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = match prefix {
                Some(include) => include.join(within_root),
                None => within_root.to_path_buf(),
            };

            self.consider(
                entry.path().to_path_buf(),
                normalize_relative(&slash_path(&relative)),
                selection,
            );
        }

        Ok(())
    }

    fn consider(&self, path: PathBuf, relative_path: String, selection: &mut Selection) {
        if self.filter.is_excluded(&path, &self.config.base_dir) {
            log::debug!("Excluded: {}", relative_path);
            return;
        }

        match is_binary(&path) {
            Ok(false) => selection.push(SelectedFile {
                relative_path,
                absolute_path: path,
            }),
            Ok(true) => log::warn!("Skipping binary file: {}", relative_path),
            Err(err) => log::warn!("Skipping unreadable file {}: {}", relative_path, err),
        }
    }
}

/// Accumulated result; a file reachable through two includes is kept once,
/// at its first position.
#[derive(Default)]
struct Selection {
    files: Vec<SelectedFile>,
    seen: HashSet<PathBuf>,
}

impl Selection {
    fn push(&mut self, file: SelectedFile) {
        if self.seen.insert(file.absolute_path.clone()) {
            self.files.push(file);
        }
    }
}
