use crate::app::models::{Configuration, ExclusionRule, HeadingStyle, Scheme};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const SEPARATOR: &str = "---";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(
        "structured exclusions (line {structured_line}) cannot be combined with glob excludes (line {glob_line})"
    )]
    MixedSchemes {
        structured_line: usize,
        glob_line: usize,
    },
    #[error("line {line}: invalid value {value:?} for `{key}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("basedir is required")]
    MissingBaseDir,
    #[error("basedir must be an absolute path when glob excludes are used: {0}")]
    RelativeBaseDirNotAllowed(PathBuf),
    #[error("basedir does not exist or is not a directory: {0}")]
    BaseDirNotFound(PathBuf),
    #[error("at least one include entry is required")]
    NoIncludesSpecified,
    #[error("failed to determine the current directory")]
    WorkingDir(#[source] io::Error),
}

/// Reads and parses the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Configuration> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {:?}", path))?;
    parse(&text).with_context(|| format!("Failed to parse {:?}", path))
}

/// Splits `text` at the first bare `---` line into header text and directives.
///
/// Unknown keys and lines without `=` are skipped. Without a separator there
/// are no directives at all.
pub fn parse(text: &str) -> Result<Configuration, ParseError> {
    let mut config = Configuration::default();
    let mut header_lines = Vec::new();
    let mut in_header = true;

    let mut explicit_scheme: Option<(Scheme, usize)> = None;
    let mut structured_line = None;
    let mut glob_line = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if line == SEPARATOR {
            if in_header {
                in_header = false;
                config.header_text = header_lines.join("\n");
            }
            continue;
        }
        if in_header {
            header_lines.push(line);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "basedir" => config.base_dir = PathBuf::from(value),
            "include" if !value.is_empty() => config.includes.push(value.to_string()),
            "exclude" if !value.is_empty() => {
                glob_line.get_or_insert(line_no);
                config.exclusions.push(ExclusionRule::Glob(value.to_string()));
            }
            "excludefolder" if !value.is_empty() => {
                structured_line.get_or_insert(line_no);
                let name = value.trim_end_matches(['/', '\\']);
                config
                    .exclusions
                    .push(ExclusionRule::FolderName(name.to_string()));
            }
            "excludeextension" if !value.is_empty() => {
                structured_line.get_or_insert(line_no);
                config
                    .exclusions
                    .push(ExclusionRule::Extension(normalize_extension(value)));
            }
            "excludefile" if !value.is_empty() => {
                structured_line.get_or_insert(line_no);
                config
                    .exclusions
                    .push(ExclusionRule::ExactPath(normalize_relative(value)));
            }
            "heading" => {
                config.heading = match value.to_lowercase().as_str() {
                    "relative" => HeadingStyle::Relative,
                    "absolute" => HeadingStyle::Absolute,
                    _ => return Err(invalid(line_no, &key, value)),
                }
            }
            "scheme" => {
                let scheme = match value.to_lowercase().as_str() {
                    "structured" => Scheme::Structured,
                    "glob" => Scheme::Glob,
                    _ => return Err(invalid(line_no, &key, value)),
                };
                explicit_scheme = Some((scheme, line_no));
            }
            _ => {}
        }
    }

    if let (Some(structured_line), Some(glob_line)) = (structured_line, glob_line) {
        return Err(ParseError::MixedSchemes {
            structured_line,
            glob_line,
        });
    }

    config.scheme = match explicit_scheme {
        Some((Scheme::Structured, line)) if glob_line.is_some() => {
            return Err(ParseError::MixedSchemes {
                structured_line: line,
                glob_line: glob_line.unwrap_or_default(),
            })
        }
        Some((Scheme::Glob, line)) if structured_line.is_some() => {
            return Err(ParseError::MixedSchemes {
                structured_line: structured_line.unwrap_or_default(),
                glob_line: line,
            })
        }
        Some((scheme, _)) => scheme,
        None if glob_line.is_some() => Scheme::Glob,
        None if structured_line.is_some() => Scheme::Structured,
        None if config.includes.iter().any(|i| is_glob(i)) => Scheme::Glob,
        None => Scheme::Structured,
    };

    Ok(config)
}

impl Configuration {
    /// Validates against the process working directory.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        let cwd = env::current_dir().map_err(ValidationError::WorkingDir)?;
        self.validate_from(&cwd)
    }

    /// Makes `base_dir` absolute (structured scheme only) and checks that it
    /// exists and that there is something to include.
    pub fn validate_from(&mut self, cwd: &Path) -> Result<(), ValidationError> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingBaseDir);
        }

        if self.base_dir.is_relative() {
            match self.scheme {
                Scheme::Structured => self.base_dir = lexical_clean(&cwd.join(&self.base_dir)),
                Scheme::Glob => {
                    return Err(ValidationError::RelativeBaseDirNotAllowed(
                        self.base_dir.clone(),
                    ))
                }
            }
        }

        if !self.base_dir.is_dir() {
            return Err(ValidationError::BaseDirNotFound(self.base_dir.clone()));
        }

        if self.includes.is_empty() {
            return Err(ValidationError::NoIncludesSpecified);
        }

        Ok(())
    }
}

fn invalid(line: usize, key: &str, value: &str) -> ParseError {
    ParseError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// `json` and `.json` become `*.json`; values already starting with `*` are kept.
fn normalize_extension(value: &str) -> String {
    if value.starts_with('*') {
        value.to_string()
    } else {
        format!("*.{}", value.trim_start_matches('.'))
    }
}

/// Forward slashes, no leading `./`.
pub fn normalize_relative(value: &str) -> String {
    let slashed = value.replace('\\', "/");
    let mut trimmed = slashed.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

fn is_glob(value: &str) -> bool {
    value.contains(['*', '?', '['])
}

/// Drops `.` components and folds `..` into the preceding normal component,
/// without touching the filesystem. `..` above the root is dropped; leading
/// `..` of a relative path is kept.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts.iter().collect()
}
