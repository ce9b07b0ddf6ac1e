use crate::app::models::{Configuration, HeadingStyle, SelectedFile};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Writes the header (if any) and one section per file, in order.
    ///
    /// File content is copied byte for byte. Fence sequences inside a file
    /// are not escaped.
    pub fn render<W: Write>(
        config: &Configuration,
        files: &[SelectedFile],
        out: &mut W,
    ) -> Result<()> {
        if !config.header_text.is_empty() {
            writeln!(out, "{}", config.header_text)?;
            writeln!(out)?;
        }

        for file in files {
            let content = fs::read(&file.absolute_path)
                .with_context(|| format!("Error reading file {}", file.relative_path))?;

            writeln!(out, "# {}", Self::heading(config.heading, file))?;
            writeln!(out, "```")?;
            out.write_all(&content)?;
            writeln!(out)?;
            writeln!(out, "```")?;
            writeln!(out)?;
        }

        Ok(())
    }

    fn heading(style: HeadingStyle, file: &SelectedFile) -> String {
        match style {
            HeadingStyle::Relative => file.relative_path.clone(),
            HeadingStyle::Absolute => file.absolute_path.display().to_string(),
        }
    }

    /// Plain listing used by `--dry-run`.
    pub fn listing(files: &[SelectedFile]) -> String {
        files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn render(config: &Configuration, files: &[SelectedFile]) -> String {
        let mut buf = Vec::new();
        OutputGenerator::render(config, files, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_then_fenced_sections() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package main\n").unwrap();
        fs::write(dir.path().join("b.go"), "package b").unwrap();

        let config = Configuration {
            header_text: "Context for review\n\nPlease read.".into(),
            base_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let files = vec![
            SelectedFile {
                relative_path: "a.go".into(),
                absolute_path: dir.path().join("a.go"),
            },
            SelectedFile {
                relative_path: "b.go".into(),
                absolute_path: dir.path().join("b.go"),
            },
        ];

        assert_eq!(
            render(&config, &files),
            "Context for review\n\nPlease read.\n\n\
             # a.go\n```\npackage main\n\n```\n\n\
             # b.go\n```\npackage b\n```\n\n"
        );
    }

    #[test]
    fn empty_header_and_no_files_is_empty() {
        assert_eq!(render(&Configuration::default(), &[]), "");
    }

    #[test]
    fn absolute_heading_uses_resolved_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.txt");
        fs::write(&path, "x").unwrap();

        let config = Configuration {
            heading: HeadingStyle::Absolute,
            ..Default::default()
        };
        let files = vec![SelectedFile {
            relative_path: "x.txt".into(),
            absolute_path: path.clone(),
        }];

        let out = render(&config, &files);
        assert!(out.starts_with(&format!("# {}\n", path.display())));
    }

    #[test]
    fn fences_inside_content_are_not_escaped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "```rust\nfn main() {}\n```").unwrap();

        let files = vec![SelectedFile {
            relative_path: "README.md".into(),
            absolute_path: path,
        }];
        let out = render(&Configuration::default(), &files);
        assert!(out.contains("```\n```rust\nfn main() {}\n```\n```\n"));
    }

    #[test]
    fn unreadable_file_is_fatal_with_path() {
        let dir = tempdir().unwrap();
        let files = vec![SelectedFile {
            relative_path: "gone.rs".into(),
            absolute_path: dir.path().join("gone.rs"),
        }];
        let mut buf = Vec::new();
        let err = OutputGenerator::render(&Configuration::default(), &files, &mut buf).unwrap_err();
        assert!(err.to_string().contains("gone.rs"));
    }
}
