use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn cmd() -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("code_context_md");
    c.env_remove("RUST_LOG");
    c
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Source tree under `src/`, config and output next to it.
fn project(files: &[(&str, &str)], config: &str) -> TempDir {
    let dir = tempdir().unwrap();
    for (rel, content) in files {
        write(&dir.path().join("tree"), rel, content);
    }
    let config = config.replace("{base}", &dir.path().join("tree").display().to_string());
    fs::write(dir.path().join("input.txt"), config).unwrap();
    dir
}

fn run(dir: &TempDir) -> assert_cmd::assert::Assert {
    cmd()
        .current_dir(dir.path())
        .arg("--input")
        .arg(dir.path().join("input.txt"))
        .arg("--output")
        .arg(dir.path().join("output.md"))
        .assert()
}

fn output(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("output.md")).unwrap()
}

#[test]
fn structured_scheme_end_to_end() {
    let dir = project(
        &[
            ("src/a.go", "package main\n"),
            ("src/b.json", "{}\n"),
            ("src/sub/c.go", "package sub\n"),
        ],
        "Review these files.\n---\nbasedir={base}\ninclude=src\nexcludeextension=json\n",
    );

    run(&dir).success();

    assert_eq!(
        output(&dir),
        "Review these files.\n\n\
         # src/a.go\n```\npackage main\n\n```\n\n\
         # src/sub/c.go\n```\npackage sub\n\n```\n\n"
    );
}

#[test]
fn glob_scheme_end_to_end() {
    let dir = project(
        &[
            ("main.go", "package main\n"),
            ("main_test.go", "package main\n"),
            ("util.go", "package main\n"),
        ],
        "---\nbasedir={base}\ninclude=*.go\nexclude=*_test.go\n",
    );

    run(&dir).success();

    let out = output(&dir);
    assert!(out.contains("# main.go\n"));
    assert!(out.contains("# util.go\n"));
    assert!(!out.contains("main_test.go"));
    assert!(out.find("# main.go").unwrap() < out.find("# util.go").unwrap());
}

#[test]
fn relative_base_dir_resolves_against_working_directory() {
    let dir = project(
        &[("src/lib.rs", "pub fn f() {}\n")],
        "---\nbasedir=tree\ninclude=src\nheading=absolute\n",
    );

    run(&dir).success();

    let cwd = fs::canonicalize(dir.path()).unwrap();
    let expected = cwd.join("tree").join("src").join("lib.rs");
    assert!(output(&dir).starts_with(&format!("# {}\n", expected.display())));
}

#[test]
fn glob_scheme_rejects_relative_base_dir() {
    let dir = project(
        &[("main.go", "package main\n")],
        "---\nbasedir=tree\ninclude=*.go\n",
    );

    run(&dir)
        .failure()
        .code(1)
        .stderr(predicate::str::contains("absolute"));
}

#[test]
fn missing_includes_fail_before_writing() {
    let dir = project(&[("a.txt", "a\n")], "---\nbasedir={base}\n");

    run(&dir)
        .failure()
        .code(1)
        .stderr(predicate::str::contains("at least one include"));
    assert!(!dir.path().join("output.md").exists());
}

#[test]
fn fatal_errors_are_printed_with_logging_off() {
    let dir = project(&[("a.txt", "a\n")], "---\nbasedir={base}\n");

    cmd()
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .arg("--input")
        .arg(dir.path().join("input.txt"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Invalid configuration"));
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("input.txt"));
}

#[test]
fn zero_matches_is_a_warning() {
    let dir = project(
        &[("notes.md", "# notes\n")],
        "Header only\n---\nbasedir={base}\ninclude=*.go\n",
    );

    run(&dir)
        .success()
        .stderr(predicate::str::contains("No files found"));
    assert_eq!(output(&dir), "Header only\n\n");
}

#[test]
fn binary_files_are_skipped_with_warning() {
    let dir = project(&[("src/a.txt", "text\n")], "---\nbasedir={base}\ninclude=src\n");
    fs::write(dir.path().join("tree/src/blob.bin"), b"\x00\x01\x02").unwrap();

    run(&dir)
        .success()
        .stderr(predicate::str::contains("Skipping binary file: src/blob.bin"));
    assert!(!output(&dir).contains("blob.bin"));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = project(
        &[("z.rs", "z\n"), ("a/b.rs", "b\n"), ("m/n/o.rs", "o\n")],
        "---\nbasedir={base}\ninclude=.\n",
    );

    run(&dir).success();
    let first = output(&dir);
    run(&dir).success();
    assert_eq!(first, output(&dir));
}

#[test]
fn dry_run_lists_without_writing() {
    let dir = project(
        &[("src/a.go", "a\n"), ("src/b.go", "b\n")],
        "---\nbasedir={base}\ninclude=src\n",
    );

    cmd()
        .current_dir(dir.path())
        .arg("--input")
        .arg(dir.path().join("input.txt"))
        .arg("--output")
        .arg(dir.path().join("output.md"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/a.go\nsrc/b.go"));
    assert!(!dir.path().join("output.md").exists());
}
