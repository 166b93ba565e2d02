use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const NASM_SOURCE: &str = "\
%macro PUSH 1
  ADD R6, R6, #-1
  STR %1, R6, #0
%endmacro
main: PUSH R0 ; save
  HALT
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(contents.as_bytes()).expect("write fixture");
    path
}

#[test]
fn highlights_with_default_dialect() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "prog.asm", ".ORIG x3000\nADD R1, R1, #1 ; bump\n");

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(&path);
    cmd.assert().success().stdout(
        predicate::str::contains("1:0..5 support.function.directive.assembly \".ORIG\"")
            .and(predicate::str::contains("2:0..3 keyword.control.assembly \"ADD\""))
            .and(predicate::str::contains("comment.assembly \"; bump\"")),
    );
}

#[test]
fn json_output_reports_nested_contexts_and_folds() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "macros.asm", NASM_SOURCE);

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(&path)
        .args(["--dialect", "lc3-nasm", "--format", "json", "--folds"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(report["language"], "lc3-nasm");
    assert_eq!(report["lines"][1]["entry"], serde_json::json!(["start", "macro"]));
    assert_eq!(report["lines"][3]["exit"], serde_json::json!(["start"]));
    assert_eq!(
        report["folds"],
        serde_json::json!([{ "start_row": 0, "end_row": 3 }])
    );
}

#[test]
fn config_file_selects_dialect() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "macros.asm", NASM_SOURCE);
    let config = write_file(&dir, "lc3.toml", "[highlight]\ndialect = \"lc3-nasm\"\n");

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(&path).arg("--config").arg(&config).arg("--folds");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("variable.parameter.macro.assembly \"%1\""))
        .stdout(predicate::str::contains("fold 1-4"));
}

#[test]
fn minimal_dialect_reports_no_folds() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "macros.asm", NASM_SOURCE);

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(&path).arg("--folds");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fold ").not());
}

#[test]
fn styled_output_uses_theme_colours() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "prog.asm", ".FILL x10\n");

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(&path)
        .args(["--format", "styled"])
        .env("CLICOLOR_FORCE", "1")
        .env("COLORTERM", "truecolor");
    // Directives are red in both built-in themes.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\x1b[38;2;255;0;0m.FILL"));
}

#[test]
fn lists_languages() {
    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg("--list-languages");
    cmd.assert().success().stdout(
        predicate::str::contains("* lc3\n")
            .and(predicate::str::contains("  lc3-nasm\n"))
            .and(predicate::str::contains("extensions: .asm, comment: ;")),
    );
}

#[test]
fn shows_theme_with_overrides() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "lc3.toml",
        "[highlight]\ntheme = \"dark\"\n\n[highlight.theme_overrides.comment]\nforeground = \"#008000\"\n",
    );

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg("--show-theme").arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"dark\"").and(predicate::str::contains("#008000")));
}

#[test]
fn unknown_extension_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", "add\n");

    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no language registered"));
}

#[test]
fn missing_file_fails_without_panicking() {
    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.arg(Path::new("does-not-exist.asm"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not read").and(predicate::str::contains("panicked").not()));
}

#[test]
fn rejects_unknown_dialect_flag() {
    let mut cmd = cargo_bin_cmd!("lc3hl");
    cmd.args(["prog.asm", "--dialect", "z80"]);
    cmd.assert().failure();
}
