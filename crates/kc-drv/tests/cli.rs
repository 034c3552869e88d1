//! End-to-end CLI tests driving the `kc` binary itself, grounded in
//! `faxc-drv/tests/integration_test.rs`'s `assert_cmd`-based style.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn kc() -> Command {
    Command::cargo_bin("kc").unwrap()
}

#[test]
fn no_arguments_prints_usage_and_exits_zero() {
    kc().assert().success().stdout(predicate::str::contains("usage: kc"));
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    kc().arg("--help").assert().success().stdout(predicate::str::contains("usage: kc"));
}

#[test]
fn unreadable_input_file_fails_with_lex_prefix() {
    kc()
        .arg("/nonexistent/path/does-not-exist.kc")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("[lex]"));
}

#[test]
fn emit_tokens_stops_before_parsing() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.kc");
    fs::write(&src, "DefFn main() -> i32 { 42 }").unwrap();

    kc()
        .arg(&src)
        .arg("--emit-tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("SmallName"));
}

#[test]
fn emit_ast_stops_before_type_checking() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.kc");
    fs::write(&src, "DefFn main() -> i32 { 42 }").unwrap();

    kc()
        .arg(&src)
        .arg("--emit-ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("DefFn"));
}

#[test]
fn type_error_exits_one_with_type_prefix() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("bad.kc");
    fs::write(&src, "DefFn h() -> Bool { 1 }").unwrap();

    kc()
        .arg(&src)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("[type]"));
}

#[test]
fn well_typed_program_compiles_to_an_object_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.kc");
    let out = dir.path().join("main.o");
    fs::write(&src, "DefFn main() -> i32 { 42 }").unwrap();

    kc().arg(&src).arg("-o").arg(&out).assert().success();

    assert!(out.exists(), "object file was not written");
    assert!(fs::metadata(&out).unwrap().len() > 0, "object file is empty");
}

#[test]
fn default_output_path_is_kc_dot_o() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.kc");
    fs::write(&src, "DefFn main() -> i32 { 0 }").unwrap();

    kc().current_dir(&dir).arg(&src).assert().success();

    assert!(dir.path().join("kc.o").exists());
}
