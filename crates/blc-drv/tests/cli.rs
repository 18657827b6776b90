//! CLI-level end-to-end tests, run against the built `blc` binary rather
//! than its library API. Anything that would shell out to `fasm`/`gcc`/
//! `wasmtime` is out of scope here (the test host isn't guaranteed to have
//! them) — these stick to `-asm-only`, `-list-targets`, and error paths
//! that never reach a toolchain command.

use std::io::Write as _;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn blc() -> Command {
    Command::cargo_bin("blc").unwrap()
}

fn source_file(src: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".b").unwrap();
    file.write_all(src.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_the_target_flag() {
    blc().arg("--help").assert().success().stdout(predicate::str::contains("--target"));
}

#[test]
fn list_targets_prints_every_canonical_backend() {
    blc()
        .arg("--list-targets")
        .assert()
        .success()
        .stderr(predicate::str::contains("x86_64").and(predicate::str::contains("aarch64")).and(predicate::str::contains("wasm")));
}

#[test]
fn asm_only_prints_assembly_without_invoking_a_toolchain() {
    let file = source_file("main() { return 0; }");
    blc()
        .arg(file.path())
        .arg("--asm-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("main"));
}

#[test]
fn asm_only_against_the_wasm_target_emits_a_module() {
    let file = source_file("main() { return 0; }");
    blc()
        .arg(file.path())
        .arg("--target")
        .arg("wasm")
        .arg("--asm-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("(module"));
}

#[test]
fn a_syntax_error_exits_nonzero_without_a_panic() {
    let file = source_file("main( { return; }");
    blc().arg(file.path()).arg("--asm-only").assert().failure().code(1);
}

#[test]
fn an_unknown_target_is_reported_before_any_compilation() {
    let file = source_file("main() { return 0; }");
    blc().arg(file.path()).arg("--target").arg("nonexistent").assert().failure().code(1);
}

#[test]
fn missing_input_file_is_an_error() {
    blc().assert().failure().code(1);
}

#[test]
fn parse_on_a_binary_wasm_header_recognizes_the_module() {
    let mut file = NamedTempFile::with_suffix(".wasm").unwrap();
    file.write_all(&[0x00, b'a', b's', b'm', 0x01, 0x00, 0x00, 0x00]).unwrap();
    blc()
        .arg("--parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("binary wasm module"));
}

#[test]
fn parse_on_an_unrecognized_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"not a wasm file at all").unwrap();
    blc().arg("--parse").arg(file.path()).assert().failure().code(1);
}
