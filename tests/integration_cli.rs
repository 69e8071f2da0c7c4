// Decomp64 - A hybrid BASIC/6502 decompiler for Commodore 64 PRG files
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! End-to-end CLI integration tests.

use std::path::Path;
use std::process::{Command, Output};

/// `LDA #$01 / STA $D020 / LDA #$0E / STA $D021 / RTS` at $0800.
const MACHINE: [u8; 13] = [
    0x00, 0x08, 0xA9, 0x01, 0x8D, 0x20, 0xD0, 0xA9, 0x0E, 0x8D, 0x21, 0xD0, 0x60,
];

/// `10 SYS2061`, end marker, `INC $D020` with no RTS.
const HYBRID: [u8; 18] = [
    0x01, 0x08, 0x0B, 0x08, 0x0A, 0x00, 0x9E, 0x32, 0x30, 0x36, 0x31, 0x00, 0x00, 0x00, 0xEE,
    0x20, 0xD0, 0xEA,
];

/// The binary, run inside `dir` with no symbol directory configured.
fn cargo_bin(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_decomp64"));
    command.current_dir(dir).env_remove("DECOMP64_SYMBOLS");
    command
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("machine.prg"), MACHINE).unwrap();
    std::fs::write(dir.path().join("hybrid.prg"), HYBRID).unwrap();
    dir
}

/// Test --help flag.
#[test]
fn test_help_flag() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("decomp64") || text.contains("Decomp64"));
    assert!(text.contains("--dialect"));
    assert!(text.contains("--symbols"));
    assert!(text.contains("--verbose"));
}

/// Test --version flag.
#[test]
fn test_version_flag() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("decomp64"));
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

/// Default output is ACME assembly on stdout.
#[test]
fn test_decompile_to_stdout() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .arg("machine.prg")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("* = $0800"));
    assert!(text.contains("LDA #$01"));
    assert!(text.contains("STA $D020"));
}

/// A missing symbol directory only produces a warning.
#[test]
fn test_missing_symbols_warns() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .args(["machine.prg", "--symbols", "nowhere"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(stderr(&output).contains("warning[W030]"));
    assert!(stdout(&output).contains("STA $D020"));
}

#[test]
fn test_output_file_in_c() {
    let dir = workspace();
    let target = dir.path().join("machine.c");
    let output = cargo_bin(dir.path())
        .args(["machine.prg", "-d", "c", "-o"])
        .arg(&target)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = std::fs::read_to_string(&target).unwrap();
    assert!(text.contains("void sub_0800(void)"));
    assert!(stdout(&output).contains("machine.prg"));
}

#[test]
fn test_several_files_into_directory() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .args(["machine.prg", "hybrid.prg", "-d", "pseudo", "-o", "out"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("out/machine.txt").exists());
    let hybrid = std::fs::read_to_string(dir.path().join("out/hybrid.txt")).unwrap();
    assert!(hybrid.contains("basic 10 SYS2061"));
    assert!(stderr(&output).contains("warning[W020]"));
}

#[test]
fn test_symbol_directory_names_addresses() {
    let dir = workspace();
    let symbols = dir.path().join("syms");
    std::fs::create_dir(&symbols).unwrap();
    std::fs::write(
        symbols.join("io.json"),
        r#"{ "$D020": { "name": "BORDER", "description": "Border color" } }"#,
    )
    .unwrap();

    let output = cargo_bin(dir.path())
        .arg("machine.prg")
        .env("DECOMP64_SYMBOLS", &symbols)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("BORDER = $D020"));
    assert!(text.contains("STA BORDER"));
}

#[test]
fn test_builtin_symbols() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .args(["machine.prg", "--builtin-symbols", "-d", "qbasic"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(stdout(&output).contains("POKE EXTCOL, A"));
}

#[test]
fn test_missing_input_exit_code() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .arg("missing.prg")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("error[E002]"));
}

#[test]
fn test_malformed_input_exit_code() {
    let dir = workspace();
    std::fs::write(dir.path().join("short.prg"), [0x01]).unwrap();
    let output = cargo_bin(dir.path())
        .arg("short.prg")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error[E001]"));
}

#[test]
fn test_unknown_dialect_is_usage_error() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .args(["machine.prg", "-d", "cobol"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_options_change_annotations() {
    let dir = workspace();
    let output = cargo_bin(dir.path())
        .args(["machine.prg", "--bytes", "--no-addresses", "--no-header"])
        .output()
        .expect("Failed to execute command");

    let text = stdout(&output);
    assert!(text.contains("; 8D 20 D0"));
    assert!(!text.contains("; $0802"));
    assert!(!text.contains("decompiled by"));
}
