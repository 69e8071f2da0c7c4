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

//! Decomp64 CLI
//!
//! Decompiles Commodore 64 PRG files into assembly, C, BASIC or pseudocode.

use clap::Parser;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use decomp64::disasm::DEFAULT_MAX_SCAN;
use decomp64::emit::{render, Dialect, EmitOptions};
use decomp64::error::{format_error, format_warning, DecompileError, DecompileWarning, ErrorCode};
use decomp64::image::read_prg;
use decomp64::symbols::{self, builtin_table, UnifiedSymbolTable};
use decomp64::{classify, DecompileOptions};

/// Decomp64 - A hybrid BASIC/6502 decompiler for the Commodore 64
#[derive(Parser, Debug)]
#[command(name = "decomp64")]
#[command(author = "Decomp64 Team")]
#[command(version)]
#[command(about = "A hybrid BASIC/6502 decompiler for Commodore 64 PRG files")]
#[command(long_about = r#"
Decomp64 reads Commodore 64 program files (.prg) and writes them back as
source code. BASIC programs are detokenized, machine code is disassembled,
and BASIC loaders that start machine code with SYS are split into both.

Output dialects:
  asm, acme, kickass, ca65, 64tass  - assembler source
  c                                 - C with a flat memory array
  qbasic                            - structured BASIC with labels
  pdsx                              - line-numbered BASIC
  pseudo                            - pseudocode

Symbol names are read from a directory of JSON files given with --symbols,
the DECOMP64_SYMBOLS environment variable, or ./symbols.

Example usage:
  decomp64 game.prg
  decomp64 game.prg -d c -o game.c
  decomp64 *.prg -d ca65 -o out/ --builtin-symbols
"#)]
struct Cli {
    /// PRG files to decompile
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output file, or directory when several files are given (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output dialect
    #[arg(short, long, default_value = "asm")]
    dialect: Dialect,

    /// Symbol database directory
    #[arg(long, value_name = "DIR")]
    symbols: Option<PathBuf>,

    /// Add the built-in C64 symbols below the database
    #[arg(long)]
    builtin_symbols: bool,

    /// Maximum bytes scanned for the end of a machine region
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_SCAN)]
    max_scan: usize,

    /// Show the raw bytes of every instruction
    #[arg(long)]
    bytes: bool,

    /// Do not annotate instructions with their address
    #[arg(long)]
    no_addresses: bool,

    /// Omit the descriptive header
    #[arg(long)]
    no_header: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// One finished decompilation.
struct Decompiled {
    text: String,
    warnings: Vec<DecompileWarning>,
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn exit_code(error: &DecompileError) -> u8 {
    match error.code {
        ErrorCode::MalformedImage => 1,
        ErrorCode::FileNotReadable => 3,
        ErrorCode::OutputNotWritable => 4,
    }
}

/// Where the text for `input` goes. `None` means stdout.
fn destination(cli: &Cli, input: &Path) -> Option<PathBuf> {
    let output = cli.output.as_ref()?;
    if cli.files.len() == 1 && !output.is_dir() {
        return Some(output.clone());
    }
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string());
    Some(output.join(format!("{}.{}", stem, cli.dialect.extension())))
}

fn write_text(path: &Path, text: &str) -> Result<(), DecompileError> {
    std::fs::write(path, text).map_err(|e| {
        DecompileError::new(
            ErrorCode::OutputNotWritable,
            format!("Cannot write {}: {}", path.display(), e),
        )
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("{} v{}", decomp64::NAME, decomp64::VERSION);
        eprintln!("Dialect: {}", cli.dialect);
        eprintln!("Input files:");
        for file in &cli.files {
            eprintln!("  - {}", file.display());
        }
        eprintln!();
    }

    if cli.files.len() > 1 {
        if let Some(dir) = &cli.output {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Error: Cannot create output directory {}: {}", dir.display(), e);
                return ExitCode::from(4);
            }
        }
    }

    // Symbols
    let dir = cli.symbols.clone().unwrap_or_else(symbols::default_symbols_dir);
    symbols::init_global(&dir);
    let report = symbols::global_report();
    for warning in &report.warnings {
        eprint!("{}", format_warning(warning, Some(&dir.display().to_string())));
    }
    if cli.verbose {
        eprintln!(
            "Loaded {} symbol(s) from {} file(s) in {}",
            report.entries_loaded,
            report.files_loaded,
            dir.display()
        );
    }

    let merged: UnifiedSymbolTable;
    let table = if cli.builtin_symbols {
        let mut table = symbols::global().clone();
        table.merge_fallback(&builtin_table());
        merged = table;
        &merged
    } else {
        symbols::global()
    };

    let options = DecompileOptions {
        max_scan: cli.max_scan,
        ..DecompileOptions::default()
    };
    let emit_options = EmitOptions {
        dialect: cli.dialect,
        show_addresses: !cli.no_addresses,
        show_bytes: cli.bytes,
        header: !cli.no_header,
    };

    // Decompile every file independently; results keep input order
    let results: Vec<Result<Decompiled, DecompileError>> = cli
        .files
        .par_iter()
        .map(|path| {
            let image = read_prg(path)?;
            let decompilation = classify(image, &options);
            let text = render(&decompilation, table, &emit_options);
            Ok(Decompiled {
                text,
                warnings: decompilation.warnings,
            })
        })
        .collect();

    let mut status = 0u8;
    for (path, result) in cli.files.iter().zip(results) {
        let label = file_label(path);

        let decompiled = match result {
            Ok(decompiled) => decompiled,
            Err(e) => {
                eprint!("{}", format_error(&e, Some(&label)));
                if status == 0 {
                    status = exit_code(&e);
                }
                continue;
            }
        };

        for warning in &decompiled.warnings {
            eprint!("{}", format_warning(warning, Some(&label)));
        }

        match destination(&cli, path) {
            None => print!("{}", decompiled.text),
            Some(target) => {
                if let Err(e) = write_text(&target, &decompiled.text) {
                    eprint!("{}", format_error(&e, Some(&label)));
                    if status == 0 {
                        status = exit_code(&e);
                    }
                    continue;
                }
                if cli.verbose {
                    eprintln!("Wrote {}", target.display());
                } else {
                    println!("Decompiled {} -> {}", label, target.display());
                }
            }
        }
    }

    if status == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(status)
    }
}
