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

//! Decomp64 Decompiler Library
//!
//! This library turns Commodore 64 program files into readable source.
//! A PRG may hold tokenized BASIC, 6502 machine code, or BASIC that
//! starts machine code through `SYS`; all three are recognized.
//!
//! # Modules
//!
//! - [`image`] - PRG loading
//! - [`basic`] - BASIC V2 detokenizer and SYS extraction
//! - [`cpu`] - 6502/6510 opcode table and memory map constants
//! - [`disasm`] - Instruction decoding and machine region location
//! - [`classifier`] - BASIC / machine / hybrid classification
//! - [`symbols`] - Layered symbol database
//! - [`emit`] - Output in assembly, C, BASIC and pseudocode dialects
//! - [`error`] - Error and warning types
//!
//! # Example
//!
//! ```no_run
//! use decomp64::emit::{Dialect, EmitOptions};
//! use decomp64::symbols::NoSymbols;
//!
//! fn listing(prg: &[u8]) -> Result<String, decomp64::DecompileError> {
//!     let decompilation = decomp64::decompile(prg)?;
//!     let options = EmitOptions {
//!         dialect: Dialect::C,
//!         ..EmitOptions::default()
//!     };
//!     Ok(decomp64::render(&decompilation, &NoSymbols, &options))
//! }
//! ```

pub mod basic;
pub mod classifier;
pub mod cpu;
pub mod disasm;
pub mod emit;
pub mod error;
pub mod image;
pub mod symbols;

// Re-export commonly used types
pub use classifier::{classify, ClassificationResult, Decompilation, DecompileOptions};
pub use emit::{render, Dialect, EmitOptions};
pub use error::{format_error, format_warning, DecompileError, DecompileWarning, ErrorCode, Result};
pub use image::ProgramImage;

/// The version of the decompiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the decompiler.
pub const NAME: &str = "Decomp64";

/// Decompile a PRG file with default options.
///
/// `bytes` is the whole file, load address included. Fails only when
/// the buffer is too short to hold a load address; everything else
/// ends up as warnings in the result.
pub fn decompile(bytes: &[u8]) -> Result<Decompilation> {
    decompile_with_options(bytes, &DecompileOptions::default())
}

/// Decompile a PRG file.
pub fn decompile_with_options(bytes: &[u8], options: &DecompileOptions) -> Result<Decompilation> {
    let image = ProgramImage::from_bytes(bytes)?;
    Ok(classify(image, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "Decomp64");
    }

    #[test]
    fn test_decompile_rejects_short_buffer() {
        let error = decompile(&[0x01]).unwrap_err();
        assert_eq!(error.code, ErrorCode::MalformedImage);
    }

    #[test]
    fn test_decompile_with_options() {
        let options = DecompileOptions {
            basic_load_address: 0x1C01,
            ..DecompileOptions::default()
        };
        // Machine code at $C000 stays machine code whatever the BASIC start
        let decompilation = decompile_with_options(&[0x00, 0xC0, 0x60], &options).unwrap();
        assert_eq!(decompilation.classification.kind(), "machine code");
    }
}
