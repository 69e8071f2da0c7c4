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

//! Error and warning types for the Decomp64 decompiler.
//!
//! Only a handful of conditions are fatal: an input that is too short to
//! hold a load address, and file I/O at the CLI boundary. Everything that
//! can go wrong once classification has begun is reported as a
//! [`DecompileWarning`] and the decompilation carries on.

use thiserror::Error;

/// Error codes for fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The buffer is too short to contain a load address.
    MalformedImage,
    /// The input file could not be read.
    FileNotReadable,
    /// The output file could not be written.
    OutputNotWritable,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedImage => "E001",
            ErrorCode::FileNotReadable => "E002",
            ErrorCode::OutputNotWritable => "E003",
        }
    }
}

/// A fatal decompiler error.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct DecompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl DecompileError {
    /// Create a new decompile error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

/// Result type for decompiler operations.
pub type Result<T> = std::result::Result<T, DecompileError>;

/// Warning codes for recoverable conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    // BASIC listing (W001-W009)
    TruncatedBasicLine,
    MissingEndMarker,

    // SYS targets (W010-W019)
    SysTargetBelowLoadAddress,
    SysTargetOutsideImage,
    SysTargetInsideRegion,

    // Machine regions (W020-W029)
    BoundaryUncertain,

    // Symbol database (W030-W039)
    MissingSymbolDatabase,
    SymbolFileUnreadable,
    InvalidSymbolEntry,
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl WarningCode {
    /// Get the numeric code for this warning.
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::TruncatedBasicLine => "W001",
            WarningCode::MissingEndMarker => "W002",
            WarningCode::SysTargetBelowLoadAddress => "W010",
            WarningCode::SysTargetOutsideImage => "W011",
            WarningCode::SysTargetInsideRegion => "W012",
            WarningCode::BoundaryUncertain => "W020",
            WarningCode::MissingSymbolDatabase => "W030",
            WarningCode::SymbolFileUnreadable => "W031",
            WarningCode::InvalidSymbolEntry => "W032",
        }
    }
}

/// A recoverable problem found while decompiling or loading symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompileWarning {
    /// The warning code.
    pub code: WarningCode,
    /// The warning message.
    pub message: String,
    /// The C64 address the warning refers to, if any.
    pub address: Option<u16>,
}

impl DecompileWarning {
    /// Create a new warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            address: None,
        }
    }

    /// Attach the address this warning refers to.
    pub fn at(mut self, address: u16) -> Self {
        self.address = Some(address);
        self
    }

    /// Get the warning code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

impl std::fmt::Display for DecompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.address {
            Some(address) => write!(f, "[{}] {} (at ${:04X})", self.code, self.message, address),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Format an error for terminal output.
pub fn format_error(error: &DecompileError, filename: Option<&str>) -> String {
    let filename = filename.unwrap_or("<input>");

    let mut output = String::new();
    output.push_str(&format!("error[{}]: {}\n", error.code_str(), error.message));
    output.push_str(&format!("  --> {}\n", filename));

    if let Some(hint) = &error.hint {
        output.push_str(&format!("   = hint: {}\n", hint));
    }

    output
}

/// Format a warning for terminal output.
pub fn format_warning(warning: &DecompileWarning, filename: Option<&str>) -> String {
    let filename = filename.unwrap_or("<input>");

    let mut output = String::new();
    output.push_str(&format!(
        "warning[{}]: {}\n",
        warning.code_str(),
        warning.message
    ));
    output.push_str(&format!("  --> {}\n", filename));

    if let Some(address) = warning.address {
        output.push_str(&format!("   = at ${:04X}\n", address));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(ErrorCode::MalformedImage.code(), "E001");
        assert_eq!(ErrorCode::FileNotReadable.code(), "E002");
        assert_eq!(ErrorCode::OutputNotWritable.code(), "E003");
    }

    #[test]
    fn test_warning_code() {
        assert_eq!(WarningCode::TruncatedBasicLine.code(), "W001");
        assert_eq!(WarningCode::SysTargetOutsideImage.code(), "W011");
        assert_eq!(WarningCode::BoundaryUncertain.code(), "W020");
        assert_eq!(WarningCode::MissingSymbolDatabase.code(), "W030");
    }

    #[test]
    fn test_decompile_error_display() {
        let error = DecompileError::new(ErrorCode::MalformedImage, "Image is 1 byte long")
            .with_hint("A PRG needs at least a 2-byte load address");

        assert_eq!(error.to_string(), "[E001] Image is 1 byte long");
        assert_eq!(error.code_str(), "E001");
        assert!(error.hint.is_some());
    }

    #[test]
    fn test_warning_display_with_address() {
        let warning =
            DecompileWarning::new(WarningCode::BoundaryUncertain, "No RTS found").at(0x0810);
        assert_eq!(warning.to_string(), "[W020] No RTS found (at $0810)");
    }

    #[test]
    fn test_format_error() {
        let error = DecompileError::new(ErrorCode::FileNotReadable, "Cannot read game.prg")
            .with_hint("Check the path");
        let text = format_error(&error, Some("game.prg"));
        assert!(text.starts_with("error[E002]: Cannot read game.prg\n"));
        assert!(text.contains("  --> game.prg\n"));
        assert!(text.contains("= hint: Check the path"));
    }

    #[test]
    fn test_format_warning() {
        let warning =
            DecompileWarning::new(WarningCode::TruncatedBasicLine, "Line 20 has no terminator")
                .at(0x0812);
        let text = format_warning(&warning, None);
        assert!(text.starts_with("warning[W001]: Line 20 has no terminator\n"));
        assert!(text.contains("  --> <input>\n"));
        assert!(text.contains("= at $0812"));
    }
}
