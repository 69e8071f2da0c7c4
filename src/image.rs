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

//! PRG program images.
//!
//! PRG format is very simple:
//! - 2-byte load address (little-endian)
//! - Program data

use std::path::Path;

use crate::error::{DecompileError, ErrorCode, Result};

/// A C64 program image: load address plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramImage {
    /// Address the payload is loaded to.
    pub load_address: u16,
    /// The bytes following the 2-byte header.
    pub payload: Vec<u8>,
}

impl ProgramImage {
    /// Create an image from a load address and payload.
    pub fn new(load_address: u16, payload: Vec<u8>) -> Self {
        Self {
            load_address,
            payload,
        }
    }

    /// Parse a raw PRG buffer.
    ///
    /// Fails with [`ErrorCode::MalformedImage`] if the buffer cannot hold
    /// a load address. An empty payload is accepted.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 2 {
            return Err(DecompileError::new(
                ErrorCode::MalformedImage,
                format!(
                    "PRG image too short: {} byte(s), need at least 2 for the load address",
                    data.len()
                ),
            )
            .with_hint("The file may be empty or not a C64 program"));
        }

        let load_address = u16::from_le_bytes([data[0], data[1]]);
        Ok(Self::new(load_address, data[2..].to_vec()))
    }

    /// Address just past the last payload byte (wraps at $FFFF).
    pub fn end_address(&self) -> u16 {
        self.load_address.wrapping_add(self.payload.len() as u16)
    }

    /// Address of a payload offset.
    pub fn address_of(&self, offset: usize) -> u16 {
        self.load_address.wrapping_add(offset as u16)
    }

    /// Payload offset of an address, if the address lies inside the payload.
    pub fn offset_of(&self, address: u16) -> Option<usize> {
        let offset = usize::from(address.checked_sub(self.load_address)?);
        (offset < self.payload.len()).then_some(offset)
    }

    /// Serialize back into PRG bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.payload.len() + 2);
        data.extend_from_slice(&self.load_address.to_le_bytes());
        data.extend_from_slice(&self.payload);
        data
    }
}

/// Read a PRG file from disk.
pub fn read_prg(path: &Path) -> Result<ProgramImage> {
    let data = std::fs::read(path).map_err(|e| {
        DecompileError::new(
            ErrorCode::FileNotReadable,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;

    ProgramImage::from_bytes(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let image = ProgramImage::from_bytes(&[0x01, 0x08, 0x0A, 0x0B]).unwrap();
        assert_eq!(image.load_address, 0x0801);
        assert_eq!(image.payload, vec![0x0A, 0x0B]);
        assert_eq!(image.end_address(), 0x0803);
    }

    #[test]
    fn test_too_short() {
        let error = ProgramImage::from_bytes(&[0x01]).unwrap_err();
        assert_eq!(error.code, ErrorCode::MalformedImage);

        let error = ProgramImage::from_bytes(&[]).unwrap_err();
        assert_eq!(error.code, ErrorCode::MalformedImage);
    }

    #[test]
    fn test_header_only() {
        let image = ProgramImage::from_bytes(&[0x00, 0xC0]).unwrap();
        assert_eq!(image.load_address, 0xC000);
        assert!(image.payload.is_empty());
    }

    #[test]
    fn test_offset_of() {
        let image = ProgramImage::new(0x0801, vec![0; 16]);
        assert_eq!(image.offset_of(0x0801), Some(0));
        assert_eq!(image.offset_of(0x0810), Some(15));
        assert_eq!(image.offset_of(0x0811), None);
        assert_eq!(image.offset_of(0x0800), None);
        assert_eq!(image.address_of(15), 0x0810);
    }

    #[test]
    fn test_round_trip_bytes() {
        let data = vec![0x00, 0xC0, 0xA9, 0x00, 0x60];
        let image = ProgramImage::from_bytes(&data).unwrap();
        assert_eq!(image.to_bytes(), data);
    }

    #[test]
    fn test_read_prg() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("test.prg");
        std::fs::write(&path, [0x00, 0xC0, 0x60]).unwrap();

        let image = read_prg(&path).unwrap();
        assert_eq!(image.load_address, 0xC000);
        assert_eq!(image.payload, vec![0x60]);
    }

    #[test]
    fn test_read_prg_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let error = read_prg(&temp_dir.path().join("missing.prg")).unwrap_err();
        assert_eq!(error.code, ErrorCode::FileNotReadable);
    }
}
