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

//! Machine region location.
//!
//! Heuristic: scan forward byte by byte from a SYS entry point and stop
//! after the first `RTS` or after a `JMP` to the BASIC warm start. The
//! scan is not instruction-aware, so a data byte equal to `$60` ends the
//! region early. Programs that never return run to the end of the buffer.

use super::decoder::Decoded;
use crate::basic::SysCallSite;
use crate::cpu::mos6510::{basic, opcodes};

/// Default bound on how far the locator scans.
pub const DEFAULT_MAX_SCAN: usize = 2048;

/// Why a machine region ends where it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionBoundary {
    /// After an `RTS`.
    Rts,
    /// After a `JMP` to the BASIC warm start.
    WarmStartJump,
    /// No terminator within the scan bound; closed at end of buffer.
    ScanLimit,
    /// Buffer ended before any terminator.
    EndOfBuffer,
    /// Cut where the next SYS entry point begins.
    NextEntry,
    /// Started inside the BASIC text and found no terminator before its end.
    BasicEnd,
}

impl RegionBoundary {
    /// Whether the end was found by a terminator.
    pub fn is_uncertain(&self) -> bool {
        matches!(
            self,
            RegionBoundary::ScanLimit | RegionBoundary::EndOfBuffer | RegionBoundary::BasicEnd
        )
    }
}

/// Where a region ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEnd {
    /// End offset (exclusive).
    pub offset: usize,
    /// Why the region ends there.
    pub boundary: RegionBoundary,
}

/// Machine region locator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLocator {
    /// Maximum number of bytes scanned from the start offset.
    pub max_scan: usize,
    /// `JMP` target that ends a region.
    pub warm_start: u16,
}

impl Default for RegionLocator {
    fn default() -> Self {
        Self {
            max_scan: DEFAULT_MAX_SCAN,
            warm_start: basic::WARM_START,
        }
    }
}

impl RegionLocator {
    /// Find the end of the machine-code run starting at `start`.
    pub fn locate(&self, bytes: &[u8], start: usize) -> RegionEnd {
        let limit = start.saturating_add(self.max_scan).min(bytes.len());

        for i in start..limit {
            match bytes[i] {
                opcodes::RTS => {
                    return RegionEnd {
                        offset: i + 1,
                        boundary: RegionBoundary::Rts,
                    };
                }
                opcodes::JMP_ABS if i + 2 < bytes.len() => {
                    let target = u16::from_le_bytes([bytes[i + 1], bytes[i + 2]]);
                    if target == self.warm_start {
                        return RegionEnd {
                            offset: i + 3,
                            boundary: RegionBoundary::WarmStartJump,
                        };
                    }
                }
                _ => {}
            }
        }

        let boundary = if limit < bytes.len() {
            RegionBoundary::ScanLimit
        } else {
            RegionBoundary::EndOfBuffer
        };
        RegionEnd {
            offset: bytes.len(),
            boundary,
        }
    }
}

/// Find a region end with the default settings.
pub fn locate_region_end(bytes: &[u8], start: usize) -> usize {
    RegionLocator::default().locate(bytes, start).offset
}

/// A run of machine code inside a program image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineRegion {
    /// Address of the first byte.
    pub start_address: u16,
    /// Address just past the last byte (wraps at $FFFF).
    pub end_address: u16,
    /// Offset of the first byte within the payload.
    pub start_offset: usize,
    /// The region's bytes.
    pub bytes: Vec<u8>,
    /// The SYS call that led here, if any.
    pub origin: Option<SysCallSite>,
    /// How the end was determined.
    pub boundary: RegionBoundary,
    /// Decoded contents.
    pub instructions: Vec<Decoded>,
}

impl MachineRegion {
    /// Number of bytes in the region.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the region is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset just past the region within the payload.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.bytes.len()
    }

    /// Whether an address falls inside the region.
    pub fn contains(&self, address: u16) -> bool {
        let offset = usize::from(address.wrapping_sub(self.start_address));
        offset < self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_after_rts() {
        let bytes = [0xA9, 0x01, 0x8D, 0x20, 0xD0, 0x60, 0xEA, 0xEA];
        let end = RegionLocator::default().locate(&bytes, 0);
        assert_eq!(end.offset, 6);
        assert_eq!(end.boundary, RegionBoundary::Rts);
        assert!(!end.boundary.is_uncertain());
    }

    #[test]
    fn test_stops_after_warm_start_jump() {
        let bytes = [0xEA, 0x4C, 0x74, 0xA4, 0xEA];
        let end = RegionLocator::default().locate(&bytes, 0);
        assert_eq!(end.offset, 4);
        assert_eq!(end.boundary, RegionBoundary::WarmStartJump);
    }

    #[test]
    fn test_other_jumps_continue() {
        let bytes = [0x4C, 0x00, 0xC0, 0xEA];
        let end = RegionLocator::default().locate(&bytes, 0);
        assert_eq!(end.offset, 4);
        assert_eq!(end.boundary, RegionBoundary::EndOfBuffer);
        assert!(end.boundary.is_uncertain());
    }

    #[test]
    fn test_start_offset() {
        let bytes = [0x60, 0x00, 0xEA, 0x60];
        assert_eq!(locate_region_end(&bytes, 1), 4);
    }

    #[test]
    fn test_scan_limit() {
        let mut bytes = vec![0xEA; 16];
        bytes.push(0x60);
        let locator = RegionLocator {
            max_scan: 8,
            ..RegionLocator::default()
        };
        let end = locator.locate(&bytes, 0);
        assert_eq!(end.offset, bytes.len());
        assert_eq!(end.boundary, RegionBoundary::ScanLimit);
    }

    #[test]
    fn test_data_byte_truncates_early() {
        // LDA #$60 is a known false positive
        let bytes = [0xA9, 0x60, 0x8D, 0x20, 0xD0, 0x60];
        assert_eq!(locate_region_end(&bytes, 0), 2);
    }

    #[test]
    fn test_jump_at_buffer_end_is_not_terminator() {
        let bytes = [0xEA, 0x4C, 0x74];
        let end = RegionLocator::default().locate(&bytes, 0);
        assert_eq!(end.offset, 3);
        assert_eq!(end.boundary, RegionBoundary::EndOfBuffer);
    }
}
