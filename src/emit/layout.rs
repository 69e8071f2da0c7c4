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

//! Output layout.
//!
//! Splits a payload into segments in address order. Every payload byte
//! belongs to exactly one segment, except that regions decoded inside the
//! BASIC text follow the BASIC segments as [`Segment::Embedded`] and cover
//! no bytes of their own.

use crate::basic::BasicLine;
use crate::classifier::Decompilation;
use crate::disasm::MachineRegion;

/// A contiguous part of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// One tokenized BASIC line.
    BasicLine(&'a BasicLine),
    /// The `$0000` end-of-program marker.
    BasicEnd {
        /// Payload offset.
        offset: usize,
        /// The marker bytes.
        bytes: &'a [u8],
    },
    /// A decoded machine region.
    Region(&'a MachineRegion),
    /// A machine region decoded from bytes of the BASIC text.
    Embedded(&'a MachineRegion),
    /// Bytes that are neither BASIC nor located machine code.
    Data {
        /// Payload offset.
        offset: usize,
        /// The bytes.
        bytes: &'a [u8],
    },
}

impl Segment<'_> {
    /// Payload offset of the first byte.
    pub fn offset(&self) -> usize {
        match self {
            Segment::BasicLine(line) => line.byte_offset,
            Segment::BasicEnd { offset, .. } | Segment::Data { offset, .. } => *offset,
            Segment::Region(region) | Segment::Embedded(region) => region.start_offset,
        }
    }

    /// Number of payload bytes covered.
    pub fn len(&self) -> usize {
        match self {
            Segment::BasicLine(line) => line.byte_len,
            Segment::BasicEnd { bytes, .. } | Segment::Data { bytes, .. } => bytes.len(),
            Segment::Region(region) => region.len(),
            Segment::Embedded(_) => 0,
        }
    }

    /// Whether the segment covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lay out a decompilation.
pub fn layout(decompilation: &Decompilation) -> Vec<Segment<'_>> {
    let payload = decompilation.image.payload.as_slice();
    let mut segments = Vec::new();
    let mut cursor = 0;

    let data = |from: usize, to: usize| Segment::Data {
        offset: from,
        bytes: &payload[from..to],
    };

    if let Some(basic_end) = decompilation.basic_end {
        for line in decompilation.classification.basic_lines() {
            if line.byte_offset > cursor {
                segments.push(data(cursor, line.byte_offset));
            }
            segments.push(Segment::BasicLine(line));
            cursor = line.byte_offset + line.byte_len;
        }

        let basic_end = basic_end.min(payload.len());
        if cursor < basic_end {
            segments.push(Segment::BasicEnd {
                offset: cursor,
                bytes: &payload[cursor..basic_end],
            });
            cursor = basic_end;
        }
    }

    for region in decompilation.classification.regions() {
        if region.is_empty() {
            continue;
        }
        if decompilation.in_basic_text(region) {
            segments.push(Segment::Embedded(region));
            continue;
        }
        if region.start_offset > cursor {
            segments.push(data(cursor, region.start_offset));
        }
        segments.push(Segment::Region(region));
        cursor = cursor.max(region.end_offset());
    }

    if cursor < payload.len() {
        segments.push(data(cursor, payload.len()));
    }

    segments
}
