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

//! Program classification.
//!
//! Decides whether a program image is BASIC, machine code or both, and
//! drives the detokenizer, SYS extractor, region locator and decoder.
//!
//! A program loaded at the BASIC start is detokenized. Each distinct SYS
//! target that lies inside the payload starts a machine region. A target
//! inside the BASIC text (code hidden in a `REM` line) is decoded in place
//! and its region never runs past the end of the BASIC text. Any other
//! load address means the whole payload is machine code.

use crate::basic::{detokenize, extract_sys_calls, BasicLine, ProgramEnd, SysCallSite};
use crate::cpu::mos6510::basic;
use crate::disasm::{decode, MachineRegion, RegionBoundary, RegionEnd, RegionLocator, DEFAULT_MAX_SCAN};
use crate::error::{DecompileWarning, WarningCode};
use crate::image::ProgramImage;

/// Settings for one decompilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompileOptions {
    /// Load address that marks a BASIC program.
    pub basic_load_address: u16,
    /// Maximum bytes the region locator scans from a SYS target.
    pub max_scan: usize,
    /// `JMP` target that ends a machine region.
    pub warm_start: u16,
}

impl Default for DecompileOptions {
    fn default() -> Self {
        Self {
            basic_load_address: basic::PROGRAM_START,
            max_scan: DEFAULT_MAX_SCAN,
            warm_start: basic::WARM_START,
        }
    }
}

impl DecompileOptions {
    fn locator(&self) -> RegionLocator {
        RegionLocator {
            max_scan: self.max_scan,
            warm_start: self.warm_start,
        }
    }
}

/// What a program image contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    /// BASIC without SYS calls.
    PureBasic(Vec<BasicLine>),
    /// Machine code only.
    PureMachine(MachineRegion),
    /// BASIC calling into machine code.
    Hybrid {
        /// The BASIC lines.
        basic: Vec<BasicLine>,
        /// Located machine regions, in address order.
        machine: Vec<MachineRegion>,
        /// Every SYS call found, in listing order.
        sys_calls: Vec<SysCallSite>,
    },
}

impl ClassificationResult {
    /// Short name of the classification.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassificationResult::PureBasic(_) => "BASIC",
            ClassificationResult::PureMachine(_) => "machine code",
            ClassificationResult::Hybrid { .. } => "hybrid BASIC/machine code",
        }
    }

    /// BASIC lines, empty for machine code.
    pub fn basic_lines(&self) -> &[BasicLine] {
        match self {
            ClassificationResult::PureBasic(lines) => lines,
            ClassificationResult::PureMachine(_) => &[],
            ClassificationResult::Hybrid { basic, .. } => basic,
        }
    }

    /// Machine regions in address order.
    pub fn regions(&self) -> &[MachineRegion] {
        match self {
            ClassificationResult::PureBasic(_) => &[],
            ClassificationResult::PureMachine(region) => std::slice::from_ref(region),
            ClassificationResult::Hybrid { machine, .. } => machine,
        }
    }

    /// SYS calls found in the BASIC text.
    pub fn sys_calls(&self) -> &[SysCallSite] {
        match self {
            ClassificationResult::Hybrid { sys_calls, .. } => sys_calls,
            _ => &[],
        }
    }
}

/// The result of decompiling one program image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompilation {
    /// The input image.
    pub image: ProgramImage,
    /// What the image contains.
    pub classification: ClassificationResult,
    /// Payload offset just past the BASIC text, if any was read.
    pub basic_end: Option<usize>,
    /// Recoverable problems, in discovery order.
    pub warnings: Vec<DecompileWarning>,
}

impl Decompilation {
    /// Whether a region starts inside the BASIC program text.
    pub fn in_basic_text(&self, region: &MachineRegion) -> bool {
        self.basic_end
            .is_some_and(|basic_end| region.start_offset < basic_end)
    }
}

/// Classify an image and decode its machine regions.
pub fn classify(image: ProgramImage, options: &DecompileOptions) -> Decompilation {
    if image.load_address != options.basic_load_address {
        let region = MachineRegion {
            start_address: image.load_address,
            end_address: image.end_address(),
            start_offset: 0,
            bytes: image.payload.clone(),
            origin: None,
            boundary: RegionBoundary::EndOfBuffer,
            instructions: decode(&image.payload, image.load_address),
        };
        return Decompilation {
            image,
            classification: ClassificationResult::PureMachine(region),
            basic_end: None,
            warnings: Vec::new(),
        };
    }

    let mut warnings = Vec::new();
    let listing = detokenize(&image.payload, image.load_address);

    match listing.end {
        ProgramEnd::EndMarker => {}
        ProgramEnd::TruncatedLine => {
            let (line_number, address) = listing
                .lines
                .last()
                .map(|line| (line.line_number, line.address))
                .unwrap_or((0, image.load_address));
            warnings.push(
                DecompileWarning::new(
                    WarningCode::TruncatedBasicLine,
                    format!("BASIC line {} ends without a terminator", line_number),
                )
                .at(address),
            );
        }
        ProgramEnd::MissingEndMarker => {
            warnings.push(
                DecompileWarning::new(
                    WarningCode::MissingEndMarker,
                    "BASIC program has no end marker",
                )
                .at(image.address_of(listing.end_offset)),
            );
        }
    }

    let sys_calls = extract_sys_calls(&listing.lines);
    if sys_calls.is_empty() {
        return Decompilation {
            image,
            classification: ClassificationResult::PureBasic(listing.lines),
            basic_end: Some(listing.end_offset),
            warnings,
        };
    }

    let entries = accept_targets(&image, &sys_calls, listing.end_offset, &mut warnings);
    let locator = options.locator();
    let mut machine = Vec::with_capacity(entries.len());

    for (index, &(offset, origin)) in entries.iter().enumerate() {
        let mut end = locator.locate(&image.payload, offset);
        if let Some(&(next, _)) = entries.get(index + 1) {
            if end.offset > next {
                end = RegionEnd {
                    offset: next,
                    boundary: RegionBoundary::NextEntry,
                };
            }
        }
        if offset < listing.end_offset && end.offset > listing.end_offset {
            end = RegionEnd {
                offset: listing.end_offset,
                boundary: RegionBoundary::BasicEnd,
            };
        }

        let start_address = image.address_of(offset);
        if end.boundary.is_uncertain() {
            warnings.push(
                DecompileWarning::new(
                    WarningCode::BoundaryUncertain,
                    format!(
                        "no RTS or JMP ${:04X} found for SYS {}, region closed after {} bytes",
                        options.warm_start,
                        origin.target_address,
                        end.offset - offset
                    ),
                )
                .at(start_address),
            );
        }

        let bytes = image.payload[offset..end.offset].to_vec();
        machine.push(MachineRegion {
            start_address,
            end_address: image.address_of(end.offset),
            start_offset: offset,
            instructions: decode(&bytes, start_address),
            bytes,
            origin: Some(origin),
            boundary: end.boundary,
        });
    }

    Decompilation {
        image,
        classification: ClassificationResult::Hybrid {
            basic: listing.lines,
            machine,
            sys_calls,
        },
        basic_end: Some(listing.end_offset),
        warnings,
    }
}

/// Distinct SYS targets usable as region starts, ascending, as payload
/// offsets with the first call site naming each.
fn accept_targets(
    image: &ProgramImage,
    sys_calls: &[SysCallSite],
    basic_end: usize,
    warnings: &mut Vec<DecompileWarning>,
) -> Vec<(usize, SysCallSite)> {
    let mut sites: Vec<SysCallSite> = sys_calls.to_vec();
    sites.sort_by_key(|site| site.target_address);
    sites.dedup_by_key(|site| site.target_address);

    let mut entries = Vec::new();
    for site in sites {
        let target = site.target_address;

        if target < image.load_address {
            warnings.push(
                DecompileWarning::new(
                    WarningCode::SysTargetBelowLoadAddress,
                    format!(
                        "SYS {} in line {} points below the load address ${:04X}",
                        target, site.source_line, image.load_address
                    ),
                )
                .at(target),
            );
            continue;
        }

        let Some(offset) = image.offset_of(target) else {
            warnings.push(
                DecompileWarning::new(
                    WarningCode::SysTargetOutsideImage,
                    format!(
                        "SYS {} in line {} points past the end of the program",
                        target, site.source_line
                    ),
                )
                .at(target),
            );
            continue;
        };

        if offset < basic_end {
            warnings.push(
                DecompileWarning::new(
                    WarningCode::SysTargetInsideRegion,
                    format!(
                        "SYS {} in line {} points into the BASIC program text, decoded in place",
                        target, site.source_line
                    ),
                )
                .at(target),
            );
        }

        entries.push((offset, site));
    }

    entries
}
