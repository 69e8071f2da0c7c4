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

//! JSON symbol database.
//!
//! A database is a directory of JSON documents, each an object mapping an
//! address key to a label:
//!
//! ```json
//! {
//!     "$D020": "EXTCOL",
//!     "53281": { "name": "BGCOL0", "description": "Background color 0" }
//! }
//! ```
//!
//! Documents live in category subdirectories (`zeropage/`, `kernal/`,
//! `basic/`, `io/`, `memory_map/`, `labels/`) or at the top level, where
//! the file stem names the category. Anything that cannot be read or
//! parsed is reported and skipped; loading never fails.

use super::{SymbolCategory, SymbolEntry, UnifiedSymbolTable};
use crate::error::{DecompileWarning, WarningCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How entries of a file are categorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Category(SymbolCategory),
    /// Category follows from each entry's address.
    MemoryMap,
}

impl FileKind {
    fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "zeropage" | "zero_page" | "zp" => FileKind::Category(SymbolCategory::ZeroPage),
            "kernal" | "kernal_rom" => FileKind::Category(SymbolCategory::KernalRom),
            "basic" | "basic_rom" => FileKind::Category(SymbolCategory::BasicRom),
            "io" | "io_registers" => FileKind::Category(SymbolCategory::IoRegister),
            "labels" | "user" | "user_labels" => FileKind::Category(SymbolCategory::UserLabel),
            "memory_map" | "memory" => FileKind::MemoryMap,
            _ => return None,
        };
        Some(kind)
    }

    fn category_for(self, address: u16) -> SymbolCategory {
        match self {
            FileKind::Category(category) => category,
            FileKind::MemoryMap => SymbolCategory::for_address(address),
        }
    }
}

/// A label value as written in a document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSymbol {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        comment: Option<String>,
    },
}

/// Outcome of loading a database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Directory that was searched.
    pub dir: PathBuf,
    /// Documents parsed successfully.
    pub files_loaded: usize,
    /// Entries accepted from those documents.
    pub entries_loaded: usize,
    /// Problems encountered.
    pub warnings: Vec<DecompileWarning>,
}

impl LoadReport {
    fn warn(&mut self, code: WarningCode, message: impl Into<String>) {
        self.warnings.push(DecompileWarning::new(code, message));
    }
}

/// A symbol database directory.
#[derive(Debug, Clone)]
pub struct SymbolDatabase {
    dir: PathBuf,
}

impl SymbolDatabase {
    /// Create a database rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The database directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the database at `dir`.
    pub fn load(dir: &Path) -> (UnifiedSymbolTable, LoadReport) {
        SymbolDatabase::new(dir).load_table()
    }

    /// Load every document and merge them into one table.
    pub fn load_table(&self) -> (UnifiedSymbolTable, LoadReport) {
        let mut table = UnifiedSymbolTable::new();
        let mut report = LoadReport {
            dir: self.dir.clone(),
            ..LoadReport::default()
        };

        if !self.dir.is_dir() {
            report.warn(
                WarningCode::MissingSymbolDatabase,
                format!(
                    "symbol database '{}' not found, addresses stay numeric",
                    self.dir.display()
                ),
            );
            return (table, report);
        }

        for (path, kind) in self.collect_files(&mut report) {
            load_file(&path, kind, &mut table, &mut report);
        }

        (table, report)
    }

    /// Find all documents, sorted by path.
    fn collect_files(&self, report: &mut LoadReport) -> Vec<(PathBuf, FileKind)> {
        let mut files = Vec::new();

        for path in list_dir(&self.dir, report) {
            if path.is_dir() {
                let kind = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(FileKind::from_name);
                if let Some(kind) = kind {
                    files.extend(
                        list_dir(&path, report)
                            .into_iter()
                            .filter(|p| is_json(p))
                            .map(|p| (p, kind)),
                    );
                }
            } else if is_json(&path) {
                let kind = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(FileKind::from_name)
                    .unwrap_or(FileKind::MemoryMap);
                files.push((path, kind));
            }
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
    }
}

fn is_json(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn list_dir(dir: &Path, report: &mut LoadReport) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => {
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .collect();
            paths.sort();
            paths
        }
        Err(e) => {
            report.warn(
                WarningCode::SymbolFileUnreadable,
                format!("cannot list '{}': {}", dir.display(), e),
            );
            Vec::new()
        }
    }
}

fn load_file(path: &Path, kind: FileKind, table: &mut UnifiedSymbolTable, report: &mut LoadReport) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            report.warn(
                WarningCode::SymbolFileUnreadable,
                format!("cannot read '{}': {}", path.display(), e),
            );
            return;
        }
    };

    let document: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&text) {
        Ok(document) => document,
        Err(e) => {
            report.warn(
                WarningCode::SymbolFileUnreadable,
                format!("'{}' is not a JSON object: {}", path.display(), e),
            );
            return;
        }
    };

    report.files_loaded += 1;

    for (key, value) in document {
        let Some(address) = parse_address(&key) else {
            report.warn(
                WarningCode::InvalidSymbolEntry,
                format!("'{}': invalid address key '{}'", path.display(), key),
            );
            continue;
        };

        let raw = match serde_json::from_value::<RawSymbol>(value) {
            Ok(raw) => raw,
            Err(_) => {
                report.warn(
                    WarningCode::InvalidSymbolEntry,
                    format!("'{}': entry '{}' has no name", path.display(), key),
                );
                continue;
            }
        };

        let (name, description) = match raw {
            RawSymbol::Name(name) => (name, None),
            RawSymbol::Detailed {
                name,
                description,
                comment,
            } => (name, description.or(comment)),
        };

        let name = name.trim();
        if name.is_empty() {
            report.warn(
                WarningCode::InvalidSymbolEntry,
                format!("'{}': entry '{}' has an empty name", path.display(), key),
            );
            continue;
        }

        let mut entry = SymbolEntry::new(address, name, kind.category_for(address));
        entry.description = description.filter(|d| !d.trim().is_empty());
        table.insert(entry);
        report.entries_loaded += 1;
    }
}

/// Parse an address key.
///
/// `$D020`, `0xD020`, `D020h` and any key containing a hex letter are
/// hexadecimal; plain digits are decimal.
pub fn parse_address(key: &str) -> Option<u16> {
    let key = key.trim();

    let (digits, radix) = if let Some(rest) = key.strip_prefix('$') {
        (rest, 16)
    } else if let Some(rest) = key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = key.strip_suffix('h').or_else(|| key.strip_suffix('H')) {
        (rest, 16)
    } else if key.chars().any(|c| c.is_ascii_hexdigit() && !c.is_ascii_digit()) {
        (key, 16)
    } else {
        (key, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(|value| u16::try_from(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_address_forms() {
        assert_eq!(parse_address("$D020"), Some(0xD020));
        assert_eq!(parse_address("0xd020"), Some(0xD020));
        assert_eq!(parse_address("D020h"), Some(0xD020));
        assert_eq!(parse_address("FFD2"), Some(0xFFD2));
        assert_eq!(parse_address("53280"), Some(53280));
        assert_eq!(parse_address(" 251 "), Some(251));
    }

    #[test]
    fn test_parse_address_invalid() {
        assert_eq!(parse_address(""), None);
        assert_eq!(parse_address("$"), None);
        assert_eq!(parse_address("65536"), None);
        assert_eq!(parse_address("$10000"), None);
        assert_eq!(parse_address("border"), None);
        assert_eq!(parse_address("-1"), None);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let (table, report) = SymbolDatabase::load(&dir.path().join("nope"));
        assert!(table.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, WarningCode::MissingSymbolDatabase);
    }

    #[test]
    fn test_category_subdirectories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "kernal/routines.json", r#"{"$FFD2": "CHROUT"}"#);
        write(
            dir.path(),
            "io/vic.json",
            r#"{"$D020": {"name": "EXTCOL", "description": "Border color"}}"#,
        );
        write(dir.path(), "zeropage/zp.json", r#"{"251": "PTR"}"#);

        let (table, report) = SymbolDatabase::load(dir.path());
        assert!(report.warnings.is_empty());
        assert_eq!(report.files_loaded, 3);
        assert_eq!(report.entries_loaded, 3);

        let chrout = table.resolve(0xFFD2).unwrap();
        assert_eq!(chrout.name, "CHROUT");
        assert_eq!(chrout.category, SymbolCategory::KernalRom);

        let extcol = table.resolve(0xD020).unwrap();
        assert_eq!(extcol.category, SymbolCategory::IoRegister);
        assert_eq!(extcol.description.as_deref(), Some("Border color"));

        assert_eq!(table.resolve(0x00FB).unwrap().category, SymbolCategory::ZeroPage);
    }

    #[test]
    fn test_memory_map_ranges() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "memory_map/c64.json",
            r#"{"$0001": "R6510", "$A474": "READY", "$D418": "SIGVOL", "$FFD2": "CHROUT", "$C000": "FREE"}"#,
        );

        let (table, _) = SymbolDatabase::load(dir.path());
        let category = |address| table.resolve(address).map(|e| e.category);
        assert_eq!(category(0x0001), Some(SymbolCategory::ZeroPage));
        assert_eq!(category(0xA474), Some(SymbolCategory::BasicRom));
        assert_eq!(category(0xD418), Some(SymbolCategory::IoRegister));
        assert_eq!(category(0xFFD2), Some(SymbolCategory::KernalRom));
        assert_eq!(category(0xC000), Some(SymbolCategory::ZeroPage));
    }

    #[test]
    fn test_top_level_files_by_stem() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "labels.json", r#"{"$C000": "main"}"#);
        write(dir.path(), "misc.json", r#"{"$D020": "EXTCOL"}"#);

        let (table, _) = SymbolDatabase::load(dir.path());
        assert_eq!(table.resolve(0xC000).unwrap().category, SymbolCategory::UserLabel);
        assert_eq!(table.resolve(0xD020).unwrap().category, SymbolCategory::IoRegister);
    }

    #[test]
    fn test_user_labels_override_io() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "io/vic.json", r#"{"$D020": "EXTCOL"}"#);
        write(dir.path(), "labels/mine.json", r#"{"$D020": "border"}"#);

        let (table, _) = SymbolDatabase::load(dir.path());
        assert_eq!(table.resolve(0xD020).unwrap().name, "border");
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "kernal.json",
            r#"{"$FFD2": "CHROUT", "nope": "X", "$FFE4": 42, "$FFCF": {"desc": "no name"}, "$FFE1": "  "}"#,
        );

        let (table, report) = SymbolDatabase::load(dir.path());
        assert_eq!(table.len(), 1);
        assert_eq!(report.warnings.len(), 4);
        assert!(report
            .warnings
            .iter()
            .all(|w| w.code == WarningCode::InvalidSymbolEntry));
    }

    #[test]
    fn test_unparsable_file_is_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "kernal.json", "[1, 2, 3]");
        write(dir.path(), "io.json", r#"{"$D020": "EXTCOL"}"#);

        let (table, report) = SymbolDatabase::load(dir.path());
        assert_eq!(table.len(), 1);
        assert_eq!(report.files_loaded, 1);
        assert_eq!(report.warnings[0].code, WarningCode::SymbolFileUnreadable);
    }

    #[test]
    fn test_comment_used_as_description() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "zeropage.json",
            r#"{"$FB": {"name": "FREEZP", "comment": "Free zero page"}}"#,
        );

        let (table, _) = SymbolDatabase::load(dir.path());
        assert_eq!(
            table.resolve(0x00FB).unwrap().description.as_deref(),
            Some("Free zero page")
        );
    }
}
