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

//! Address to name resolution.
//!
//! Symbols come in five categories. When several categories name the same
//! address, the most specific wins:
//!
//! `UserLabel > IoRegister > KernalRom > BasicRom > ZeroPage`
//!
//! - [`database`] - JSON symbol database loader
//! - [`builtin`] - a small built-in C64 symbol set

pub mod builtin;
pub mod database;

pub use builtin::builtin_table;
pub use database::{parse_address, LoadReport, SymbolDatabase};

use once_cell::sync::OnceCell;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Environment variable naming the symbol database directory.
pub const SYMBOLS_ENV: &str = "DECOMP64_SYMBOLS";

/// Directory used when neither a path nor the environment variable is given.
pub const DEFAULT_SYMBOLS_DIR: &str = "symbols";

/// Where a symbol comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolCategory {
    /// Zero page and other RAM system locations.
    ZeroPage,
    /// KERNAL ROM routines and vectors.
    KernalRom,
    /// BASIC ROM routines.
    BasicRom,
    /// VIC-II, SID, CIA and color RAM registers.
    IoRegister,
    /// Labels supplied by the user.
    UserLabel,
}

impl SymbolCategory {
    /// All categories, lowest precedence first.
    pub const ALL: [SymbolCategory; 5] = [
        SymbolCategory::ZeroPage,
        SymbolCategory::BasicRom,
        SymbolCategory::KernalRom,
        SymbolCategory::IoRegister,
        SymbolCategory::UserLabel,
    ];

    /// Merge rank; higher wins.
    pub fn precedence(self) -> u8 {
        match self {
            SymbolCategory::ZeroPage => 0,
            SymbolCategory::BasicRom => 1,
            SymbolCategory::KernalRom => 2,
            SymbolCategory::IoRegister => 3,
            SymbolCategory::UserLabel => 4,
        }
    }

    /// Category implied by where an address lies in the C64 memory map.
    pub fn for_address(address: u16) -> Self {
        match address {
            0xA000..=0xBFFF => SymbolCategory::BasicRom,
            0xD000..=0xDFFF => SymbolCategory::IoRegister,
            0xE000..=0xFFFF => SymbolCategory::KernalRom,
            _ => SymbolCategory::ZeroPage,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            SymbolCategory::ZeroPage => "zero page",
            SymbolCategory::KernalRom => "KERNAL ROM",
            SymbolCategory::BasicRom => "BASIC ROM",
            SymbolCategory::IoRegister => "I/O register",
            SymbolCategory::UserLabel => "user label",
        }
    }
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// The address.
    pub address: u16,
    /// The name, as written in the source database.
    pub name: String,
    /// Where the name comes from.
    pub category: SymbolCategory,
    /// Optional description, emitted as a comment.
    pub description: Option<String>,
}

impl SymbolEntry {
    /// Create an entry without description.
    pub fn new(address: u16, name: impl Into<String>, category: SymbolCategory) -> Self {
        Self {
            address,
            name: name.into(),
            category,
            description: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Anything that can name an address.
pub trait SymbolSource {
    /// Look up the symbol for an address.
    fn resolve(&self, address: u16) -> Option<&SymbolEntry>;
}

/// A source that knows no symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl SymbolSource for NoSymbols {
    fn resolve(&self, _address: u16) -> Option<&SymbolEntry> {
        None
    }
}

/// All categories merged into one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedSymbolTable {
    entries: BTreeMap<u16, SymbolEntry>,
}

impl UnifiedSymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, keeping the existing one if it has higher precedence.
    ///
    /// An entry of equal precedence replaces the existing one. Returns
    /// whether the entry was stored.
    pub fn insert(&mut self, entry: SymbolEntry) -> bool {
        match self.entries.entry(entry.address) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            Entry::Occupied(mut slot) => {
                if entry.category.precedence() >= slot.get().category.precedence() {
                    slot.insert(entry);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Add entries from `fallback` for addresses this table does not name.
    pub fn merge_fallback(&mut self, fallback: &UnifiedSymbolTable) {
        for entry in fallback.iter() {
            self.entries
                .entry(entry.address)
                .or_insert_with(|| entry.clone());
        }
    }

    /// Look up an address.
    pub fn resolve(&self, address: u16) -> Option<&SymbolEntry> {
        self.entries.get(&address)
    }

    /// Number of resolvable addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no address resolves.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in address order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.values()
    }

    /// Resolvable entries of one category, in address order.
    pub fn entries_in(&self, category: SymbolCategory) -> impl Iterator<Item = &SymbolEntry> {
        self.entries
            .values()
            .filter(move |entry| entry.category == category)
    }
}

impl SymbolSource for UnifiedSymbolTable {
    fn resolve(&self, address: u16) -> Option<&SymbolEntry> {
        UnifiedSymbolTable::resolve(self, address)
    }
}

impl FromIterator<SymbolEntry> for UnifiedSymbolTable {
    fn from_iter<I: IntoIterator<Item = SymbolEntry>>(iter: I) -> Self {
        let mut table = UnifiedSymbolTable::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

static GLOBAL_DIR: OnceCell<PathBuf> = OnceCell::new();
static GLOBAL: OnceCell<(UnifiedSymbolTable, LoadReport)> = OnceCell::new();

/// Symbol directory from the environment, or the default.
pub fn default_symbols_dir() -> PathBuf {
    std::env::var_os(SYMBOLS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SYMBOLS_DIR))
}

/// Choose the directory the process-wide table loads from.
///
/// Returns `false` if a directory was already chosen or the table was
/// already loaded.
pub fn init_global(dir: impl Into<PathBuf>) -> bool {
    if GLOBAL.get().is_some() {
        return false;
    }
    GLOBAL_DIR.set(dir.into()).is_ok()
}

fn loaded() -> &'static (UnifiedSymbolTable, LoadReport) {
    GLOBAL.get_or_init(|| {
        let dir = GLOBAL_DIR.get().cloned().unwrap_or_else(default_symbols_dir);
        SymbolDatabase::load(&dir)
    })
}

/// The process-wide symbol table, loaded on first use.
pub fn global() -> &'static UnifiedSymbolTable {
    &loaded().0
}

/// What happened while loading the process-wide table.
pub fn global_report() -> &'static LoadReport {
    &loaded().1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let ranks: Vec<u8> = SymbolCategory::ALL.iter().map(|c| c.precedence()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_for_address() {
        assert_eq!(SymbolCategory::for_address(0x00FB), SymbolCategory::ZeroPage);
        assert_eq!(SymbolCategory::for_address(0x0400), SymbolCategory::ZeroPage);
        assert_eq!(SymbolCategory::for_address(0xA474), SymbolCategory::BasicRom);
        assert_eq!(SymbolCategory::for_address(0xD020), SymbolCategory::IoRegister);
        assert_eq!(SymbolCategory::for_address(0xFFD2), SymbolCategory::KernalRom);
    }

    #[test]
    fn test_higher_precedence_wins_regardless_of_order() {
        let zp = SymbolEntry::new(0xD020, "ZP_NAME", SymbolCategory::ZeroPage);
        let io = SymbolEntry::new(0xD020, "EXTCOL", SymbolCategory::IoRegister);
        let user = SymbolEntry::new(0xD020, "border", SymbolCategory::UserLabel);

        let forward: UnifiedSymbolTable = vec![zp.clone(), io.clone(), user.clone()]
            .into_iter()
            .collect();
        let backward: UnifiedSymbolTable = vec![user, io, zp].into_iter().collect();

        assert_eq!(forward.resolve(0xD020).map(|e| e.name.as_str()), Some("border"));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_same_category_later_wins() {
        let mut table = UnifiedSymbolTable::new();
        table.insert(SymbolEntry::new(0xFFD2, "BSOUT", SymbolCategory::KernalRom));
        assert!(table.insert(SymbolEntry::new(0xFFD2, "CHROUT", SymbolCategory::KernalRom)));
        assert_eq!(table.resolve(0xFFD2).map(|e| e.name.as_str()), Some("CHROUT"));
        assert!(!table.insert(SymbolEntry::new(0xFFD2, "X", SymbolCategory::ZeroPage)));
    }

    #[test]
    fn test_merge_fallback_keeps_existing() {
        let mut table = UnifiedSymbolTable::new();
        table.insert(SymbolEntry::new(0xD020, "border", SymbolCategory::UserLabel));

        let mut fallback = UnifiedSymbolTable::new();
        fallback.insert(SymbolEntry::new(0xD020, "BORDER_COLOR", SymbolCategory::IoRegister));
        fallback.insert(SymbolEntry::new(0xD021, "BACKGROUND_COLOR", SymbolCategory::IoRegister));

        table.merge_fallback(&fallback);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(0xD020).map(|e| e.name.as_str()), Some("border"));
        assert_eq!(table.entries_in(SymbolCategory::IoRegister).count(), 1);
    }

    #[test]
    fn test_no_symbols() {
        assert!(NoSymbols.resolve(0xFFD2).is_none());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let table: UnifiedSymbolTable = vec![SymbolEntry::new(0x00FB, "PTR", SymbolCategory::ZeroPage)]
            .into_iter()
            .collect();
        assert_eq!(table.resolve(0x00FB), table.resolve(0x00FB));
        assert!(table.resolve(0x00FC).is_none());
    }
}
