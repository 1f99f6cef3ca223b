// 🧮 Grid Accessor - read-only addressable view over workbook sheets
//
// Hand receipts have no schema. Every parser in this crate works by poking at
// fixed (row, col) positions and checking the SHAPE of what it finds there,
// so this module only needs to answer "what is in this cell?" and "which cell
// is next to it?". All coordinates are zero-based.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// CELL REFERENCE
// ============================================================================

/// Zero-based (row, col) coordinate, compared by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        CellRef { row, col }
    }

    /// Same row, preceding column. `None` in column 0.
    pub fn left(self) -> Option<Self> {
        self.col.checked_sub(1).map(|col| CellRef::new(self.row, col))
    }

    /// Same row, following column
    pub fn right(self) -> Option<Self> {
        self.col.checked_add(1).map(|col| CellRef::new(self.row, col))
    }

    /// Same column, preceding row. `None` in row 0.
    pub fn up(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| CellRef::new(row, self.col))
    }

    /// Same column, following row
    pub fn down(self) -> Option<Self> {
        self.row.checked_add(1).map(|row| CellRef::new(row, self.col))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ============================================================================
// CELL VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Blank,
    /// Formula with no cached value
    Formula(String),
    Error(String),
}

impl CellValue {
    /// The raw string, only for string cells
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// True only for string cells with non-blank trimmed content
    pub fn has_string_value(&self) -> bool {
        self.as_str().is_some_and(|s| !s.trim().is_empty())
    }

    /// Textual content for strings and numbers.
    ///
    /// Integral numbers render without a fractional part, so a serial number
    /// typed as `12345` reads back as "12345" rather than "12345.0".
    pub fn text(&self) -> Option<String> {
        match self {
            CellValue::String(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }

    /// Integer content: integral numbers, or strings that parse after trimming
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Blank => Ok(()),
            CellValue::Formula(formula) => write!(f, "={}", formula.trim_start_matches('=')),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Workhorse predicate for label/header detection: present, a string, and not blank
pub fn has_string_value(cell: Option<&CellValue>) -> bool {
    cell.is_some_and(CellValue::has_string_value)
}

// ============================================================================
// SHEET
// ============================================================================

/// Sparse sheet: only populated cells are stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<CellRef, CellValue>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Builder pattern: add a string cell
    pub fn with_cell(mut self, row: u32, col: u32, value: impl Into<String>) -> Self {
        self.set(CellRef::new(row, col), CellValue::String(value.into()));
        self
    }

    /// Builder pattern: add a cell of any type
    pub fn with_value(mut self, row: u32, col: u32, value: CellValue) -> Self {
        self.set(CellRef::new(row, col), value);
        self
    }

    pub fn set(&mut self, at: CellRef, value: CellValue) {
        self.cells.insert(at, value);
    }

    pub fn cell(&self, at: CellRef) -> Option<&CellValue> {
        self.cells.get(&at)
    }

    /// String content at `at`, only if the cell is a string cell
    pub fn string(&self, at: CellRef) -> Option<&str> {
        self.cell(at).and_then(CellValue::as_str)
    }

    pub fn has_string_value(&self, at: CellRef) -> bool {
        has_string_value(self.cell(at))
    }

    /// Index of the last row holding any non-blank cell
    pub fn last_row(&self) -> Option<u32> {
        self.cells
            .iter()
            .rev()
            .find(|(_, value)| !value.is_blank())
            .map(|(at, _)| at.row)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellRef, &CellValue)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ============================================================================
// WORKBOOK
// ============================================================================

/// An already-opened, fully in-memory document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(name: impl Into<String>) -> Self {
        Workbook {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    /// Builder pattern: append a sheet
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn push_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn cell(&self, sheet: usize, row: u32, col: u32) -> Option<&CellValue> {
        self.sheet(sheet)?.cell(CellRef::new(row, col))
    }

    /// SHA-256 over sheet names and cell contents (hex). Blank cells are skipped.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for sheet in &self.sheets {
            hasher.update(format!("[{}]", sheet.name));
            for (at, value) in sheet.cells() {
                if value.is_blank() {
                    continue;
                }
                hasher.update(format!("{},{}={:?};", at.row, at.col, value));
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================
