// 📂 Document Loader - turns files on disk into in-memory Workbooks
//
// The core never opens files itself. This is the collaborator the CLI and the
// tests use to get a Workbook: calamine for real spreadsheets, csv for
// fixtures checked in as text.

use crate::error::{ReceiptError, Result};
use crate::grid::{CellRef, CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

// ============================================================================
// FORMAT DETECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// xls, xlsx, xlsm, xlsb, ods
    Spreadsheet,
    /// A single CSV file = one sheet
    Csv,
    /// A directory of CSV files = one sheet per file
    CsvDirectory,
}

impl DocumentFormat {
    pub fn detect(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(Self::CsvDirectory);
        }
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Open any supported document as a Workbook
pub fn open_workbook(path: &Path) -> Result<Workbook> {
    let format = DocumentFormat::detect(path).ok_or_else(|| {
        ReceiptError::UnsupportedDocument(format!("unknown file type: {}", path.display()))
    })?;

    let workbook = match format {
        DocumentFormat::Spreadsheet => load_spreadsheet(path)?,
        DocumentFormat::Csv => load_csv(path)?,
        DocumentFormat::CsvDirectory => load_csv_dir(path)?,
    };

    debug!(
        document = %path.display(),
        sheets = workbook.sheet_count(),
        "loaded workbook"
    );
    Ok(workbook)
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

// ============================================================================
// CALAMINE BACKEND
// ============================================================================

/// Load every sheet of an Excel/ODS workbook, in workbook order
pub fn load_spreadsheet(path: &Path) -> Result<Workbook> {
    let mut source = open_workbook_auto(path)?;
    let mut workbook = Workbook::new(document_name(path));

    for name in source.sheet_names() {
        let values = source.worksheet_range(&name)?;
        // Formula extraction is not supported by every backend (e.g. some xls
        // variants); treat that as "no formulas" rather than failing the load.
        let formulas = source.worksheet_formula(&name).ok();
        workbook.push_sheet(range_to_sheet(&name, &values, formulas.as_ref()));
    }

    Ok(workbook)
}

fn convert_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Blank,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        // Dates stay as their Excel serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

fn range_to_sheet(name: &str, values: &Range<Data>, formulas: Option<&Range<String>>) -> Sheet {
    let mut sheet = Sheet::new(name);

    // used_cells() yields positions relative to the range start
    let (start_row, start_col) = values.start().unwrap_or_default();
    for (row, col, value) in values.used_cells() {
        let at = CellRef::new(start_row + row as u32, start_col + col as u32);
        sheet.set(at, convert_value(value));
    }

    // Formulas only fill cells that have no cached value
    if let Some(formulas) = formulas {
        let (start_row, start_col) = formulas.start().unwrap_or_default();
        for (row, col, formula) in formulas.used_cells() {
            if formula.is_empty() {
                continue;
            }
            let at = CellRef::new(start_row + row as u32, start_col + col as u32);
            if sheet.cell(at).is_none() {
                sheet.set(at, CellValue::Formula(formula.clone()));
            }
        }
    }

    sheet
}

// ============================================================================
// CSV BACKEND
// ============================================================================

/// Load one CSV file as a single-sheet workbook
pub fn load_csv(path: &Path) -> Result<Workbook> {
    let sheet = read_csv_sheet(path)?;
    Ok(Workbook::new(document_name(path)).with_sheet(sheet))
}

/// Load a directory of CSV files, one sheet per file, sorted by file name
pub fn load_csv_dir(path: &Path) -> Result<Workbook> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let file = entry?.path();
        if DocumentFormat::detect(&file) == Some(DocumentFormat::Csv) {
            files.push(file);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ReceiptError::UnsupportedDocument(format!(
            "no CSV sheets in directory: {}",
            path.display()
        )));
    }

    let mut workbook = Workbook::new(document_name(path));
    for file in files {
        workbook.push_sheet(read_csv_sheet(&file)?);
    }
    Ok(workbook)
}

fn read_csv_sheet(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut sheet = Sheet::new(name);
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (col, field) in record.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            sheet.set(
                CellRef::new(row as u32, col as u32),
                CellValue::String(field.to_string()),
            );
        }
    }
    Ok(sheet)
}

// ============================================================================
// TESTS
// ============================================================================
