// 🏗️ Parser Framework - shared machinery for both hand receipt families
//
// Each family gets its own parser (unit_receipt, component_receipt). This
// module holds what they share: the ReceiptParser trait, document detection,
// and the small text helpers for labeled cells like "FROM: LAST, FIRST/RANK".

use crate::component_receipt::{ComponentHandReceipt, ComponentReceiptParser};
use crate::entities::{Operator, Rank};
use crate::error::{ReceiptError, Result};
use crate::grid::{CellRef, Sheet, Workbook};
use crate::unit_receipt::{UnitHandReceipt, UnitReceiptParser};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// DocumentKind - which hand receipt family a workbook belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    UnitHandReceipt,
    ComponentHandReceipt,
}

impl DocumentKind {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            DocumentKind::UnitHandReceipt => "Unit Level Hand Receipt",
            DocumentKind::ComponentHandReceipt => "Component Hand Receipt",
        }
    }

    /// Short code for internal use
    pub fn code(&self) -> &str {
        match self {
            DocumentKind::UnitHandReceipt => "unit",
            DocumentKind::ComponentHandReceipt => "component",
        }
    }
}

/// Document-wide metadata shared by both receipt families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptHeader {
    pub uic: String,
    pub desc: String,
    /// Who signs the equipment over
    pub from: Operator,
    /// Who signs for the equipment
    pub to: Operator,
}

// ============================================================================
// COMPOSABLE TRAITS
// ============================================================================

/// ReceiptParser - Core trait (minimal, required)
///
/// Turns an already-opened workbook into a typed receipt. A missing or
/// unreadable required cell is a `ReceiptError::Format`; anything softer
/// ends up as a ConsistencyWarning on the output.
pub trait ReceiptParser: Send + Sync {
    type Output;

    fn parse(&self, workbook: &Workbook) -> Result<Self::Output>;

    /// Get the document family this parser handles
    fn kind(&self) -> DocumentKind;

    /// Get parser version (for provenance tracking)
    fn version(&self) -> &str {
        "1.0.0"
    }
}

/// LayoutProbe - Optional capability: check if a workbook has this parser's layout
///
/// Looks only at fixed label cells, never parses the whole document.
pub trait LayoutProbe {
    fn can_parse(&self, workbook: &Workbook) -> bool;
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// Detect the receipt family from the label cells of the first sheet
///
/// - "DATE PREPARED..." at (0, 0) → unit receipt
/// - "END ITEM NSN..." at (5, 0) → component receipt
pub fn detect_kind(workbook: &Workbook) -> Result<DocumentKind> {
    if UnitReceiptParser::new().can_parse(workbook) {
        return Ok(DocumentKind::UnitHandReceipt);
    }
    if ComponentReceiptParser::new().can_parse(workbook) {
        return Ok(DocumentKind::ComponentHandReceipt);
    }

    Err(ReceiptError::UnsupportedDocument(format!(
        "{} does not look like a unit or component hand receipt",
        workbook.name
    )))
}

/// Either kind of parsed receipt
#[derive(Debug, Clone)]
pub enum ParsedReceipt {
    Unit(UnitHandReceipt),
    Component(ComponentHandReceipt),
}

impl ParsedReceipt {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ParsedReceipt::Unit(_) => DocumentKind::UnitHandReceipt,
            ParsedReceipt::Component(_) => DocumentKind::ComponentHandReceipt,
        }
    }
}

/// Detect the family and parse with the matching default parser
pub fn parse_receipt(workbook: &Workbook) -> Result<ParsedReceipt> {
    let kind = detect_kind(workbook)?;
    debug!(document = %workbook.name, kind = kind.code(), "detected receipt");

    match kind {
        DocumentKind::UnitHandReceipt => UnitReceiptParser::new().parse(workbook).map(ParsedReceipt::Unit),
        DocumentKind::ComponentHandReceipt => ComponentReceiptParser::new()
            .parse(workbook)
            .map(ParsedReceipt::Component),
    }
}

// ============================================================================
// CELL HELPERS
// ============================================================================

/// Text of a required cell; absent or non-text cells are a format error
pub(crate) fn required_text(sheet: &Sheet, at: CellRef, kind: DocumentKind, field: &str) -> Result<String> {
    sheet
        .cell(at)
        .and_then(|value| value.text())
        .ok_or_else(|| {
            ReceiptError::format(
                kind.name(),
                field,
                format!("sheet {:?}: cell {} is missing", sheet.name, at),
            )
        })
}

/// Text of an optional cell, trimmed, None when blank
pub(crate) fn optional_text(sheet: &Sheet, at: CellRef) -> Option<String> {
    let text = sheet.cell(at)?.text()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Wrap any error as a format error on `field`
pub(crate) fn in_field(kind: DocumentKind, field: &str) -> impl Fn(ReceiptError) -> ReceiptError + '_ {
    move |err| match err {
        ReceiptError::Format { .. } => err,
        other => ReceiptError::format(kind.name(), field, other.to_string()),
    }
}

// ============================================================================
// TEXT HELPERS
// ============================================================================

/// Remove a literal label (first occurrence) and trim
///
/// `strip_label("LIN: Q32356", "LIN:")` → `"Q32356"`
pub fn strip_label(text: &str, label: &str) -> String {
    text.replacen(label, "", 1).trim().to_string()
}

/// Identity codes (NSN, LIN, serial) never contain whitespace
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Operator line with the optional team segment
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorLine {
    pub operator: Operator,
    pub team: Option<String>,
}

/// Parse a signer line such as `"TO: 911/MITCHELL, JAMES/CPT"`
///
/// Segments are split on `/`: the one holding a comma is `LAST, FIRST`, the
/// last one is the rank, and any other segment is the team. Accepts
/// `TEAM/LAST, FIRST/RANK`, `LAST, FIRST/TEAM/RANK` and `LAST, FIRST/RANK`.
pub fn parse_operator(text: &str, label: &str) -> Result<OperatorLine> {
    let body = strip_label(text, label);
    let segments: Vec<&str> = body
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let name_index = segments
        .iter()
        .position(|s| s.contains(','))
        .ok_or_else(|| ReceiptError::invalid_argument(format!("no \"LAST, FIRST\" name in {:?}", body)))?;

    let rank_index = segments.len() - 1;
    if rank_index == name_index {
        return Err(ReceiptError::invalid_argument(format!("no rank in {:?}", body)));
    }
    let rank: Rank = segments[rank_index].parse()?;

    let (last, first) = segments[name_index]
        .split_once(',')
        .ok_or_else(|| ReceiptError::invalid_argument(format!("malformed name in {:?}", body)))?;
    let operator = Operator::new(first, last, rank)?;

    let team: Vec<&str> = segments
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != name_index && *i != rank_index)
        .map(|(_, s)| *s)
        .collect();

    Ok(OperatorLine {
        operator,
        team: if team.is_empty() { None } else { Some(team.join("/")) },
    })
}

/// Split `"UIC/DESC: WTN6A0/1ST BN, 19TH SFG, CO A"` into (UIC, DESC)
pub fn parse_uic_desc(text: &str) -> Result<(String, String)> {
    let body = strip_label(text, "UIC/DESC:");
    let (uic, desc) = body
        .split_once('/')
        .ok_or_else(|| ReceiptError::invalid_argument(format!("expected \"UIC/DESC\", got {:?}", body)))?;

    let uic = compact(uic);
    if uic.is_empty() {
        return Err(ReceiptError::invalid_argument("blank UIC"));
    }
    Ok((uic, desc.trim().to_string()))
}

/// Parse `"DATE PREPARED: 09/09/13"` as month/day/year
///
/// Two-digit years are offset by 2000. Returns None for anything else; the
/// caller decides how to recover.
pub fn parse_prepared_date(text: &str) -> Option<NaiveDate> {
    let cleaned = compact(
        &text
            .replace("DATE PREPARED:", "")
            .replace("UNIT LEVEL HAND RECEIPT", ""),
    );

    let parts: Vec<&str> = cleaned.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let mut year: i32 = parts[2].parse().ok()?;
    if parts[2].len() <= 2 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

// ============================================================================
// TESTS
// ============================================================================
