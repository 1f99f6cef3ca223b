// 🩺 Consistency Warnings - non-fatal findings while reading hand receipts
//
// A warning never aborts a parse. Each one is logged through tracing the
// moment it is created and also kept on the parse result, so callers can
// report them after the fact.

use crate::grid::CellRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

// ============================================================================
// WARNING KIND & SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WarningKind {
    /// Declared quantity differs from the number of serial numbers found
    QuantityMismatch,
    /// Same LIN/NSN listed on two header rows of one receipt
    DuplicateGroupHeader,
    /// Component receipt group the unit receipt does not acknowledge
    OrphanedComponentList,
    UnparsableDate,
    UnparsableQuantity,
    /// Component sheet with no COEI/BII section
    MissingSection,
}

impl WarningKind {
    pub fn name(&self) -> &str {
        match self {
            WarningKind::QuantityMismatch => "quantity_mismatch",
            WarningKind::DuplicateGroupHeader => "duplicate_group_header",
            WarningKind::OrphanedComponentList => "orphaned_component_list",
            WarningKind::UnparsableDate => "unparsable_date",
            WarningKind::UnparsableQuantity => "unparsable_quantity",
            WarningKind::MissingSection => "missing_section",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            WarningKind::MissingSection => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning, // Data is questionable; a person should look at it
    Info,    // Expected gaps in otherwise valid data
}

// ============================================================================
// CONSISTENCY WARNING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyWarning {
    pub kind: WarningKind,
    pub severity: Severity,
    /// Sheet the finding came from (None for reconciliation findings)
    pub sheet: Option<String>,
    pub location: Option<CellRef>,
    pub message: String,
}

impl ConsistencyWarning {
    /// Create and log a warning found on a sheet
    pub fn at(
        kind: WarningKind,
        sheet: impl Into<String>,
        location: Option<CellRef>,
        message: impl Into<String>,
    ) -> Self {
        Self::emit(ConsistencyWarning {
            kind,
            severity: kind.default_severity(),
            sheet: Some(sheet.into()),
            location,
            message: message.into(),
        })
    }

    /// Create and log a warning that belongs to no particular sheet
    pub fn general(kind: WarningKind, message: impl Into<String>) -> Self {
        Self::emit(ConsistencyWarning {
            kind,
            severity: kind.default_severity(),
            sheet: None,
            location: None,
            message: message.into(),
        })
    }

    fn emit(warning: Self) -> Self {
        let sheet = warning.sheet.as_deref().unwrap_or("-");
        let location = warning
            .location
            .map(|at| at.to_string())
            .unwrap_or_default();

        match warning.severity {
            Severity::Warning => warn!(
                kind = warning.kind.name(),
                sheet,
                location = %location,
                "{}",
                warning.message
            ),
            Severity::Info => info!(
                kind = warning.kind.name(),
                sheet,
                location = %location,
                "{}",
                warning.message
            ),
        }
        warning
    }
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(sheet) = &self.sheet {
            write!(f, " {}", sheet)?;
        }
        if let Some(at) = &self.location {
            write!(f, " {}", at)?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningSummary {
    pub total: usize,
    pub warnings: usize,
    pub info: usize,
}

impl WarningSummary {
    pub fn from_warnings(warnings: &[ConsistencyWarning]) -> Self {
        let warning_count = warnings
            .iter()
            .filter(|w| w.severity == Severity::Warning)
            .count();

        WarningSummary {
            total: warnings.len(),
            warnings: warning_count,
            info: warnings.len() - warning_count,
        }
    }

    pub fn count_of(warnings: &[ConsistencyWarning], kind: WarningKind) -> usize {
        warnings.iter().filter(|w| w.kind == kind).count()
    }
}

// ============================================================================
// TESTS
// ============================================================================
