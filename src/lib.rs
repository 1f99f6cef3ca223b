// Property Book - Core Library
// Hand receipt grid parsing + reconciliation, used by the CLI and tests

pub mod component_receipt;
pub mod consistency;
pub mod entities;
pub mod error;
pub mod export;
pub mod grid;
pub mod loader;
pub mod parser;
pub mod reconciliation;
pub mod unit_receipt;

#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod logging;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use component_receipt::{ComponentHandReceipt, ComponentReceiptLayout, ComponentReceiptParser};
pub use consistency::{ConsistencyWarning, Severity, WarningKind, WarningSummary};
pub use entities::{
    AccountableComponent, EndItem, EndItemGroup, GroupKey, Mos, Operator, OrderBy, PropertyBook, Rank,
};
pub use error::{ReceiptError, Result};
pub use export::{save_book_csv, write_book_csv};
pub use grid::{has_string_value, CellRef, CellValue, Sheet, Workbook};
pub use loader::{open_workbook, DocumentFormat};
pub use parser::{
    detect_kind, parse_receipt, DocumentKind, LayoutProbe, ParsedReceipt, ReceiptHeader, ReceiptParser,
};
pub use reconciliation::{ReconciliationEngine, ReconciliationReport};
pub use unit_receipt::{UnitHandReceipt, UnitReceiptLayout, UnitReceiptParser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
