// ⚖️ Reconciliation Engine - merge both hand receipts into one Property Book
//
// The unit receipt is authoritative for existence:
//   1. keep component groups whose key the unit receipt also has
//      (the rest are dropped with a warning)
//   2. fold every unit group in: combine on a key match, append otherwise
//
// The final group set therefore equals the unit receipt's, enriched with
// COEI/BII data wherever the component receipt agrees.

use crate::component_receipt::ComponentHandReceipt;
use crate::consistency::{ConsistencyWarning, WarningKind, WarningSummary};
use crate::entities::{GroupKey, PropertyBook};
use crate::unit_receipt::UnitHandReceipt;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

// ============================================================================
// RECONCILIATION REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub run_id: Uuid,
    pub book: PropertyBook,
    /// Unit groups enriched from the component receipt
    pub matched: usize,
    /// Unit groups with no component counterpart
    pub unit_only: usize,
    /// Component groups the unit receipt does not acknowledge
    pub dropped: Vec<GroupKey>,
    /// Parse warnings of both receipts, then reconciliation warnings
    pub warnings: Vec<ConsistencyWarning>,
    pub component_fingerprint: Option<String>,
    pub unit_fingerprint: Option<String>,
    pub reconciled_at: chrono::DateTime<chrono::Utc>,
}

impl ReconciliationReport {
    /// Record which source workbooks produced this report
    pub fn with_sources(mut self, component_fingerprint: impl Into<String>, unit_fingerprint: impl Into<String>) -> Self {
        self.component_fingerprint = Some(component_fingerprint.into());
        self.unit_fingerprint = Some(unit_fingerprint.into());
        self
    }

    pub fn has_dropped_groups(&self) -> bool {
        !self.dropped.is_empty()
    }

    pub fn warning_summary(&self) -> WarningSummary {
        WarningSummary::from_warnings(&self.warnings)
    }

    pub fn summary(&self) -> String {
        let warnings = self.warning_summary();
        format!(
            "Property book for {} team {} ({}): {} groups, {} items; {} matched, {} unit only, {} dropped; {} warnings ({} info)",
            self.book.uic,
            self.book.team,
            self.book.date_prepared,
            self.book.len(),
            self.book.total_items(),
            self.matched,
            self.unit_only,
            self.dropped.len(),
            warnings.warnings,
            warnings.info
        )
    }
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine
    }

    /// Reconcile a component receipt against a unit receipt
    ///
    /// Never fails. Inputs are borrowed and cloned, so running twice on the
    /// same receipts yields structurally equal books.
    ///
    /// Example:
    /// ```no_run
    /// use property_book::{open_workbook, ComponentReceiptParser, ReceiptParser,
    ///     ReconciliationEngine, UnitReceiptParser};
    /// use std::path::Path;
    ///
    /// let unit = UnitReceiptParser::new().parse(&open_workbook(Path::new("9111_UNIT_HR.xls"))?)?;
    /// let component = ComponentReceiptParser::new()
    ///     .parse(&open_workbook(Path::new("ComponentHandReceipt.xls"))?)?;
    ///
    /// let report = ReconciliationEngine::new().reconcile(&component, &unit);
    /// println!("{}", report.summary());
    /// # Ok::<(), property_book::ReceiptError>(())
    /// ```
    pub fn reconcile(&self, component: &ComponentHandReceipt, unit: &UnitHandReceipt) -> ReconciliationReport {
        let header = &unit.header;
        let mut book = PropertyBook::new(
            header.from.clone(),
            header.to.clone(),
            unit.date_prepared,
            header.uic.clone(),
            header.desc.clone(),
            unit.team.clone(),
        );

        let mut warnings: Vec<ConsistencyWarning> = component
            .warnings
            .iter()
            .chain(unit.warnings.iter())
            .cloned()
            .collect();

        // Step 1: component groups the unit receipt acknowledges
        let mut dropped = Vec::new();
        for group in &component.groups {
            if unit.groups.contains(group) {
                book.groups.push(group.clone());
            } else {
                warnings.push(ConsistencyWarning::general(
                    WarningKind::OrphanedComponentList,
                    format!("component receipt has {} which the unit receipt does not, dropping it", group),
                ));
                dropped.push(group.key());
            }
        }

        // Step 2: every unit group, combined into its match or appended
        let mut matched = 0;
        let mut unit_only = 0;
        for group in &unit.groups {
            match book.groups.iter_mut().find(|existing| existing.has_key(&group.key())) {
                Some(existing) => {
                    if let Err(err) = existing.combine(group) {
                        warn!(group = %group, error = %err, "could not combine unit group");
                    }
                    // The unit receipt's name and quantity win over the component sheets
                    existing.set_name(group.name());
                    if let Some(quantity) = group.quantity() {
                        existing.set_quantity(quantity);
                    }
                    matched += 1;
                }
                None => {
                    book.groups.push(group.clone());
                    unit_only += 1;
                }
            }
        }

        info!(
            groups = book.len(),
            matched,
            unit_only,
            dropped = dropped.len(),
            "reconciled property book"
        );

        ReconciliationReport {
            run_id: Uuid::new_v4(),
            book,
            matched,
            unit_only,
            dropped,
            warnings,
            component_fingerprint: None,
            unit_fingerprint: None,
            reconciled_at: chrono::Utc::now(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
