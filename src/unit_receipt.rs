// 📋 Unit Level Hand Receipt Parser
//
// One sheet, scanned top to bottom. Header rows carry no marker, so a row is
// an item header purely by shape: a 6-character LIN, a 13-character NSN and
// a non-blank name in their fixed columns. Rows below a header that have
// something in the first column are serial number rows.

use crate::consistency::{ConsistencyWarning, WarningKind};
use crate::entities::{EndItem, EndItemGroup};
use crate::error::{ReceiptError, Result};
use crate::grid::{CellRef, CellValue, Sheet, Workbook};
use crate::parser::{
    compact, in_field, optional_text, parse_operator, parse_prepared_date, parse_uic_desc,
    required_text, DocumentKind, LayoutProbe, ReceiptHeader, ReceiptParser,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// LAYOUT
// ============================================================================

/// Fixed positions of the known unit receipt template (all zero-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReceiptLayout {
    pub first_row: u32,
    pub lin_col: u32,
    pub nsn_col: u32,
    pub name_col: u32,
    pub qty_col: u32,
    /// Columns holding serial numbers on continuation rows
    pub serial_cols: Vec<u32>,
    pub lin_len: usize,
    pub nsn_len: usize,
    pub date_cell: CellRef,
    pub from_cell: CellRef,
    pub to_cell: CellRef,
    pub uic_desc_cell: CellRef,
}

impl Default for UnitReceiptLayout {
    fn default() -> Self {
        UnitReceiptLayout {
            first_row: 7,
            lin_col: 0,
            nsn_col: 2,
            name_col: 4,
            qty_col: 9,
            serial_cols: vec![0, 4, 5],
            lin_len: 6,
            nsn_len: 13,
            date_cell: CellRef::new(0, 0),
            from_cell: CellRef::new(2, 5),
            to_cell: CellRef::new(3, 5),
            uic_desc_cell: CellRef::new(3, 0),
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitHandReceipt {
    pub header: ReceiptHeader,
    pub team: String,
    pub date_prepared: NaiveDate,
    pub groups: Vec<EndItemGroup>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl UnitHandReceipt {
    pub fn group(&self, nsn: &str, lin: &str) -> Option<&EndItemGroup> {
        self.groups.iter().find(|g| g.matches(nsn, lin))
    }

    pub fn has_group(&self, nsn: &str, lin: &str) -> bool {
        self.group(nsn, lin).is_some()
    }

    pub fn total_items(&self) -> usize {
        self.groups.iter().map(EndItemGroup::len).sum()
    }
}

// ============================================================================
// PARSER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct UnitReceiptParser {
    layout: UnitReceiptLayout,
}

impl UnitReceiptParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: UnitReceiptLayout) -> Self {
        UnitReceiptParser { layout }
    }

    pub fn layout(&self) -> &UnitReceiptLayout {
        &self.layout
    }

    fn cell(&self, row: u32, col: u32) -> CellRef {
        CellRef::new(row, col)
    }

    /// Shape-based header test. LIN and NSN lengths are taken as written,
    /// so a padded code does not count.
    pub fn is_item_header(&self, sheet: &Sheet, row: u32) -> bool {
        let code_of_len = |col: u32, len: usize| {
            sheet
                .string(self.cell(row, col))
                .is_some_and(|s| !s.trim().is_empty() && s.chars().count() == len)
        };

        code_of_len(self.layout.lin_col, self.layout.lin_len)
            && code_of_len(self.layout.nsn_col, self.layout.nsn_len)
            && sheet.has_string_value(self.cell(row, self.layout.name_col))
    }

    fn read_header(&self, sheet: &Sheet) -> Result<(ReceiptHeader, String)> {
        let kind = self.kind();

        let uic_desc = required_text(sheet, self.layout.uic_desc_cell, kind, "UIC/DESC")?;
        let (uic, desc) = parse_uic_desc(&uic_desc).map_err(in_field(kind, "UIC/DESC"))?;

        let from_text = required_text(sheet, self.layout.from_cell, kind, "FROM")?;
        let from = parse_operator(&from_text, "FROM:").map_err(in_field(kind, "FROM"))?;

        let to_text = required_text(sheet, self.layout.to_cell, kind, "TO")?;
        let to = parse_operator(&to_text, "TO:").map_err(in_field(kind, "TO"))?;

        // The team is printed on the TO line of observed receipts
        let team = to
            .team
            .or(from.team)
            .ok_or_else(|| ReceiptError::format(kind.name(), "team", "no team on the TO or FROM line"))?;

        let header = ReceiptHeader {
            uic,
            desc,
            from: from.operator,
            to: to.operator,
        };
        Ok((header, team))
    }

    /// Malformed or missing dates fall back to today with a warning
    fn read_date(&self, sheet: &Sheet, warnings: &mut Vec<ConsistencyWarning>) -> NaiveDate {
        let at = self.layout.date_cell;
        let text = optional_text(sheet, at);

        if let Some(date) = text.as_deref().and_then(parse_prepared_date) {
            return date;
        }

        warnings.push(ConsistencyWarning::at(
            WarningKind::UnparsableDate,
            sheet.name.as_str(),
            Some(at),
            format!(
                "unable to parse date prepared from {:?}, using today",
                text.unwrap_or_default()
            ),
        ));
        Local::now().date_naive()
    }

    fn read_groups(&self, sheet: &Sheet, warnings: &mut Vec<ConsistencyWarning>) -> Result<Vec<EndItemGroup>> {
        let mut groups: Vec<EndItemGroup> = Vec::new();
        let Some(last_row) = sheet.last_row() else {
            return Ok(groups);
        };

        for row in self.layout.first_row..=last_row {
            if !self.is_item_header(sheet, row) {
                continue;
            }

            let group = self.read_group(sheet, row, last_row, warnings)?;
            debug!(row, group = %group, items = group.len(), "read end item group");

            // Same LIN/NSN printed on two header blocks
            match groups.iter_mut().find(|g| g.has_key(&group.key())) {
                Some(existing) => {
                    let message = match (existing.quantity(), group.quantity()) {
                        (Some(first), Some(again)) if first != again => format!(
                            "{} listed again with quantity {} (first listed with {}), combining and keeping {}",
                            group.key(),
                            again,
                            first,
                            first
                        ),
                        _ => format!("{} listed again, combining", group.key()),
                    };
                    warnings.push(ConsistencyWarning::at(
                        WarningKind::DuplicateGroupHeader,
                        sheet.name.as_str(),
                        Some(self.cell(row, self.layout.lin_col)),
                        message,
                    ));
                    existing
                        .combine(&group)
                        .map_err(in_field(self.kind(), "group"))?;
                }
                None => groups.push(group),
            }
        }

        Ok(groups)
    }

    fn read_group(
        &self,
        sheet: &Sheet,
        row: u32,
        last_row: u32,
        warnings: &mut Vec<ConsistencyWarning>,
    ) -> Result<EndItemGroup> {
        let kind = self.kind();
        let lin = compact(&required_text(sheet, self.cell(row, self.layout.lin_col), kind, "LIN")?);
        let nsn = compact(&required_text(sheet, self.cell(row, self.layout.nsn_col), kind, "NSN")?);
        let name = required_text(sheet, self.cell(row, self.layout.name_col), kind, "name")?
            .trim()
            .to_string();
        let quantity = self.read_quantity(sheet, row)?;

        // Anything in the first column of the next row means serial numbers follow
        let next_row = row + 1;
        let serialized = optional_text(sheet, self.cell(next_row, self.layout.lin_col)).is_some();

        let mut group = EndItemGroup::new(name.as_str(), lin.as_str(), nsn.as_str(), serialized)
            .map_err(in_field(kind, "LIN/NSN"))?;
        group.set_quantity(quantity);

        if !serialized {
            for _ in 0..quantity {
                group.add(EndItem::new(name.as_str(), lin.as_str(), nsn.as_str())?)?;
            }
            return Ok(group);
        }

        let serials = self.read_serials(sheet, next_row, last_row, quantity as usize);
        if serials.len() != quantity as usize {
            warnings.push(ConsistencyWarning::at(
                WarningKind::QuantityMismatch,
                sheet.name.as_str(),
                Some(self.cell(row, self.layout.qty_col)),
                format!(
                    "{}: found {} serial numbers, quantity is {}",
                    group.key(),
                    serials.len(),
                    quantity
                ),
            ));
        }

        for serial in serials {
            let item = EndItem::new(name.as_str(), lin.as_str(), nsn.as_str())?.with_serial_number(serial);
            group.add(item)?;
        }
        Ok(group)
    }

    fn read_quantity(&self, sheet: &Sheet, row: u32) -> Result<u32> {
        let at = self.cell(row, self.layout.qty_col);
        let cell = sheet.cell(at);

        cell.and_then(CellValue::as_integer)
            .and_then(|qty| u32::try_from(qty).ok())
            .ok_or_else(|| {
                ReceiptError::format(
                    self.kind().name(),
                    "quantity",
                    format!(
                        "row {}: {:?} is not a whole number",
                        row,
                        cell.map(|v| v.to_string()).unwrap_or_default()
                    ),
                )
            })
    }

    /// Collect serials from `start` until `quantity` is reached, the next
    /// header row begins, or the sheet ends. A row may hold up to three.
    fn read_serials(&self, sheet: &Sheet, start: u32, last_row: u32, quantity: usize) -> Vec<String> {
        let mut serials = Vec::new();
        let mut row = start;

        while serials.len() < quantity && row <= last_row && !self.is_item_header(sheet, row) {
            for &col in &self.layout.serial_cols {
                if let Some(serial) = optional_text(sheet, self.cell(row, col)) {
                    serials.push(compact(&serial));
                }
            }
            row += 1;
        }

        serials
    }
}

impl ReceiptParser for UnitReceiptParser {
    type Output = UnitHandReceipt;

    fn parse(&self, workbook: &Workbook) -> Result<UnitHandReceipt> {
        let kind = self.kind();
        let sheet = workbook.sheet(0).ok_or_else(|| {
            ReceiptError::format(kind.name(), "sheet", format!("{} has no sheets", workbook.name))
        })?;

        let mut warnings = Vec::new();
        let (header, team) = self.read_header(sheet)?;
        let date_prepared = self.read_date(sheet, &mut warnings);
        let groups = self.read_groups(sheet, &mut warnings)?;

        info!(
            document = %workbook.name,
            groups = groups.len(),
            warnings = warnings.len(),
            "parsed unit hand receipt"
        );

        Ok(UnitHandReceipt {
            header,
            team,
            date_prepared,
            groups,
            warnings,
        })
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::UnitHandReceipt
    }
}

impl LayoutProbe for UnitReceiptParser {
    fn can_parse(&self, workbook: &Workbook) -> bool {
        workbook
            .sheet(0)
            .and_then(|sheet| sheet.string(self.layout.date_cell))
            .is_some_and(|text| text.contains("DATE PREPARED"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::WarningSummary;
    use crate::entities::{Operator, Rank};
    use crate::testing::{unit_header_sheet, unit_workbook, write_unit_groups, UnitGroup};

    const RIFLE: (&str, &str, &str) = ("R95035", "1005011231234", "RIFLE, 5.56MM, M4");
    const TENT: (&str, &str, &str) = ("T12345", "8340012345678", "TENT, GENERAL PURPOSE");

    fn parse(groups: &[UnitGroup]) -> UnitHandReceipt {
        UnitReceiptParser::new().parse(&unit_workbook(groups)).unwrap()
    }

    #[test]
    fn test_metadata() {
        let receipt = parse(&[]);

        assert_eq!(receipt.date_prepared, NaiveDate::from_ymd_opt(2013, 9, 9).unwrap());
        assert_eq!(receipt.header.uic, "WTN6A0");
        assert_eq!(receipt.header.desc, "1ST BN, 19TH SFG, CO A");
        assert_eq!(receipt.team, "911");
        assert_eq!(receipt.header.from, Operator::new("JONATHAN", "TSCHETTER", Rank::MAJ).unwrap());
        assert_eq!(receipt.header.to, Operator::new("JAMES", "MITCHELL", Rank::CPT).unwrap());
        assert!(receipt.groups.is_empty());
        assert!(receipt.warnings.is_empty());
    }

    #[test]
    fn test_non_serialized_group_gets_anonymous_items() {
        let receipt = parse(&[UnitGroup::plain(TENT.0, TENT.1, TENT.2, "4")]);

        assert_eq!(receipt.groups.len(), 1);
        let group = &receipt.groups[0];
        assert!(!group.serialized());
        assert_eq!(group.quantity(), Some(4));
        assert_eq!(group.len(), 4);
        assert!(group.items().iter().all(|i| !i.has_serial_number()));
    }

    #[test]
    fn test_serials_span_rows() {
        let serials = ["W1", "W2", "W3", "W4", "W5"];
        let receipt = parse(&[
            UnitGroup::serialized(RIFLE.0, RIFLE.1, RIFLE.2, "5", &serials),
            UnitGroup::plain(TENT.0, TENT.1, TENT.2, "1"),
        ]);

        assert_eq!(receipt.groups.len(), 2);
        let rifles = receipt.group(RIFLE.1, RIFLE.0).unwrap();
        assert!(rifles.serialized());
        let found: Vec<_> = rifles.items().iter().filter_map(|i| i.serial_number()).collect();
        assert_eq!(found, serials);
        assert!(receipt.warnings.is_empty());
    }

    #[test]
    fn test_quantity_mismatch_is_a_warning() {
        let receipt = parse(&[UnitGroup::serialized(RIFLE.0, RIFLE.1, RIFLE.2, "3", &["W1", "W2"])]);

        assert_eq!(receipt.groups[0].len(), 2);
        assert_eq!(receipt.groups[0].quantity(), Some(3));
        assert_eq!(
            WarningSummary::count_of(&receipt.warnings, WarningKind::QuantityMismatch),
            1
        );
        assert_eq!(receipt.warnings[0].location, Some(CellRef::new(7, 9)));
    }

    #[test]
    fn test_serial_scan_stops_at_quantity() {
        // Quantity 2 reached after the first row; the third serial on that row is still taken
        let receipt = parse(&[UnitGroup::serialized(
            RIFLE.0,
            RIFLE.1,
            RIFLE.2,
            "2",
            &["W1", "W2", "W3", "W4"],
        )]);

        assert_eq!(receipt.groups[0].len(), 3);
        assert_eq!(receipt.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_header_is_combined() {
        let receipt = parse(&[
            UnitGroup::serialized(RIFLE.0, RIFLE.1, RIFLE.2, "2", &["W1", "W2"]),
            UnitGroup::plain(TENT.0, TENT.1, TENT.2, "1"),
            UnitGroup::serialized(RIFLE.0, RIFLE.1, RIFLE.2, "2", &["W2", "W3"]),
        ]);

        assert_eq!(receipt.groups.len(), 2);
        assert_eq!(receipt.group(RIFLE.1, RIFLE.0).unwrap().len(), 3);
        assert_eq!(
            WarningSummary::count_of(&receipt.warnings, WarningKind::DuplicateGroupHeader),
            1
        );
    }

    #[test]
    fn test_duplicate_header_with_other_quantity_says_so() {
        let receipt = parse(&[
            UnitGroup::plain(TENT.0, TENT.1, TENT.2, "2"),
            UnitGroup::plain(TENT.0, TENT.1, TENT.2, "3"),
        ]);

        let tents = receipt.group(TENT.1, TENT.0).unwrap();
        assert_eq!(tents.len(), 3);
        assert_eq!(tents.quantity(), Some(2));
        assert_eq!(receipt.warnings.len(), 1);
        assert_eq!(receipt.warnings[0].kind, WarningKind::DuplicateGroupHeader);
        assert!(receipt.warnings[0].message.contains("quantity 3 (first listed with 2)"));
    }

    #[test]
    fn test_header_followed_by_header_is_serialized_and_empty() {
        // No spacer row: the next header sits directly below
        let sheet = unit_header_sheet()
            .with_cell(7, 0, RIFLE.0)
            .with_cell(7, 2, RIFLE.1)
            .with_cell(7, 4, RIFLE.2)
            .with_cell(7, 9, "2")
            .with_cell(8, 0, TENT.0)
            .with_cell(8, 2, TENT.1)
            .with_cell(8, 4, TENT.2)
            .with_cell(8, 9, "1");
        let receipt = UnitReceiptParser::new()
            .parse(&Workbook::new("hr").with_sheet(sheet))
            .unwrap();

        let rifles = receipt.group(RIFLE.1, RIFLE.0).unwrap();
        assert!(rifles.serialized());
        assert!(rifles.is_empty());
        assert_eq!(receipt.group(TENT.1, TENT.0).unwrap().len(), 1);
    }

    #[test]
    fn test_header_shape_is_strict() {
        let sheet = write_unit_groups(
            unit_header_sheet(),
            &[
                UnitGroup::plain("R9503", RIFLE.1, RIFLE.2, "1"),
                UnitGroup::plain(TENT.0, "834001234567", TENT.2, "1"),
                UnitGroup::plain("A10000", "5110012345678", " ", "1"),
            ],
        );
        let receipt = UnitReceiptParser::new()
            .parse(&Workbook::new("hr").with_sheet(sheet))
            .unwrap();
        assert!(receipt.groups.is_empty());
    }

    #[test]
    fn test_bad_date_defaults_to_today() {
        let sheet = write_unit_groups(unit_header_sheet(), &[]).with_cell(0, 0, "DATE PREPARED: 9-9-13");
        let receipt = UnitReceiptParser::new()
            .parse(&Workbook::new("hr").with_sheet(sheet))
            .unwrap();

        assert_eq!(receipt.date_prepared, Local::now().date_naive());
        assert_eq!(receipt.warnings.len(), 1);
        assert_eq!(receipt.warnings[0].kind, WarningKind::UnparsableDate);
    }

    #[test]
    fn test_bad_quantity_is_a_format_error() {
        let workbook = unit_workbook(&[UnitGroup::plain(TENT.0, TENT.1, TENT.2, "EA")]);
        let err = UnitReceiptParser::new().parse(&workbook).unwrap_err();
        assert_eq!(err.field(), Some("quantity"));
    }

    #[test]
    fn test_missing_operator_is_a_format_error() {
        let sheet = Sheet::new("hr")
            .with_cell(0, 0, "DATE PREPARED: 09/09/13")
            .with_cell(3, 0, "UIC/DESC: WTN6A0/1ST BN, 19TH SFG, CO A")
            .with_cell(3, 5, "TO: 911/MITCHELL, JAMES/CPT");
        let err = UnitReceiptParser::new()
            .parse(&Workbook::new("hr").with_sheet(sheet))
            .unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err.field(), Some("FROM"));
    }

    #[test]
    fn test_numeric_serials_read_as_text() {
        let sheet = unit_header_sheet()
            .with_cell(7, 0, RIFLE.0)
            .with_cell(7, 2, RIFLE.1)
            .with_cell(7, 4, RIFLE.2)
            .with_value(7, 9, CellValue::Number(2.0))
            .with_value(8, 0, CellValue::Number(1001.0))
            .with_value(8, 4, CellValue::Number(1002.0));
        let receipt = UnitReceiptParser::new()
            .parse(&Workbook::new("hr").with_sheet(sheet))
            .unwrap();

        let rifles = &receipt.groups[0];
        assert!(rifles.item_by_serial("1001").is_some());
        assert!(rifles.item_by_serial("1002").is_some());
    }

    #[test]
    fn test_layout_probe() {
        let parser = UnitReceiptParser::new();
        assert!(parser.can_parse(&unit_workbook(&[])));
        assert!(!parser.can_parse(&Workbook::new("empty")));
    }
}
