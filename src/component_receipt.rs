// 🧩 Component Hand Receipt Parser
//
// Every sheet is exactly one end item. Identity fields sit in fixed,
// label-prefixed cells; the COEI and BII lists hang below literal section
// labels somewhere at or beneath the anchor cell.

use crate::consistency::{ConsistencyWarning, WarningKind};
use crate::entities::{AccountableComponent, EndItem, EndItemGroup};
use crate::error::{ReceiptError, Result};
use crate::grid::{CellRef, CellValue, Sheet, Workbook};
use crate::parser::{
    compact, in_field, optional_text, parse_operator, parse_uic_desc, required_text, strip_label,
    DocumentKind, LayoutProbe, ReceiptHeader, ReceiptParser,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const COEI_LABEL: &str = "COMPONENTS OF END ITEM (COEI)";
pub const BII_LABEL: &str = "BASIC ISSUE ITEMS (BII)";

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReceiptLayout {
    pub uic_desc_cell: CellRef,
    pub from_cell: CellRef,
    pub to_cell: CellRef,
    pub nsn_cell: CellRef,
    pub lin_cell: CellRef,
    pub serial_cell: CellRef,
    pub name_cell: CellRef,
    pub pub_num_cell: CellRef,
    pub pub_date_cell: CellRef,
    /// First cell that may hold a section label; the label column is its column
    pub anchor_cell: CellRef,
    /// Sub-list columns: name is the label column, these are absolute
    pub component_nsn_col: u32,
    pub component_qty_col: u32,
}

impl Default for ComponentReceiptLayout {
    fn default() -> Self {
        ComponentReceiptLayout {
            uic_desc_cell: CellRef::new(2, 0),
            from_cell: CellRef::new(3, 0),
            to_cell: CellRef::new(3, 6),
            nsn_cell: CellRef::new(5, 0),
            lin_cell: CellRef::new(6, 0),
            serial_cell: CellRef::new(7, 0),
            name_cell: CellRef::new(5, 2),
            pub_num_cell: CellRef::new(6, 2),
            pub_date_cell: CellRef::new(6, 6),
            anchor_cell: CellRef::new(13, 2),
            component_nsn_col: 0,
            component_qty_col: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Coei,
    Bii,
}

impl Section {
    fn from_label(text: &str) -> Option<Self> {
        match text.trim() {
            COEI_LABEL => Some(Section::Coei),
            BII_LABEL => Some(Section::Bii),
            _ => None,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHandReceipt {
    pub header: ReceiptHeader,
    pub groups: Vec<EndItemGroup>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl ComponentHandReceipt {
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
pub struct ComponentReceiptParser {
    layout: ComponentReceiptLayout,
}

impl ComponentReceiptParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: ComponentReceiptLayout) -> Self {
        ComponentReceiptParser { layout }
    }

    pub fn layout(&self) -> &ComponentReceiptLayout {
        &self.layout
    }

    fn read_header(&self, sheet: &Sheet) -> Result<ReceiptHeader> {
        let kind = self.kind();

        let uic_desc = required_text(sheet, self.layout.uic_desc_cell, kind, "UIC/DESC")?;
        let (uic, desc) = parse_uic_desc(&uic_desc).map_err(in_field(kind, "UIC/DESC"))?;

        let from_text = required_text(sheet, self.layout.from_cell, kind, "FROM")?;
        let from = parse_operator(&from_text, "FROM:").map_err(in_field(kind, "FROM"))?;

        let to_text = required_text(sheet, self.layout.to_cell, kind, "TO")?;
        let to = parse_operator(&to_text, "TO:").map_err(in_field(kind, "TO"))?;

        Ok(ReceiptHeader {
            uic,
            desc,
            from: from.operator,
            to: to.operator,
        })
    }

    fn labeled(&self, sheet: &Sheet, at: CellRef, field: &str, label: &str) -> Result<String> {
        let text = required_text(sheet, at, self.kind(), field)?;
        Ok(strip_label(&text, label))
    }

    /// One sheet → one end item
    fn read_item(&self, sheet: &Sheet, warnings: &mut Vec<ConsistencyWarning>) -> Result<EndItem> {
        let kind = self.kind();
        let layout = &self.layout;

        let nsn = compact(&self.labeled(sheet, layout.nsn_cell, "NSN", "END ITEM NSN:")?);
        let lin = compact(&self.labeled(sheet, layout.lin_cell, "LIN", "LIN:")?);
        let serial = compact(&self.labeled(sheet, layout.serial_cell, "SERIAL NO", "SERIAL NO:")?);
        let name = self.labeled(sheet, layout.name_cell, "ITEM DESC", "ITEM DESC:")?;
        let pub_num = self.labeled(sheet, layout.pub_num_cell, "PUB NUM", "PUB NUM:")?;
        let pub_date = self.labeled(sheet, layout.pub_date_cell, "PUB DATE", "PUB DATE:")?;

        let mut item = EndItem::new(name, lin, nsn).map_err(in_field(kind, "LIN/NSN"))?;
        item.set_serial_number(serial);
        item.set_publication_number(pub_num);
        item.set_publication_date(pub_date);

        let mut found_section = false;
        for (section, components) in self.read_sections(sheet, warnings) {
            found_section = true;
            match section {
                Section::Coei => item.coei_mut().extend(components),
                Section::Bii => item.bii_mut().extend(components),
            }
        }

        if !found_section {
            warnings.push(ConsistencyWarning::at(
                WarningKind::MissingSection,
                sheet.name.as_str(),
                Some(layout.anchor_cell),
                format!("{} has no COEI or BII list", item),
            ));
        }

        Ok(item)
    }

    /// Every section label in the label column from the anchor row down
    fn read_sections(
        &self,
        sheet: &Sheet,
        warnings: &mut Vec<ConsistencyWarning>,
    ) -> Vec<(Section, Vec<AccountableComponent>)> {
        let anchor = self.layout.anchor_cell;
        let Some(last_row) = sheet.last_row() else {
            return Vec::new();
        };

        let mut sections = Vec::new();
        for row in anchor.row..=last_row {
            let label = sheet.string(CellRef::new(row, anchor.col));
            if let Some(section) = label.and_then(Section::from_label) {
                let components = self.read_components(sheet, row + 1, warnings);
                debug!(sheet = %sheet.name, ?section, count = components.len(), "read component list");
                sections.push((section, components));
            }
        }
        sections
    }

    /// Walk down from `start` until the name cell is blank or holds the next
    /// section label
    fn read_components(
        &self,
        sheet: &Sheet,
        start: u32,
        warnings: &mut Vec<ConsistencyWarning>,
    ) -> Vec<AccountableComponent> {
        let name_col = self.layout.anchor_cell.col;
        let mut components = Vec::new();
        let mut row = start;

        while let Some(name) = optional_text(sheet, CellRef::new(row, name_col)) {
            if Section::from_label(&name).is_some() {
                break;
            }
            let nsn = optional_text(sheet, CellRef::new(row, self.layout.component_nsn_col))
                .map(|text| compact(&text))
                .unwrap_or_default();

            let qty_at = CellRef::new(row, self.layout.component_qty_col);
            let qty_cell = sheet.cell(qty_at);
            let authorized_qty = match qty_cell
                .and_then(CellValue::as_integer)
                .and_then(|qty| u32::try_from(qty).ok())
            {
                Some(qty) => qty,
                None => {
                    warnings.push(ConsistencyWarning::at(
                        WarningKind::UnparsableQuantity,
                        sheet.name.as_str(),
                        Some(qty_at),
                        format!(
                            "unable to read quantity {:?} for component {}, using 0",
                            qty_cell.map(|v| v.to_string()).unwrap_or_default(),
                            name
                        ),
                    ));
                    0
                }
            };

            components.push(AccountableComponent::new(name, nsn, authorized_qty));
            row += 1;
        }

        components
    }
}

/// Add to the group with the same NSN/LIN, creating it on first sight.
/// A new group is serialized when its first item carries a serial number.
fn add_item(groups: &mut Vec<EndItemGroup>, item: EndItem) -> Result<()> {
    if let Some(group) = groups.iter_mut().find(|g| g.matches(item.nsn(), item.lin())) {
        return group.add(item);
    }

    let mut group = EndItemGroup::new(item.name(), item.lin(), item.nsn(), item.has_serial_number())?;
    group.add(item)?;
    groups.push(group);
    Ok(())
}

impl ReceiptParser for ComponentReceiptParser {
    type Output = ComponentHandReceipt;

    fn parse(&self, workbook: &Workbook) -> Result<ComponentHandReceipt> {
        let kind = self.kind();
        let first = workbook.sheet(0).ok_or_else(|| {
            ReceiptError::format(kind.name(), "sheet", format!("{} has no sheets", workbook.name))
        })?;
        let header = self.read_header(first)?;

        let mut groups = Vec::new();
        let mut warnings = Vec::new();
        for sheet in &workbook.sheets {
            let item = self.read_item(sheet, &mut warnings)?;
            debug!(sheet = %sheet.name, item = %item, "read end item");
            add_item(&mut groups, item)?;
        }

        info!(
            document = %workbook.name,
            sheets = workbook.sheet_count(),
            groups = groups.len(),
            warnings = warnings.len(),
            "parsed component hand receipt"
        );

        Ok(ComponentHandReceipt {
            header,
            groups,
            warnings,
        })
    }

    fn kind(&self) -> DocumentKind {
        DocumentKind::ComponentHandReceipt
    }
}

impl LayoutProbe for ComponentReceiptParser {
    fn can_parse(&self, workbook: &Workbook) -> bool {
        workbook
            .sheet(0)
            .and_then(|sheet| sheet.string(self.layout.nsn_cell))
            .is_some_and(|text| text.contains("END ITEM NSN"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
