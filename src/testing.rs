// Synthetic hand receipts for unit tests, laid out on the known template

use crate::grid::{Sheet, Workbook};

pub(crate) const UIC_DESC: &str = "UIC/DESC: WTN6A0/1ST BN, 19TH SFG, CO A";

pub(crate) const RADIO_LIN: &str = "Q32356";
pub(crate) const RADIO_NSN: &str = "5820014923633";

/// One header block on a unit receipt; no serials means non-serialized
pub(crate) struct UnitGroup<'a> {
    pub lin: &'a str,
    pub nsn: &'a str,
    pub name: &'a str,
    pub qty: &'a str,
    pub serials: &'a [&'a str],
}

impl<'a> UnitGroup<'a> {
    pub fn plain(lin: &'a str, nsn: &'a str, name: &'a str, qty: &'a str) -> Self {
        UnitGroup {
            lin,
            nsn,
            name,
            qty,
            serials: &[],
        }
    }

    pub fn serialized(lin: &'a str, nsn: &'a str, name: &'a str, qty: &'a str, serials: &'a [&'a str]) -> Self {
        UnitGroup {
            lin,
            nsn,
            name,
            qty,
            serials,
        }
    }
}

/// Metadata rows only
pub(crate) fn unit_header_sheet() -> Sheet {
    Sheet::new("UNIT HR")
        .with_cell(0, 0, "DATE PREPARED: 09/09/13")
        .with_cell(2, 5, "FROM: 911/TSCHETTER, JONATHAN/MAJ")
        .with_cell(3, 0, UIC_DESC)
        .with_cell(3, 5, "TO: 911/MITCHELL, JAMES/CPT")
}

/// Header row, serial rows (three per row), then one blank spacer row
pub(crate) fn write_unit_groups(mut sheet: Sheet, groups: &[UnitGroup]) -> Sheet {
    let mut row = 7;
    for group in groups {
        sheet = sheet
            .with_cell(row, 0, group.lin)
            .with_cell(row, 2, group.nsn)
            .with_cell(row, 4, group.name)
            .with_cell(row, 9, group.qty);
        row += 1;

        for chunk in group.serials.chunks(3) {
            for (serial, col) in chunk.iter().zip([0, 4, 5]) {
                sheet = sheet.with_cell(row, col, *serial);
            }
            row += 1;
        }
        row += 1;
    }
    sheet
}

pub(crate) fn unit_workbook(groups: &[UnitGroup]) -> Workbook {
    Workbook::new("unit_hr").with_sheet(write_unit_groups(unit_header_sheet(), groups))
}

/// (nsn, name, authorized qty)
pub(crate) type ComponentRow<'a> = (&'a str, &'a str, &'a str);

pub(crate) fn component_sheet(
    name: &str,
    lin: &str,
    nsn: &str,
    serial: &str,
    coei: &[ComponentRow],
    bii: &[ComponentRow],
) -> Sheet {
    let mut sheet = Sheet::new(format!("{} {}", name, serial))
        .with_cell(2, 0, UIC_DESC)
        .with_cell(3, 0, "FROM: TSCHETTER, JONATHAN/MAJ")
        .with_cell(3, 6, "TO: MITCHELL, JAMES/CPT")
        .with_cell(5, 0, format!("END ITEM NSN: {}", nsn))
        .with_cell(5, 2, format!("ITEM DESC: {}", name))
        .with_cell(6, 0, format!("LIN: {}", lin))
        .with_cell(6, 2, "PUB NUM: TM 11-5820-890-10-8")
        .with_cell(6, 6, "PUB DATE: 20100301")
        .with_cell(7, 0, format!("SERIAL NO: {}", serial));

    let mut row = 13;
    for (label, list) in [
        ("COMPONENTS OF END ITEM (COEI)", coei),
        ("BASIC ISSUE ITEMS (BII)", bii),
    ] {
        if list.is_empty() {
            continue;
        }
        sheet = sheet.with_cell(row, 2, label);
        row += 1;
        for (nsn, name, qty) in list {
            sheet = sheet
                .with_cell(row, 0, *nsn)
                .with_cell(row, 2, *name)
                .with_cell(row, 7, *qty);
            row += 1;
        }
        row += 1;
    }
    sheet
}

/// Serialized radio with one COEI and one BII entry
pub(crate) fn radio_sheet(serial: &str) -> Sheet {
    component_sheet(
        "RADIO SET",
        RADIO_LIN,
        RADIO_NSN,
        serial,
        &[("5965012345678", "HANDSET", "1")],
        &[("6150000000001", "CORD", "2")],
    )
}

pub(crate) fn component_workbook(sheets: Vec<Sheet>) -> Workbook {
    let mut workbook = Workbook::new("component_hr");
    for sheet in sheets {
        workbook.push_sheet(sheet);
    }
    workbook
}
