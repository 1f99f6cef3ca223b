// Synthetic receipts shaped like the reference documents:
// 49 unit groups (group 0 a serialized GPS with 12 serials) and a component
// receipt covering 29 of them, one sheet per physical item.

#![allow(dead_code)]

use property_book::{CellValue, Sheet, Workbook};
use std::path::Path;

pub const UNIT_GROUPS: usize = 49;
pub const COMPONENT_GROUPS: usize = 29;
pub const GPS_SERIALS: usize = 12;

const UIC_DESC: &str = "UIC/DESC: WTN6A0/1ST BN, 19TH SFG, CO A";

pub struct GroupFixture {
    pub lin: String,
    pub nsn: String,
    pub name: String,
    pub quantity: usize,
    /// Empty for non-serialized groups
    pub serials: Vec<String>,
}

pub fn group_fixtures() -> Vec<GroupFixture> {
    (0..UNIT_GROUPS)
        .map(|i| {
            let serialized = i == 0 || i % 5 == 0;
            let quantity = match i {
                0 => GPS_SERIALS,
                _ if serialized => 2,
                _ => 1 + i % 3,
            };
            let serials = if serialized {
                (1..=quantity).map(|n| format!("S{:02}{:03}", i, n)).collect()
            } else {
                Vec::new()
            };

            GroupFixture {
                lin: format!("L{:05}", i),
                nsn: format!("{}", 5_820_000_000_000u64 + i as u64),
                name: if i == 0 { "GPS RECEIVER".to_string() } else { format!("END ITEM {}", i) },
                quantity,
                serials,
            }
        })
        .collect()
}

pub fn unit_workbook() -> Workbook {
    let mut sheet = Sheet::new("UNIT HR")
        .with_cell(0, 0, "DATE PREPARED: 09/09/13")
        .with_cell(2, 5, "FROM: 911/TSCHETTER, JONATHAN/MAJ")
        .with_cell(3, 0, UIC_DESC)
        .with_cell(3, 5, "TO: 911/MITCHELL, JAMES/CPT")
        .with_cell(6, 0, "LIN")
        .with_cell(6, 2, "NSN")
        .with_cell(6, 4, "NOMENCLATURE")
        .with_cell(6, 9, "QTY");

    let mut row = 7;
    for fixture in group_fixtures() {
        sheet = sheet
            .with_cell(row, 0, fixture.lin.as_str())
            .with_cell(row, 2, fixture.nsn.as_str())
            .with_cell(row, 4, fixture.name.as_str())
            .with_value(row, 9, CellValue::Number(fixture.quantity as f64));
        row += 1;

        for chunk in fixture.serials.chunks(3) {
            for (serial, col) in chunk.iter().zip([0, 4, 5]) {
                sheet = sheet.with_cell(row, col, serial.as_str());
            }
            row += 1;
        }
        // Spacer holding only a description column
        sheet = sheet.with_cell(row, 4, "UI: EA");
        row += 1;
    }

    Workbook::new("9111_UNIT_HR").with_sheet(sheet)
}

fn component_sheet(index: usize, fixture: &GroupFixture, serial: &str) -> Sheet {
    Sheet::new(format!("{:03}", index))
        .with_cell(2, 0, UIC_DESC)
        .with_cell(3, 0, "FROM: TSCHETTER, JONATHAN/MAJ")
        .with_cell(3, 6, "TO: MITCHELL, JAMES/CPT")
        .with_cell(5, 0, format!("END ITEM NSN: {}", fixture.nsn))
        .with_cell(5, 2, format!("ITEM DESC: {}", fixture.name))
        .with_cell(6, 0, format!("LIN: {}", fixture.lin))
        .with_cell(6, 2, "PUB NUM: TM 9-1005-319-10")
        .with_cell(6, 6, "PUB DATE: 20080601")
        .with_cell(7, 0, format!("SERIAL NO: {}", serial))
        .with_cell(13, 2, "COMPONENTS OF END ITEM (COEI)")
        .with_cell(14, 0, "5965012345678")
        .with_cell(14, 2, "HANDSET")
        .with_cell(14, 7, "1")
        .with_cell(16, 2, "BASIC ISSUE ITEMS (BII)")
        .with_cell(17, 0, "6150000000001")
        .with_cell(17, 2, "CORD")
        .with_cell(17, 7, "2")
}

pub fn component_workbook() -> Workbook {
    let mut workbook = Workbook::new("ComponentHandReceipt");
    let mut index = 0;

    for fixture in group_fixtures().iter().take(COMPONENT_GROUPS) {
        if fixture.serials.is_empty() {
            for _ in 0..fixture.quantity {
                workbook.push_sheet(component_sheet(index, fixture, ""));
                index += 1;
            }
        } else {
            for serial in &fixture.serials {
                workbook.push_sheet(component_sheet(index, fixture, serial));
                index += 1;
            }
        }
    }
    workbook
}

/// Dump every sheet as `<sheet name>.csv` into `dir`
pub fn write_csv_dir(workbook: &Workbook, dir: &Path) {
    for sheet in &workbook.sheets {
        let rows = sheet.last_row().map(|r| r as usize + 1).unwrap_or(0);
        let cols = sheet.cells().map(|(at, _)| at.col as usize + 1).max().unwrap_or(0);

        let mut grid = vec![vec![String::new(); cols]; rows];
        for (at, value) in sheet.cells() {
            if let Some(row) = grid.get_mut(at.row as usize) {
                row[at.col as usize] = value.to_string();
            }
        }

        let mut writer = csv::Writer::from_path(dir.join(format!("{}.csv", sheet.name))).unwrap();
        for row in grid {
            writer.write_record(&row).unwrap();
        }
        writer.flush().unwrap();
    }
}
