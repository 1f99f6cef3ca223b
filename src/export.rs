// 📤 Property book CSV export - one row per end item

use crate::entities::PropertyBook;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct BookRow<'a> {
    uic: &'a str,
    team: &'a str,
    lin: &'a str,
    nsn: &'a str,
    name: &'a str,
    serialized: bool,
    serial_number: &'a str,
    quantity: Option<u32>,
    mos: Option<&'static str>,
    location: &'a str,
    publication_number: &'a str,
    publication_date: &'a str,
    coei: usize,
    bii: usize,
}

/// Write the book as CSV with a header row
pub fn write_book_csv<W: Write>(book: &PropertyBook, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for group in &book.groups {
        for item in group.items() {
            csv.serialize(BookRow {
                uic: &book.uic,
                team: &book.team,
                lin: group.lin(),
                nsn: group.nsn(),
                name: if item.name().is_empty() { group.name() } else { item.name() },
                serialized: group.serialized(),
                serial_number: item.serial_number().unwrap_or_default(),
                quantity: group.quantity(),
                mos: item.mos().or(group.mos()).map(|m| m.code()),
                location: item.location().unwrap_or_default(),
                publication_number: item.publication_number().unwrap_or_default(),
                publication_date: item.publication_date().unwrap_or_default(),
                coei: item.coei().len(),
                bii: item.bii().len(),
            })?;
        }
    }

    csv.flush()?;
    Ok(())
}

pub fn save_book_csv(book: &PropertyBook, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_book_csv(book, file)
}
