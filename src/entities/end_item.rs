// 📦 EndItem - one physical piece of equipment
//
// Identity: (LIN, NSN, serial number). Two serial-less items with the same
// LIN/NSN compare equal but are still separate records inside a group.
//
// Values: everything else. combine() only ever fills a blank value from the
// other record, never overwrites a known one.

use crate::entities::Mos;
use crate::error::{ReceiptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// ACCOUNTABLE COMPONENT (COEI / BII entry)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountableComponent {
    pub name: String,
    pub nsn: String,
    /// Quantity the end item is authorized to carry
    pub authorized_qty: u32,
    /// Quantity found on hand at inventory time (starts at 0)
    pub on_hand_qty: u32,
}

impl AccountableComponent {
    pub fn new(name: impl Into<String>, nsn: impl Into<String>, authorized_qty: u32) -> Self {
        AccountableComponent {
            name: name.into(),
            nsn: nsn.into(),
            authorized_qty,
            on_hand_qty: 0,
        }
    }

    pub fn set_on_hand_qty(&mut self, qty: u32) {
        self.on_hand_qty = qty;
    }
}

impl fmt::Display for AccountableComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} NSN: {} Qty: {}", self.name, self.nsn, self.authorized_qty)
    }
}

// ============================================================================
// END ITEM
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndItem {
    name: String,
    lin: String,
    nsn: String,

    serial_number: Option<String>,
    mos: Option<Mos>,
    location: Option<String>,
    publication_number: Option<String>,
    publication_date: Option<String>,
    cl_number: Option<String>,

    /// Components Of End Item
    coei: Vec<AccountableComponent>,
    /// Basic Issue Items
    bii: Vec<AccountableComponent>,
}

/// Blank text is stored as "unset"
fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, other: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(other);
    }
}

impl EndItem {
    /// Create a bare end item. LIN and NSN are required; the name may be
    /// blank (component receipts sometimes omit it).
    pub fn new(name: impl Into<String>, lin: impl Into<String>, nsn: impl Into<String>) -> Result<Self> {
        let lin = non_blank(lin)
            .ok_or_else(|| ReceiptError::invalid_argument("EndItem: blank LIN not allowed"))?;
        let nsn = non_blank(nsn)
            .ok_or_else(|| ReceiptError::invalid_argument("EndItem: blank NSN not allowed"))?;

        Ok(EndItem {
            name: name.into().trim().to_string(),
            lin,
            nsn,
            serial_number: None,
            mos: None,
            location: None,
            publication_number: None,
            publication_date: None,
            cl_number: None,
            coei: Vec::new(),
            bii: Vec::new(),
        })
    }

    /// Builder pattern: add a serial number
    pub fn with_serial_number(mut self, serial: impl Into<String>) -> Self {
        self.set_serial_number(serial);
        self
    }

    // ========================================================================
    // GETTERS
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lin(&self) -> &str {
        &self.lin
    }

    pub fn nsn(&self) -> &str {
        &self.nsn
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn has_serial_number(&self) -> bool {
        self.serial_number.is_some()
    }

    pub fn mos(&self) -> Option<Mos> {
        self.mos
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn publication_number(&self) -> Option<&str> {
        self.publication_number.as_deref()
    }

    pub fn publication_date(&self) -> Option<&str> {
        self.publication_date.as_deref()
    }

    pub fn cl_number(&self) -> Option<&str> {
        self.cl_number.as_deref()
    }

    pub fn coei(&self) -> &[AccountableComponent] {
        &self.coei
    }

    pub fn bii(&self) -> &[AccountableComponent] {
        &self.bii
    }

    pub fn coei_mut(&mut self) -> &mut Vec<AccountableComponent> {
        &mut self.coei
    }

    pub fn bii_mut(&mut self) -> &mut Vec<AccountableComponent> {
        &mut self.bii
    }

    /// (LIN, NSN, serial number)
    pub fn identity(&self) -> (&str, &str, Option<&str>) {
        (&self.lin, &self.nsn, self.serial_number())
    }

    // ========================================================================
    // SETTERS
    // ========================================================================

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    pub fn set_serial_number(&mut self, serial: impl Into<String>) {
        self.serial_number = non_blank(serial);
    }

    pub fn set_mos(&mut self, mos: Mos) {
        self.mos = Some(mos);
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = non_blank(location);
    }

    pub fn set_publication_number(&mut self, number: impl Into<String>) {
        self.publication_number = non_blank(number);
    }

    pub fn set_publication_date(&mut self, date: impl Into<String>) {
        self.publication_date = non_blank(date);
    }

    pub fn set_cl_number(&mut self, cl_number: impl Into<String>) {
        self.cl_number = non_blank(cl_number);
    }

    pub fn set_coei(&mut self, components: Vec<AccountableComponent>) {
        self.coei = components;
    }

    pub fn set_bii(&mut self, components: Vec<AccountableComponent>) {
        self.bii = components;
    }

    // ========================================================================
    // MERGE
    // ========================================================================

    /// Fill this item's blank fields from `other`.
    ///
    /// Known values are never overwritten; a component list is adopted
    /// wholesale only when this item's list is empty. Fails if the two items
    /// do not describe the same LIN/NSN, or carry different serial numbers.
    pub fn combine(&mut self, other: &EndItem) -> Result<()> {
        if self.lin != other.lin || self.nsn != other.nsn {
            return Err(ReceiptError::invalid_argument(format!(
                "Cannot combine {} with {}",
                self, other
            )));
        }
        if let (Some(mine), Some(theirs)) = (&self.serial_number, &other.serial_number) {
            if mine != theirs {
                return Err(ReceiptError::invalid_argument(format!(
                    "Cannot combine serial numbers {} and {}",
                    mine, theirs
                )));
            }
        }

        if self.name.is_empty() {
            self.name.clone_from(&other.name);
        }
        fill(&mut self.serial_number, &other.serial_number);
        fill(&mut self.mos, &other.mos);
        fill(&mut self.location, &other.location);
        fill(&mut self.publication_number, &other.publication_number);
        fill(&mut self.publication_date, &other.publication_date);
        fill(&mut self.cl_number, &other.cl_number);

        if self.coei.is_empty() {
            self.coei.clone_from(&other.coei);
        }
        if self.bii.is_empty() {
            self.bii.clone_from(&other.bii);
        }

        Ok(())
    }
}

impl PartialEq for EndItem {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for EndItem {}

impl Hash for EndItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for EndItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EndItem {} NSN:{} LIN:{}", self.name, self.nsn, self.lin)?;
        if let Some(sn) = &self.serial_number {
            write!(f, " SN:{}", sn)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
