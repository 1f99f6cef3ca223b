// 🗂️ EndItemGroup - all end items of one type (LIN + NSN) on a receipt
//
// Identity is (LIN, NSN, serialized). The name is NOT part of identity: a
// group first seen with a blank name must still merge with the same group
// found later under its proper name.

use crate::entities::{EndItem, Mos};
use crate::error::{ReceiptError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// GROUP KEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub lin: String,
    pub nsn: String,
    pub serialized: bool,
}

impl GroupKey {
    pub fn new(lin: impl Into<String>, nsn: impl Into<String>, serialized: bool) -> Self {
        GroupKey {
            lin: lin.into(),
            nsn: nsn.into(),
            serialized,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIN:{} NSN:{}", self.lin, self.nsn)?;
        if self.serialized {
            write!(f, " (serialized)")?;
        }
        Ok(())
    }
}

// ============================================================================
// ORDERING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    Name,
    Lin,
    Nsn,
    SerialNumber,
}

impl OrderBy {
    pub fn name(&self) -> &str {
        match self {
            OrderBy::Name => "Name",
            OrderBy::Lin => "LIN",
            OrderBy::Nsn => "NSN",
            OrderBy::SerialNumber => "Serial Number",
        }
    }

    pub fn compare_items(&self, a: &EndItem, b: &EndItem) -> Ordering {
        match self {
            OrderBy::Name => a.name().cmp(b.name()),
            OrderBy::Lin => a.lin().cmp(b.lin()),
            OrderBy::Nsn => a.nsn().cmp(b.nsn()),
            OrderBy::SerialNumber => a.serial_number().cmp(&b.serial_number()),
        }
    }

    /// Groups have no serial number; that ordering falls back to LIN
    pub fn compare_groups(&self, a: &EndItemGroup, b: &EndItemGroup) -> Ordering {
        match self {
            OrderBy::Name => a.name().cmp(b.name()),
            OrderBy::Nsn => a.nsn().cmp(b.nsn()),
            OrderBy::Lin | OrderBy::SerialNumber => a.lin().cmp(b.lin()),
        }
    }
}

// ============================================================================
// END ITEM GROUP
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndItemGroup {
    name: String,
    lin: String,
    nsn: String,
    /// Whether individual units are told apart by serial number
    serialized: bool,
    /// Quantity declared on the receipt, when the receipt declares one
    quantity: Option<u32>,
    mos: Option<Mos>,
    items: Vec<EndItem>,
}

impl EndItemGroup {
    pub fn new(
        name: impl Into<String>,
        lin: impl Into<String>,
        nsn: impl Into<String>,
        serialized: bool,
    ) -> Result<Self> {
        let lin = lin.into().trim().to_string();
        let nsn = nsn.into().trim().to_string();
        if lin.is_empty() || nsn.is_empty() {
            return Err(ReceiptError::invalid_argument(format!(
                "EndItemGroup: blank LIN/NSN (LIN: {:?}, NSN: {:?})",
                lin, nsn
            )));
        }

        Ok(EndItemGroup {
            name: name.into().trim().to_string(),
            lin,
            nsn,
            serialized,
            quantity: None,
            mos: None,
            items: Vec::new(),
        })
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

    pub fn serialized(&self) -> bool {
        self.serialized
    }

    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }

    pub fn mos(&self) -> Option<Mos> {
        self.mos
    }

    pub fn items(&self) -> &[EndItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.lin.clone(), self.nsn.clone(), self.serialized)
    }

    pub fn has_key(&self, key: &GroupKey) -> bool {
        self.lin == key.lin && self.nsn == key.nsn && self.serialized == key.serialized
    }

    /// Same type of end item, whatever the serialized flag
    pub fn matches(&self, nsn: &str, lin: &str) -> bool {
        self.nsn == nsn && self.lin == lin
    }

    pub fn item_by_serial(&self, serial: &str) -> Option<&EndItem> {
        self.items
            .iter()
            .find(|item| item.serial_number() == Some(serial))
    }

    // ========================================================================
    // SETTERS
    // ========================================================================

    /// Rename the group and every item in it. Blank names are ignored.
    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.name = name.to_string();
        for item in &mut self.items {
            item.set_name(name);
        }
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = Some(quantity);
    }

    /// Assign an MOS to the group and every item in it
    pub fn set_mos(&mut self, mos: Mos) {
        self.mos = Some(mos);
        for item in &mut self.items {
            item.set_mos(mos);
        }
    }

    /// Add an item of this group's type.
    ///
    /// In a serialized group an item whose serial number is already present
    /// is combined into the existing member instead of being inserted.
    /// Non-serialized groups append without deduplication.
    pub fn add(&mut self, item: EndItem) -> Result<()> {
        if item.lin() != self.lin || item.nsn() != self.nsn {
            return Err(ReceiptError::invalid_argument(format!(
                "Illegal {} added to {}",
                item, self
            )));
        }

        if self.serialized {
            if let Some(serial) = item.serial_number() {
                if let Some(existing) = self
                    .items
                    .iter_mut()
                    .find(|member| member.serial_number() == Some(serial))
                {
                    return existing.combine(&item);
                }
            }
        }

        self.items.push(item);
        Ok(())
    }

    /// Merge another record of the same group into this one.
    ///
    /// Blank name, quantity and MOS are filled from `other`. Items with a
    /// serial number are matched by serial and combined (or appended when
    /// new). Serial-less items are paired by position with this group's
    /// serial-less items and combined; any surplus is appended. Combining a
    /// group with a copy of itself leaves it unchanged.
    pub fn combine(&mut self, other: &EndItemGroup) -> Result<()> {
        if !self.has_key(&other.key()) {
            return Err(ReceiptError::invalid_argument(format!(
                "Cannot combine {} with {}",
                self.key(),
                other.key()
            )));
        }

        if self.name.is_empty() {
            self.name.clone_from(&other.name);
        }
        if self.quantity.is_none() {
            self.quantity = other.quantity;
        }
        if self.mos.is_none() {
            self.mos = other.mos;
        }

        let anonymous: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.has_serial_number())
            .map(|(index, _)| index)
            .collect();
        let mut next_anonymous = anonymous.into_iter();

        for item in &other.items {
            match item.serial_number() {
                Some(serial) => {
                    match self
                        .items
                        .iter_mut()
                        .find(|member| member.serial_number() == Some(serial))
                    {
                        Some(existing) => existing.combine(item)?,
                        None => self.items.push(item.clone()),
                    }
                }
                None => match next_anonymous.next() {
                    Some(index) => self.items[index].combine(item)?,
                    None => self.items.push(item.clone()),
                },
            }
        }

        Ok(())
    }

    pub fn sort_by(&mut self, order: OrderBy) {
        self.items.sort_by(|a, b| order.compare_items(a, b));
    }
}

impl PartialEq for EndItemGroup {
    fn eq(&self, other: &Self) -> bool {
        self.lin == other.lin && self.nsn == other.nsn && self.serialized == other.serialized
    }
}

impl Eq for EndItemGroup {}

impl Hash for EndItemGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lin.hash(state);
        self.nsn.hash(state);
        self.serialized.hash(state);
    }
}

impl fmt::Display for EndItemGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EndItemGroup {} NSN:{} LIN:{}", self.name, self.nsn, self.lin)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AccountableComponent;

    const LIN: &str = "Q32356";
    const NSN: &str = "5820014923633";

    fn item(serial: Option<&str>) -> EndItem {
        let item = EndItem::new("RADIO SET", LIN, NSN).unwrap();
        match serial {
            Some(sn) => item.with_serial_number(sn),
            None => item,
        }
    }

    fn serialized_group(serials: &[&str]) -> EndItemGroup {
        let mut group = EndItemGroup::new("RADIO SET", LIN, NSN, true).unwrap();
        for sn in serials {
            group.add(item(Some(sn))).unwrap();
        }
        group
    }

    #[test]
    fn test_duplicate_serial_combines_instead_of_inserting() {
        let mut group = serialized_group(&["A1", "A2"]);

        let mut duplicate = item(Some("A2"));
        duplicate.set_location("ARMS ROOM");
        group.add(duplicate).unwrap();

        assert_eq!(group.len(), 2);
        assert_eq!(group.item_by_serial("A2").unwrap().location(), Some("ARMS ROOM"));
    }

    #[test]
    fn test_unserialized_group_appends() {
        let mut group = EndItemGroup::new("TENT", "T12345", "8340012345678", false).unwrap();
        let tent = EndItem::new("TENT", "T12345", "8340012345678").unwrap();
        group.add(tent.clone()).unwrap();
        group.add(tent).unwrap();
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_add_rejects_foreign_item() {
        let mut group = serialized_group(&[]);
        let rifle = EndItem::new("RIFLE", "R95035", "1005011231234").unwrap();
        assert!(group.add(rifle).is_err());
        assert!(group.is_empty());
    }

    #[test]
    fn test_identity_ignores_name() {
        let blank = EndItemGroup::new("", LIN, NSN, true).unwrap();
        let named = EndItemGroup::new("RADIO SET", LIN, NSN, true).unwrap();
        let unserialized = EndItemGroup::new("RADIO SET", LIN, NSN, false).unwrap();

        assert_eq!(blank, named);
        assert_ne!(named, unserialized);
        assert_eq!(blank.key(), GroupKey::new(LIN, NSN, true));
    }

    #[test]
    fn test_combine_fills_name_and_quantity() {
        let mut from_component = EndItemGroup::new("", LIN, NSN, true).unwrap();
        let mut from_unit = serialized_group(&["A1"]);
        from_unit.set_quantity(1);

        from_component.combine(&from_unit).unwrap();

        assert_eq!(from_component.name(), "RADIO SET");
        assert_eq!(from_component.quantity(), Some(1));
        assert_eq!(from_component.len(), 1);
    }

    #[test]
    fn test_combine_merges_serials() {
        let mut a = serialized_group(&["A1", "A2"]);
        let b = serialized_group(&["A2", "A3"]);
        a.combine(&b).unwrap();

        let serials: Vec<_> = a.items().iter().filter_map(|i| i.serial_number()).collect();
        assert_eq!(serials, vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn test_combine_pairs_anonymous_items() {
        let mut with_components = EndItemGroup::new("TENT", "T12345", "8340012345678", false).unwrap();
        let mut tent = EndItem::new("TENT", "T12345", "8340012345678").unwrap();
        tent.set_coei(vec![AccountableComponent::new("POLE", "8340000000001", 4)]);
        with_components.add(tent).unwrap();

        let mut from_unit = EndItemGroup::new("TENT", "T12345", "8340012345678", false).unwrap();
        for _ in 0..3 {
            from_unit
                .add(EndItem::new("TENT", "T12345", "8340012345678").unwrap())
                .unwrap();
        }

        with_components.combine(&from_unit).unwrap();

        assert_eq!(with_components.len(), 3);
        assert_eq!(with_components.items()[0].coei().len(), 1);
        assert!(with_components.items()[1].coei().is_empty());
    }

    #[test]
    fn test_combine_with_self_is_idempotent() {
        let mut group = serialized_group(&["A1", "A2"]);
        group.set_quantity(2);
        let snapshot = serde_json::to_value(&group).unwrap();

        let copy = group.clone();
        group.combine(&copy).unwrap();
        assert_eq!(serde_json::to_value(&group).unwrap(), snapshot);
    }

    #[test]
    fn test_combine_rejects_other_key() {
        let mut a = serialized_group(&[]);
        let b = EndItemGroup::new("RADIO SET", LIN, NSN, false).unwrap();
        assert!(a.combine(&b).is_err());
    }

    #[test]
    fn test_set_mos_reaches_items() {
        let mut group = serialized_group(&["A1", "A2"]);
        group.set_mos(Mos::Echo);
        assert!(group.items().iter().all(|i| i.mos() == Some(Mos::Echo)));
    }

    #[test]
    fn test_set_name_reaches_items() {
        let mut group = serialized_group(&["A1", "A2"]);
        group.set_name(" RADIO SET, AN/PRC-152 ");
        assert_eq!(group.name(), "RADIO SET, AN/PRC-152");
        assert!(group.items().iter().all(|i| i.name() == "RADIO SET, AN/PRC-152"));

        group.set_name("  ");
        assert_eq!(group.name(), "RADIO SET, AN/PRC-152");
    }

    #[test]
    fn test_sort_by_serial() {
        let mut group = serialized_group(&["C3", "A1", "B2"]);
        group.sort_by(OrderBy::SerialNumber);
        let serials: Vec<_> = group.items().iter().filter_map(|i| i.serial_number()).collect();
        assert_eq!(serials, vec!["A1", "B2", "C3"]);
    }
}
