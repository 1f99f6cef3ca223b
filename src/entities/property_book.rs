// 📒 PropertyBook - the reconciled master inventory for one team
//
// Built by the ReconciliationEngine. Metadata always comes from the unit
// receipt; groups are the union of both receipts keyed by GroupKey.

use crate::entities::{EndItemGroup, GroupKey, Operator, OrderBy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBook {
    /// Who signs the equipment over
    pub signee: Operator,
    /// Who signs for the equipment
    pub signer: Operator,
    pub date_prepared: NaiveDate,
    pub uic: String,
    pub desc: String,
    pub team: String,
    pub groups: Vec<EndItemGroup>,
}

impl PropertyBook {
    pub fn new(
        signee: Operator,
        signer: Operator,
        date_prepared: NaiveDate,
        uic: impl Into<String>,
        desc: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        PropertyBook {
            signee,
            signer,
            date_prepared,
            uic: uic.into(),
            desc: desc.into(),
            team: team.into(),
            groups: Vec::new(),
        }
    }

    /// First group with this NSN and LIN, serialized or not
    pub fn group(&self, nsn: &str, lin: &str) -> Option<&EndItemGroup> {
        self.groups.iter().find(|g| g.matches(nsn, lin))
    }

    pub fn has_group(&self, nsn: &str, lin: &str) -> bool {
        self.group(nsn, lin).is_some()
    }

    pub fn group_by_key(&self, key: &GroupKey) -> Option<&EndItemGroup> {
        self.groups.iter().find(|g| g.has_key(key))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of end items across all groups
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(EndItemGroup::len).sum()
    }

    /// Sort groups, and the items inside each group, by the given order
    pub fn sort_groups(&mut self, order: OrderBy) {
        self.groups.sort_by(|a, b| order.compare_groups(a, b));
        for group in &mut self.groups {
            group.sort_by(order);
        }
    }
}
