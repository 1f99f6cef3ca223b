// 🪖 Operator & Rank - who signs a hand receipt over, and who signs for it
//
// Operators are plain values: equal when first name, last name and rank match.

use crate::error::{ReceiptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RANK
// ============================================================================

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    // Enlisted
    PVT,
    PV2,
    PFC,
    SPC,
    CPL,
    SGT,
    SSG,
    SFC,
    MSG,
    SM,
    CSM,
    SMA,
    // Officers
    LT,
    CPT,
    MAJ,
    LTC,
    COL,
    BG,
    MG,
    LTG,
    GEN,
    GOA,
    // Warrant officers
    WO1,
    CW2,
    CW3,
    CW4,
    CW5,
}

impl Rank {
    pub const ALL: [Rank; 27] = [
        Rank::PVT,
        Rank::PV2,
        Rank::PFC,
        Rank::SPC,
        Rank::CPL,
        Rank::SGT,
        Rank::SSG,
        Rank::SFC,
        Rank::MSG,
        Rank::SM,
        Rank::CSM,
        Rank::SMA,
        Rank::LT,
        Rank::CPT,
        Rank::MAJ,
        Rank::LTC,
        Rank::COL,
        Rank::BG,
        Rank::MG,
        Rank::LTG,
        Rank::GEN,
        Rank::GOA,
        Rank::WO1,
        Rank::CW2,
        Rank::CW3,
        Rank::CW4,
        Rank::CW5,
    ];

    /// Canonical short code, as printed on hand receipts
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::PVT => "PVT",
            Rank::PV2 => "PV2",
            Rank::PFC => "PFC",
            Rank::SPC => "SPC",
            Rank::CPL => "CPL",
            Rank::SGT => "SGT",
            Rank::SSG => "SSG",
            Rank::SFC => "SFC",
            Rank::MSG => "MSG",
            Rank::SM => "SM",
            Rank::CSM => "CSM",
            Rank::SMA => "SMA",
            Rank::LT => "LT",
            Rank::CPT => "CPT",
            Rank::MAJ => "MAJ",
            Rank::LTC => "LTC",
            Rank::COL => "COL",
            Rank::BG => "BG",
            Rank::MG => "MG",
            Rank::LTG => "LTG",
            Rank::GEN => "GEN",
            Rank::GOA => "GOA",
            Rank::WO1 => "WO1",
            Rank::CW2 => "CW2",
            Rank::CW3 => "CW3",
            Rank::CW4 => "CW4",
            Rank::CW5 => "CW5",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Rank::ALL
            .iter()
            .copied()
            .find(|rank| rank.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| ReceiptError::invalid_argument(format!("Unknown rank: {:?}", code)))
    }
}

// ============================================================================
// OPERATOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator {
    first_name: String,
    last_name: String,
    rank: Rank,
}

impl Operator {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, rank: Rank) -> Result<Self> {
        let first_name = first_name.into().trim().to_string();
        let last_name = last_name.into().trim().to_string();

        if first_name.is_empty() {
            return Err(ReceiptError::invalid_argument("Operator: blank first name"));
        }
        if last_name.is_empty() {
            return Err(ReceiptError::invalid_argument("Operator: blank last name"));
        }

        Ok(Operator {
            first_name,
            last_name,
            rank,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rank, self.first_name, self.last_name)
    }
}

// ============================================================================
// TESTS
// ============================================================================
