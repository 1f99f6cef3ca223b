// Team specialty codes (MOS)

use crate::error::{ReceiptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mos {
    /// Detachment commander (18A)
    Alpha,
    /// Assistant detachment commander, warrant officer (18A0)
    Warrant,
    /// Weapons sergeant (18B)
    Bravo,
    /// Engineer sergeant (18C)
    Charlie,
    /// Medical sergeant (18D)
    Delta,
    /// Communications sergeant (18E)
    Echo,
    /// Intelligence sergeant (18F)
    Fox,
    /// Operations sergeant (18Z)
    Zulu,
}

impl Mos {
    pub const ALL: [Mos; 8] = [
        Mos::Alpha,
        Mos::Warrant,
        Mos::Bravo,
        Mos::Charlie,
        Mos::Delta,
        Mos::Echo,
        Mos::Fox,
        Mos::Zulu,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Mos::Alpha => "18A",
            Mos::Warrant => "18A0",
            Mos::Bravo => "18B",
            Mos::Charlie => "18C",
            Mos::Delta => "18D",
            Mos::Echo => "18E",
            Mos::Fox => "18F",
            Mos::Zulu => "18Z",
        }
    }
}

impl fmt::Display for Mos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Mos {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Mos::ALL
            .iter()
            .copied()
            .find(|mos| mos.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ReceiptError::invalid_argument(format!("Unknown MOS: {:?}", code)))
    }
}
