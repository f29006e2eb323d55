//! Currency codes accepted by the ledger.
//!
//! Balances are stored as signed integers in the smallest unit of the
//! account's currency, so there is no conversion logic here: a currency
//! is only a tag that two accounts must share before funds move.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Canadian Dollar
    Cad,
}

/// Returned when a code is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported currency: {0}")]
pub struct UnsupportedCurrency(pub String);

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 3] = [Self::Usd, Self::Eur, Self::Cad];

    /// Returns the ISO code as stored in the `accounts.currency` column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Cad => "CAD",
        }
    }

    /// Returns true if `code` names a supported currency.
    ///
    /// Matching is exact: `"usd"` is not accepted.
    #[must_use]
    pub fn is_supported(code: &str) -> bool {
        code.parse::<Self>().is_ok()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = UnsupportedCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "CAD" => Ok(Self::Cad),
            _ => Err(UnsupportedCurrency(s.to_string())),
        }
    }
}
