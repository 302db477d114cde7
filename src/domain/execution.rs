//! Broker execution records.
//!
//! An [`Execution`] is one fill as reported by the broker. Records arrive
//! already normalized from the import layer; nothing here validates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order action of a single fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionSide {
    BuyToOpen,
    SellToOpen,
    BuyToClose,
    SellToClose,
}

impl ExecutionSide {
    /// True for actions that establish (or add to) a position.
    pub fn is_opening(self) -> bool {
        matches!(self, ExecutionSide::BuyToOpen | ExecutionSide::SellToOpen)
    }

    /// Broker wire code, e.g. `BUYTOOPEN`.
    pub fn code(self) -> &'static str {
        match self {
            ExecutionSide::BuyToOpen => "BUYTOOPEN",
            ExecutionSide::SellToOpen => "SELLTOOPEN",
            ExecutionSide::BuyToClose => "BUYTOCLOSE",
            ExecutionSide::SellToClose => "SELLTOCLOSE",
        }
    }
}

impl fmt::Display for ExecutionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown execution side: {0}")]
pub struct UnknownSide(pub String);

impl FromStr for ExecutionSide {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUYTOOPEN" => Ok(ExecutionSide::BuyToOpen),
            "SELLTOOPEN" => Ok(ExecutionSide::SellToOpen),
            "BUYTOCLOSE" => Ok(ExecutionSide::BuyToClose),
            "SELLTOCLOSE" => Ok(ExecutionSide::SellToClose),
            _ => Err(UnknownSide(s.to_string())),
        }
    }
}

/// One broker fill.
///
/// `quantity` is signed (negative for sells) and `total_value` carries the
/// same sign as the quantity, so summing it over a flat round trip gives the
/// negated realized P&L. `commission` is a cash flow: a paid fee is negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub trade_id: String,
    pub account_id: String,
    pub symbol: String,
    pub company_name: String,
    pub exchanges: String,
    pub side: ExecutionSide,
    pub order_type: String,
    /// `YYYYMMDD`.
    pub date: String,
    /// `HH:MM:SS`, exchange-local.
    pub time: String,
    pub currency: String,
    pub quantity: f64,
    pub multiplier: f64,
    pub price: f64,
    pub total_value: f64,
    pub commission: f64,
    pub fee_multiplier: f64,
}

impl Execution {
    /// Seconds since midnight for this fill, if the time parses.
    pub fn seconds_of_day(&self) -> Option<u32> {
        time_of_day_seconds(&self.time)
    }
}

/// Parses `HH:MM[:SS]` into seconds since midnight. Missing seconds count as 0.
pub fn time_of_day_seconds(time: &str) -> Option<u32> {
    let mut parts = time.trim().split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    let seconds: u32 = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}
