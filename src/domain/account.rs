//! Account and open-position snapshot records from broker statements.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub account_type: String,
    pub address: String,
    /// Unix milliseconds when the statement was imported.
    pub imported_at: i64,
}

/// A position still held at statement time (`STK_LOT` rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLot {
    pub account_id: String,
    pub symbol: String,
    pub company_name: String,
    pub currency: String,
    pub date: String,
    pub time: String,
    pub quantity: f64,
    pub multiplier: f64,
    pub avg_price: f64,
    pub total_value: f64,
    pub fee_multiplier: f64,
}

impl OpenLot {
    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }
}
