//! Normalization of arbitrary broker tables into executions.
//!
//! A table is mapped column-by-column onto [`NormalizedTransaction`], whose
//! optional fields get their defaults in [`to_execution`]. Nothing in the
//! analytics engine knows about these defaults.

use super::execution::{time_of_day_seconds, Execution, ExecutionSide};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header row plus rows keyed by header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// The fields a normalized row can carry, in mapping priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Symbol,
    Side,
    Date,
    Quantity,
    Price,
    Time,
    OrderId,
    CompanyName,
    Currency,
    OrderType,
    Commission,
    StockCode,
    TotalValue,
    Exchanges,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Symbol,
        Field::Side,
        Field::Date,
        Field::Quantity,
        Field::Price,
        Field::Time,
        Field::OrderId,
        Field::CompanyName,
        Field::Currency,
        Field::OrderType,
        Field::Commission,
        Field::StockCode,
        Field::TotalValue,
        Field::Exchanges,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Side => "side",
            Field::Date => "date",
            Field::Quantity => "quantity",
            Field::Price => "price",
            Field::Time => "time",
            Field::OrderId => "orderId",
            Field::CompanyName => "companyName",
            Field::Currency => "currency",
            Field::OrderType => "orderType",
            Field::Commission => "commission",
            Field::StockCode => "stockCode",
            Field::TotalValue => "totalValue",
            Field::Exchanges => "exchanges",
        }
    }
}

/// Source header for each normalized field, if one was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub date: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub time: Option<String>,
    pub order_id: Option<String>,
    pub company_name: Option<String>,
    pub currency: Option<String>,
    pub order_type: Option<String>,
    pub commission: Option<String>,
    pub stock_code: Option<String>,
    pub total_value: Option<String>,
    pub exchanges: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::Symbol => &self.symbol,
            Field::Side => &self.side,
            Field::Date => &self.date,
            Field::Quantity => &self.quantity,
            Field::Price => &self.price,
            Field::Time => &self.time,
            Field::OrderId => &self.order_id,
            Field::CompanyName => &self.company_name,
            Field::Currency => &self.currency,
            Field::OrderType => &self.order_type,
            Field::Commission => &self.commission,
            Field::StockCode => &self.stock_code,
            Field::TotalValue => &self.total_value,
            Field::Exchanges => &self.exchanges,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, field: Field, header: impl Into<String>) {
        let slot = match field {
            Field::Symbol => &mut self.symbol,
            Field::Side => &mut self.side,
            Field::Date => &mut self.date,
            Field::Quantity => &mut self.quantity,
            Field::Price => &mut self.price,
            Field::Time => &mut self.time,
            Field::OrderId => &mut self.order_id,
            Field::CompanyName => &mut self.company_name,
            Field::Currency => &mut self.currency,
            Field::OrderType => &mut self.order_type,
            Field::Commission => &mut self.commission,
            Field::StockCode => &mut self.stock_code,
            Field::TotalValue => &mut self.total_value,
            Field::Exchanges => &mut self.exchanges,
        };
        *slot = Some(header.into());
    }

    /// Required fields with no mapped column.
    pub fn missing_required(&self) -> Vec<Field> {
        [
            Field::Symbol,
            Field::Side,
            Field::Date,
            Field::Quantity,
            Field::Price,
        ]
        .into_iter()
        .filter(|f| self.get(*f).is_none())
        .collect()
    }
}

/// Raw side cell value → action, e.g. `"B" → Buy`.
pub type SideValueMapping = HashMap<String, TradeAction>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingResult {
    pub mapping: ColumnMapping,
    pub side_values: SideValueMapping,
}

/// A row resolved against a [`ColumnMapping`]. Optional fields are defaulted
/// by [`to_execution`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransaction {
    pub symbol: String,
    pub side: TradeAction,
    /// `YYYYMMDD`.
    pub date: String,
    pub quantity: f64,
    pub price: f64,
    pub time: Option<String>,
    pub order_id: Option<String>,
    pub company_name: Option<String>,
    pub currency: Option<String>,
    pub exchanges: Option<String>,
    pub order_type: Option<String>,
    pub total_value: Option<f64>,
    pub commission: Option<f64>,
    pub stock_code: Option<String>,
}

/// Outcome of [`normalize_rows`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub transactions: Vec<NormalizedTransaction>,
    /// Rows dropped for a missing or unreadable required field.
    pub skipped: usize,
}

/// Resolves a side cell: explicit mapping first, then the leading letter.
pub fn resolve_action(raw: &str, side_values: &SideValueMapping) -> Option<TradeAction> {
    let raw = raw.trim();
    if let Some(action) = side_values.get(raw) {
        return Some(*action);
    }
    match raw.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('B') => Some(TradeAction::Buy),
        Some('S') => Some(TradeAction::Sell),
        _ => None,
    }
}

/// Splits a date or date-time cell into (`YYYYMMDD`, optional `HH:MM:SS`).
///
/// Accepts `YYYYMMDD`, `YYYY-MM-DD` and `YYYY/MM/DD`, optionally followed by a
/// time separated by a space or `T`.
pub fn split_date_time(cell: &str) -> Option<(String, Option<String>)> {
    let cell = cell.trim();
    let (date_part, time_part) = match cell.find([' ', 'T']) {
        Some(i) => (&cell[..i], Some(cell[i + 1..].trim())),
        None => (cell, None),
    };

    let digits: String = date_part.chars().filter(|c| c.is_ascii_digit()).collect();
    let separated = date_part.contains(['-', '/']);
    let date = if separated {
        let parts: Vec<&str> = date_part.split(['-', '/']).collect();
        if parts.len() != 3 || parts[0].len() != 4 {
            return None;
        }
        let month: u32 = parts[1].parse().ok()?;
        let day: u32 = parts[2].parse().ok()?;
        format!("{}{:02}{:02}", parts[0], month, day)
    } else if digits.len() == 8 && digits.len() == date_part.len() {
        digits
    } else {
        return None;
    };

    chrono::NaiveDate::parse_from_str(&date, "%Y%m%d").ok()?;

    let time = time_part
        .filter(|t| !t.is_empty())
        .and_then(|t| time_of_day_seconds(t).map(|_| normalize_time(t)));
    Some((date, time))
}

/// Pads `H:M[:S]` to `HH:MM:SS`.
fn normalize_time(time: &str) -> String {
    let mut parts = time.trim().split(':').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    let h = parts.next().unwrap_or(0);
    let m = parts.next().unwrap_or(0);
    let s = parts.next().unwrap_or(0);
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parses a numeric cell, tolerating thousands separators and currency marks.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Applies `mapping` to every row of `table`.
pub fn normalize_rows(
    table: &ExtractedTable,
    mapping: &ColumnMapping,
    side_values: &SideValueMapping,
) -> Normalized {
    let mut out = Normalized::default();

    for row in &table.rows {
        let cell = |field: Field| {
            mapping
                .get(field)
                .and_then(|h| row.get(h))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let required = (
            cell(Field::Symbol),
            cell(Field::Side).and_then(|s| resolve_action(s, side_values)),
            cell(Field::Date).and_then(split_date_time),
            cell(Field::Quantity).and_then(parse_number),
            cell(Field::Price).and_then(parse_number),
        );
        let (Some(symbol), Some(side), Some((date, embedded_time)), Some(quantity), Some(price)) =
            required
        else {
            out.skipped += 1;
            continue;
        };

        let time = cell(Field::Time)
            .filter(|t| time_of_day_seconds(t).is_some())
            .map(normalize_time)
            .or(embedded_time);

        out.transactions.push(NormalizedTransaction {
            symbol: symbol.to_string(),
            side,
            date,
            quantity: quantity.abs(),
            price: price.abs(),
            time,
            order_id: cell(Field::OrderId).map(str::to_string),
            company_name: cell(Field::CompanyName).map(str::to_string),
            currency: cell(Field::Currency).map(str::to_string),
            exchanges: cell(Field::Exchanges).map(str::to_string),
            order_type: cell(Field::OrderType).map(str::to_string),
            total_value: cell(Field::TotalValue).and_then(parse_number),
            commission: cell(Field::Commission).and_then(parse_number),
            stock_code: cell(Field::StockCode).map(str::to_string),
        });
    }

    out
}

/// Builds an [`Execution`] from a normalized row, filling defaults.
///
/// Buys become `BuyToOpen` and sells `SellToClose`. Quantity and
/// `total_value` are signed by the action (negative for sells) whatever sign
/// the source used, and a supplied commission is stored as a paid fee.
///
/// Rows without an order id get `{account}-{date}-{imported_at}-{index}`, so
/// two files imported at different times never share generated ids.
pub fn to_execution(
    n: &NormalizedTransaction,
    account_id: &str,
    imported_at: i64,
    index: usize,
) -> Execution {
    let (side, sign) = match n.side {
        TradeAction::Buy => (ExecutionSide::BuyToOpen, 1.0),
        TradeAction::Sell => (ExecutionSide::SellToClose, -1.0),
    };
    let quantity = sign * n.quantity.abs();
    let price = n.price.abs();

    Execution {
        trade_id: n
            .order_id
            .clone()
            .unwrap_or_else(|| format!("{}-{}-{}-{}", account_id, n.date, imported_at, index)),
        account_id: account_id.to_string(),
        symbol: n.symbol.clone(),
        company_name: n.company_name.clone().unwrap_or_else(|| n.symbol.clone()),
        exchanges: n.exchanges.clone().unwrap_or_default(),
        side,
        order_type: n.order_type.clone().unwrap_or_else(|| "MARKET".to_string()),
        date: n.date.clone(),
        time: n.time.clone().unwrap_or_else(|| "00:00:00".to_string()),
        currency: n.currency.clone().unwrap_or_else(|| "USD".to_string()),
        quantity,
        multiplier: 1.0,
        price,
        total_value: n
            .total_value
            .map(|v| sign * v.abs())
            .unwrap_or(quantity * price),
        commission: n.commission.map(|c| -c.abs()).unwrap_or(0.0),
        fee_multiplier: 1.0,
    }
}
