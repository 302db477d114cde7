//! Offline header matching against a fixed alias table.

use crate::domain::error::JournalError;
use crate::domain::import::{ColumnMapping, Field, MappingResult};
use crate::ports::mapper_port::ColumnMapper;
use std::collections::{HashMap, HashSet};

fn aliases(field: Field) -> &'static [&'static str] {
    match field {
        Field::Symbol => &[
            "symbol",
            "ticker",
            "stock",
            "stock name",
            "instrument",
            "name",
            "security",
        ],
        Field::Side => &[
            "side",
            "action",
            "b/s",
            "buy/sell",
            "type",
            "direction",
            "trade type",
        ],
        Field::Date => &[
            "date",
            "trade date",
            "execution date",
            "create date",
            "create date & time",
            "datetime",
            "time",
        ],
        Field::Quantity => &[
            "quantity",
            "qty",
            "shares",
            "volume",
            "size",
            "order quantity",
            "confirmed quantity",
            "lots",
        ],
        Field::Price => &[
            "price",
            "executed price",
            "exec price",
            "avg price",
            "fill price",
            "average price",
            "trade price",
        ],
        Field::Time => &["time", "execution time", "trade time"],
        Field::OrderId => &["order id", "trade id", "id", "ref", "reference", "order no"],
        Field::CompanyName => &["company", "company name", "stock name", "name", "description"],
        Field::Currency => &["currency", "ccy", "cur"],
        Field::OrderType => &["order type", "type", "order kind"],
        Field::Commission => &["commission", "fee", "fees", "brokerage"],
        Field::StockCode => &["stock code", "code", "isin", "sedol"],
        Field::TotalValue => &[
            "total",
            "total value",
            "amount",
            "value",
            "net amount",
            "consideration",
        ],
        Field::Exchanges => &["exchange", "exchanges", "venue"],
    }
}

/// Lowercases and drops everything but ASCII letters and digits.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Exact normalized match, or containment for aliases longer than 3 chars.
fn header_matches(header: &str, alias: &str) -> bool {
    let h = normalize(header);
    let a = normalize(alias);
    h == a || (a.len() > 3 && h.contains(&a))
}

/// Assigns headers to fields in [`Field::ALL`] order; each header is used at
/// most once and the first matching header wins.
pub fn map_headers(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    let mut used: HashSet<&str> = HashSet::new();

    for field in Field::ALL {
        let found = headers.iter().find(|h| {
            !used.contains(h.as_str()) && aliases(field).iter().any(|a| header_matches(h, a))
        });
        if let Some(header) = found {
            used.insert(header.as_str());
            mapping.set(field, header.clone());
        }
    }

    mapping
}

/// Never fails and never inspects row values; side values are left to the
/// leading-letter rule.
#[derive(Debug, Default, Clone, Copy)]
pub struct AliasColumnMapper;

impl ColumnMapper for AliasColumnMapper {
    fn map_columns(
        &self,
        headers: &[String],
        _sample_rows: &[HashMap<String, String>],
    ) -> Result<MappingResult, JournalError> {
        Ok(MappingResult {
            mapping: map_headers(headers),
            side_values: HashMap::new(),
        })
    }

    fn name(&self) -> &'static str {
        "alias"
    }
}
