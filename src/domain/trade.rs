//! Day/symbol grouping and round-trip trade construction.
//!
//! Every execution sharing a (date, symbol) pair is folded into one
//! [`AggregatedTrade`]. There is no lot matching: partial closes and re-opens
//! within the same bucket are summed as a single position walk.

use super::execution::{Execution, ExecutionSide};
use super::rounding::round_cents;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Residual net quantity above which a bucket still holds a position.
pub const OPEN_QUANTITY_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Long,
    Short,
}

/// Executions sharing one (date, symbol) key, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub date: String,
    pub symbol: String,
    pub executions: Vec<Execution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTrade {
    pub symbol: String,
    pub company_name: String,
    pub date: String,
    pub first_trade_time: String,
    pub side: TradeSide,
    pub volume: f64,
    pub net_quantity: f64,
    pub is_open: bool,
    pub gross_pnl: f64,
    pub total_commissions: f64,
    pub net_pnl: f64,
    /// Sorted ascending by time of day; equal times keep input order.
    pub executions: Vec<Execution>,
}

impl AggregatedTrade {
    pub fn execution_count(&self) -> usize {
        self.executions.len()
    }

    /// A closed trade with strictly positive net P&L.
    pub fn is_win(&self) -> bool {
        !self.is_open && self.net_pnl > 0.0
    }

    /// A closed trade with strictly negative net P&L.
    pub fn is_loss(&self) -> bool {
        !self.is_open && self.net_pnl < 0.0
    }

    /// Intraday span between the earliest and latest fill, in minutes.
    ///
    /// Zero for single-fill trades and for trades with any fill whose time
    /// does not parse.
    pub fn hold_minutes(&self) -> f64 {
        if self.executions.len() < 2 {
            return 0.0;
        }
        let times: Option<Vec<u32>> = self
            .executions
            .iter()
            .map(Execution::seconds_of_day)
            .collect();
        let Some(times) = times else {
            return 0.0;
        };
        let first = times.iter().copied().min().unwrap_or(0);
        let last = times.iter().copied().max().unwrap_or(0);
        (last - first) as f64 / 60.0
    }
}

/// Partitions executions into (date, symbol) buckets.
///
/// Buckets come back in order of first appearance and keep the input order of
/// their executions.
pub fn group_by_day_symbol(executions: &[Execution]) -> Vec<Bucket> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for execution in executions {
        let key = (execution.date.as_str(), execution.symbol.as_str());
        match index.get(&key) {
            Some(&i) => buckets[i].executions.push(execution.clone()),
            None => {
                index.insert(key, buckets.len());
                buckets.push(Bucket {
                    date: execution.date.clone(),
                    symbol: execution.symbol.clone(),
                    executions: vec![execution.clone()],
                });
            }
        }
    }

    buckets
}

/// Sort key for fills: unparsable times sort ahead of every valid time.
fn time_key(execution: &Execution) -> Option<u32> {
    execution.seconds_of_day()
}

/// Builds the trade for one bucket.
pub fn build_trade(bucket: Bucket) -> AggregatedTrade {
    let Bucket {
        date,
        symbol,
        mut executions,
    } = bucket;

    // sort_by_key is stable, so equal times keep their input order.
    executions.sort_by_key(time_key);

    // No opening leg (history imported mid-position) falls back to Long.
    let side = match executions.iter().find(|e| e.side.is_opening()) {
        Some(e) if e.side == ExecutionSide::SellToOpen => TradeSide::Short,
        _ => TradeSide::Long,
    };

    let volume: f64 = executions.iter().map(|e| e.quantity.abs()).sum();
    let net_quantity: f64 = executions.iter().map(|e| e.quantity).sum();
    let total_value: f64 = executions.iter().map(|e| e.total_value).sum();
    let total_commissions: f64 = executions.iter().map(|e| e.commission).sum();

    let gross_pnl = -total_value;
    let net_pnl = gross_pnl + total_commissions;

    let (company_name, first_trade_time) = executions
        .first()
        .map(|e| (e.company_name.clone(), e.time.clone()))
        .unwrap_or_default();

    AggregatedTrade {
        symbol,
        company_name,
        date,
        first_trade_time,
        side,
        volume,
        net_quantity: round_cents(net_quantity),
        is_open: net_quantity.abs() > OPEN_QUANTITY_EPSILON,
        gross_pnl,
        total_commissions,
        net_pnl,
        executions,
    }
}

/// Groups and builds every trade in `executions`.
pub fn build_trades(executions: &[Execution]) -> Vec<AggregatedTrade> {
    group_by_day_symbol(executions)
        .into_iter()
        .map(build_trade)
        .collect()
}
