//! Per-day rollup of aggregated trades.

use super::execution::{time_of_day_seconds, Execution};
use super::trade::{build_trades, AggregatedTrade};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parses a `YYYYMMDD` trade date.
pub fn parse_trade_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

/// `20240105` → `Fri, Jan 5, 2024`. Unparsable dates are returned as-is.
pub fn format_trade_date(date: &str) -> String {
    match parse_trade_date(date) {
        Some(d) => d.format("%a, %b %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub formatted_date: String,
    /// Ascending by first fill time.
    pub trades: Vec<AggregatedTrade>,
    pub total_trades: usize,
    pub total_volume: f64,
    pub win_count: usize,
    pub loss_count: usize,
    /// Percentage of closed trades that were wins, 0..=100.
    pub win_rate: f64,
    pub total_commissions: f64,
    pub gross_pnl: f64,
    pub net_pnl: f64,
}

impl DailySummary {
    pub fn closed_trades(&self) -> impl Iterator<Item = &AggregatedTrade> {
        self.trades.iter().filter(|t| !t.is_open)
    }

    pub fn open_trades(&self) -> impl Iterator<Item = &AggregatedTrade> {
        self.trades.iter().filter(|t| t.is_open)
    }
}

/// Rolls up every trade sharing `date`.
///
/// Counts and volume cover all trades; win/loss and P&L totals cover closed
/// trades only.
pub fn summarize_day(date: &str, mut trades: Vec<AggregatedTrade>) -> DailySummary {
    trades.sort_by_key(|t| time_of_day_seconds(&t.first_trade_time));

    let total_trades = trades.len();
    let total_volume: f64 = trades.iter().map(|t| t.volume).sum();

    let mut closed = 0usize;
    let mut win_count = 0usize;
    let mut loss_count = 0usize;
    let mut total_commissions = 0.0_f64;
    let mut gross_pnl = 0.0_f64;
    let mut net_pnl = 0.0_f64;

    for trade in trades.iter().filter(|t| !t.is_open) {
        closed += 1;
        if trade.net_pnl > 0.0 {
            win_count += 1;
        } else if trade.net_pnl < 0.0 {
            loss_count += 1;
        }
        total_commissions += trade.total_commissions;
        gross_pnl += trade.gross_pnl;
        net_pnl += trade.net_pnl;
    }

    let win_rate = if closed > 0 {
        win_count as f64 / closed as f64 * 100.0
    } else {
        0.0
    };

    DailySummary {
        date: date.to_string(),
        formatted_date: format_trade_date(date),
        trades,
        total_trades,
        total_volume,
        win_count,
        loss_count,
        win_rate,
        total_commissions,
        gross_pnl,
        net_pnl,
    }
}

/// Runs the full journal pipeline: group, build trades, roll up per day.
///
/// Days come back newest first, the order the journal view lists them.
pub fn aggregate_by_day(executions: &[Execution]) -> Vec<DailySummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut dates: Vec<String> = Vec::new();
    let mut by_date: Vec<Vec<AggregatedTrade>> = Vec::new();

    for trade in build_trades(executions) {
        match index.get(&trade.date) {
            Some(&i) => by_date[i].push(trade),
            None => {
                index.insert(trade.date.clone(), dates.len());
                dates.push(trade.date.clone());
                by_date.push(vec![trade]);
            }
        }
    }

    let mut summaries: Vec<DailySummary> = dates
        .iter()
        .zip(by_date)
        .map(|(date, trades)| summarize_day(date, trades))
        .collect();

    summaries.sort_by(|a, b| b.date.cmp(&a.date));
    summaries
}
