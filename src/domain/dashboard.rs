//! Cross-day dashboard analytics.
//!
//! Consumes daily summaries in any order and produces the calendar strip, the
//! cumulative P&L curve and win/loss/hold-time statistics over every closed
//! trade.

use super::daily::{parse_trade_date, DailySummary};
use super::rounding::{round_cents, round_whole};
use super::trade::AggregatedTrade;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of cells in the calendar strip.
pub const CALENDAR_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// `YYYYMMDD`.
    pub date: String,
    pub day_num: u32,
    pub day_name: String,
    pub pnl: f64,
    pub trade_count: usize,
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePnlPoint {
    pub date: String,
    /// `YYYY-MM-DD`.
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub calendar: Vec<CalendarDay>,
    pub cumulative_pnl: Vec<CumulativePnlPoint>,
    pub total_wins: usize,
    pub total_losses: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_gain: f64,
    pub largest_loss: f64,
    pub avg_win_hold_minutes: f64,
    pub avg_loss_hold_minutes: f64,
}

/// Builds the dashboard for `summaries`.
///
/// `fallback_date` anchors the calendar when there is no data or the earliest
/// date does not parse; callers pass today's local date.
pub fn compute_dashboard(summaries: &[DailySummary], fallback_date: NaiveDate) -> DashboardData {
    let mut sorted: Vec<&DailySummary> = summaries.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let first_date = sorted
        .first()
        .and_then(|s| parse_trade_date(&s.date))
        .unwrap_or(fallback_date);

    let calendar = build_calendar(&sorted, first_date);
    let cumulative_pnl = build_cumulative(&sorted);

    let closed: Vec<&AggregatedTrade> = sorted
        .iter()
        .flat_map(|s| s.trades.iter())
        .filter(|t| !t.is_open)
        .collect();
    let wins: Vec<&AggregatedTrade> = closed.iter().copied().filter(|t| t.net_pnl > 0.0).collect();
    let losses: Vec<&AggregatedTrade> = closed.iter().copied().filter(|t| t.net_pnl < 0.0).collect();

    let avg_win = mean(wins.iter().map(|t| t.net_pnl));
    let avg_loss = mean(losses.iter().map(|t| t.net_pnl));
    let largest_gain = wins
        .iter()
        .map(|t| t.net_pnl)
        .reduce(f64::max)
        .unwrap_or(0.0);
    let largest_loss = losses
        .iter()
        .map(|t| t.net_pnl)
        .reduce(f64::min)
        .unwrap_or(0.0);

    DashboardData {
        calendar,
        cumulative_pnl,
        total_wins: wins.len(),
        total_losses: losses.len(),
        avg_win: round_cents(avg_win),
        avg_loss: round_cents(avg_loss),
        largest_gain: round_cents(largest_gain),
        largest_loss: round_cents(largest_loss),
        avg_win_hold_minutes: round_whole(average_hold_minutes(&wins)),
        avg_loss_hold_minutes: round_whole(average_hold_minutes(&losses)),
    }
}

/// Sunday that begins the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Seven cells, Sunday to Saturday, for the week holding `first_date`.
///
/// Only one week is materialized even when the data spans more.
fn build_calendar(sorted: &[&DailySummary], first_date: NaiveDate) -> Vec<CalendarDay> {
    let by_date: HashMap<&str, &DailySummary> =
        sorted.iter().map(|s| (s.date.as_str(), *s)).collect();
    let start = week_start(first_date);

    (0..CALENDAR_DAYS as i64)
        .map(|offset| {
            let day = start + Duration::days(offset);
            let key = day.format("%Y%m%d").to_string();
            let summary = by_date.get(key.as_str());
            CalendarDay {
                day_num: day.day(),
                day_name: DAY_NAMES[day.weekday().num_days_from_sunday() as usize].to_string(),
                pnl: summary.map(|s| s.net_pnl).unwrap_or(0.0),
                trade_count: summary.map(|s| s.total_trades).unwrap_or(0),
                has_data: summary.is_some(),
                date: key,
            }
        })
        .collect()
}

/// One point per traded day. Each point is rounded; the running sum is not.
fn build_cumulative(sorted: &[&DailySummary]) -> Vec<CumulativePnlPoint> {
    let mut running = 0.0_f64;
    sorted
        .iter()
        .map(|s| {
            running += s.net_pnl;
            CumulativePnlPoint {
                date: s.date.clone(),
                label: parse_trade_date(&s.date)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| s.date.clone()),
                value: round_cents(running),
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}

/// Mean hold time over trades with a non-zero hold.
fn average_hold_minutes(trades: &[&AggregatedTrade]) -> f64 {
    mean(
        trades
            .iter()
            .map(|t| t.hold_minutes())
            .filter(|&m| m > 0.0),
    )
}
