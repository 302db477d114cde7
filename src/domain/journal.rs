//! Store-backed journal pipeline.
//!
//! Reads a snapshot of executions from an injected [`JournalStore`] and runs
//! the pure aggregation over it. Re-running `load` is the only way to pick up
//! new data.

use super::daily::{aggregate_by_day, DailySummary};
use super::dashboard::{compute_dashboard, DashboardData};
use super::error::JournalError;
use crate::ports::store_port::JournalStore;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Journal {
    /// Newest day first.
    pub summaries: Vec<DailySummary>,
    pub dashboard: DashboardData,
    pub execution_count: usize,
}

impl Journal {
    pub fn load(store: &dyn JournalStore, fallback_date: NaiveDate) -> Result<Self, JournalError> {
        let executions = store.all_executions()?;
        let summaries = aggregate_by_day(&executions);
        let dashboard = compute_dashboard(&summaries, fallback_date);
        Ok(Self {
            execution_count: executions.len(),
            summaries,
            dashboard,
        })
    }

    pub fn day(&self, date: &str) -> Option<&DailySummary> {
        self.summaries.iter().find(|s| s.date == date)
    }

    pub fn total_net_pnl(&self) -> f64 {
        self.summaries.iter().map(|s| s.net_pnl).sum()
    }
}
