//! Persistent journal storage port trait.

use crate::domain::account::{Account, OpenLot};
use crate::domain::error::JournalError;
use crate::domain::execution::Execution;
use crate::domain::notes::{DailyNote, TradeNote};

/// Storage for accounts, executions, open lots and notes.
///
/// Implementations hand out plain snapshots; the analytics pipeline never
/// holds a store handle while it runs.
pub trait JournalStore {
    /// Upserts the account and its executions (keyed by `trade_id`) and
    /// replaces the account's open lots, all in one transaction.
    fn import_data(
        &self,
        account: &Account,
        executions: &[Execution],
        lots: &[OpenLot],
    ) -> Result<(), JournalError>;

    fn all_executions(&self) -> Result<Vec<Execution>, JournalError>;

    fn execution_count(&self) -> Result<usize, JournalError>;

    fn open_lots(&self, account_id: &str) -> Result<Vec<OpenLot>, JournalError>;

    fn clear_all(&self) -> Result<(), JournalError>;

    fn put_daily_note(&self, note: &DailyNote) -> Result<(), JournalError>;

    fn daily_note(&self, date: &str, account_id: &str) -> Result<Option<DailyNote>, JournalError>;

    fn put_trade_note(&self, note: &TradeNote) -> Result<(), JournalError>;

    fn trade_note(
        &self,
        date: &str,
        symbol: &str,
        account_id: &str,
    ) -> Result<Option<TradeNote>, JournalError>;
}
