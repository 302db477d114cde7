#![allow(dead_code)]

use std::cell::RefCell;
use tradediary::domain::account::{Account, OpenLot};
use tradediary::domain::error::JournalError;
pub use tradediary::domain::execution::{Execution, ExecutionSide};
use tradediary::domain::notes::{DailyNote, TradeNote};
use tradediary::ports::store_port::JournalStore;

/// In-memory store that can be told to fail reads.
#[derive(Default)]
pub struct MockStore {
    pub accounts: RefCell<Vec<Account>>,
    pub executions: RefCell<Vec<Execution>>,
    pub lots: RefCell<Vec<OpenLot>>,
    pub daily_notes: RefCell<Vec<DailyNote>>,
    pub trade_notes: RefCell<Vec<TradeNote>>,
    pub fail_reads: Option<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executions(executions: Vec<Execution>) -> Self {
        let store = Self::default();
        *store.executions.borrow_mut() = executions;
        store
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_reads: Some(reason.to_string()),
            ..Self::default()
        }
    }

    fn check_reads(&self) -> Result<(), JournalError> {
        match &self.fail_reads {
            Some(reason) => Err(JournalError::Database {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl JournalStore for MockStore {
    fn import_data(
        &self,
        account: &Account,
        executions: &[Execution],
        lots: &[OpenLot],
    ) -> Result<(), JournalError> {
        let mut accounts = self.accounts.borrow_mut();
        accounts.retain(|a| a.account_id != account.account_id);
        accounts.push(account.clone());

        let mut stored = self.executions.borrow_mut();
        for e in executions {
            match stored.iter_mut().find(|s| s.trade_id == e.trade_id) {
                Some(existing) => *existing = e.clone(),
                None => stored.push(e.clone()),
            }
        }

        let mut stored_lots = self.lots.borrow_mut();
        stored_lots.retain(|l| l.account_id != account.account_id);
        stored_lots.extend(lots.iter().cloned());
        Ok(())
    }

    fn all_executions(&self) -> Result<Vec<Execution>, JournalError> {
        self.check_reads()?;
        Ok(self.executions.borrow().clone())
    }

    fn execution_count(&self) -> Result<usize, JournalError> {
        self.check_reads()?;
        Ok(self.executions.borrow().len())
    }

    fn open_lots(&self, account_id: &str) -> Result<Vec<OpenLot>, JournalError> {
        self.check_reads()?;
        Ok(self
            .lots
            .borrow()
            .iter()
            .filter(|l| l.account_id == account_id)
            .cloned()
            .collect())
    }

    fn clear_all(&self) -> Result<(), JournalError> {
        self.accounts.borrow_mut().clear();
        self.executions.borrow_mut().clear();
        self.lots.borrow_mut().clear();
        self.daily_notes.borrow_mut().clear();
        self.trade_notes.borrow_mut().clear();
        Ok(())
    }

    fn put_daily_note(&self, note: &DailyNote) -> Result<(), JournalError> {
        let mut notes = self.daily_notes.borrow_mut();
        notes.retain(|n| !(n.date == note.date && n.account_id == note.account_id));
        notes.push(note.clone());
        Ok(())
    }

    fn daily_note(&self, date: &str, account_id: &str) -> Result<Option<DailyNote>, JournalError> {
        self.check_reads()?;
        Ok(self
            .daily_notes
            .borrow()
            .iter()
            .find(|n| n.date == date && n.account_id == account_id)
            .cloned())
    }

    fn put_trade_note(&self, note: &TradeNote) -> Result<(), JournalError> {
        let mut notes = self.trade_notes.borrow_mut();
        notes.retain(|n| {
            !(n.date == note.date && n.symbol == note.symbol && n.account_id == note.account_id)
        });
        notes.push(note.clone());
        Ok(())
    }

    fn trade_note(
        &self,
        date: &str,
        symbol: &str,
        account_id: &str,
    ) -> Result<Option<TradeNote>, JournalError> {
        self.check_reads()?;
        Ok(self
            .trade_notes
            .borrow()
            .iter()
            .find(|n| n.date == date && n.symbol == symbol && n.account_id == account_id)
            .cloned())
    }
}

/// Fill with `total_value = qty * price` and no commission.
pub fn make_exec(
    date: &str,
    symbol: &str,
    side: ExecutionSide,
    time: &str,
    qty: f64,
    price: f64,
) -> Execution {
    Execution {
        trade_id: format!("{date}-{symbol}-{time}-{qty}"),
        account_id: "U1234567".to_string(),
        symbol: symbol.to_string(),
        company_name: format!("{symbol} INC"),
        exchanges: "NASDAQ".to_string(),
        side,
        order_type: "LMT".to_string(),
        date: date.to_string(),
        time: time.to_string(),
        currency: "USD".to_string(),
        quantity: qty,
        multiplier: 1.0,
        price,
        total_value: qty * price,
        commission: 0.0,
        fee_multiplier: 1.0,
    }
}

pub fn with_commission(mut e: Execution, commission: f64) -> Execution {
    e.commission = commission;
    e
}

/// Buy-then-sell round trip on one day; `pnl` is the gross result.
pub fn round_trip(date: &str, symbol: &str, open: &str, close: &str, pnl: f64) -> Vec<Execution> {
    vec![
        make_exec(date, symbol, ExecutionSide::BuyToOpen, open, 10.0, 100.0),
        make_exec(
            date,
            symbol,
            ExecutionSide::SellToClose,
            close,
            -10.0,
            100.0 + pnl / 10.0,
        ),
    ]
}

pub fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
