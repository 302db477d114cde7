//! SQLite journal store.
//!
//! Numeric columns are nullable: SQLite stores NaN as NULL, and statement
//! rows can carry unparsable numbers. NULL reads back as NaN.

use crate::domain::account::{Account, OpenLot};
use crate::domain::error::JournalError;
use crate::domain::execution::{Execution, ExecutionSide};
use crate::domain::notes::{DailyNote, TradeNote};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::JournalStore;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> JournalError {
    JournalError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> JournalError {
    JournalError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn real(v: Option<f64>) -> f64 {
    v.unwrap_or(f64::NAN)
}

impl SqliteStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        let db_path =
            config
                .get_non_empty("storage", "path")
                .ok_or_else(|| JournalError::ConfigMissing {
                    section: "storage".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("storage", "pool_size", 4).max(1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        tracing::debug!(path = %db_path, pool_size, "opened journal store");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, JournalError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, JournalError> {
        self.pool.get().map_err(pool_err)
    }

    pub fn initialize_schema(&self) -> Result<(), JournalError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS accounts (
                account_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                account_type TEXT NOT NULL,
                address TEXT NOT NULL,
                imported_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS executions (
                trade_id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                company_name TEXT NOT NULL,
                exchanges TEXT NOT NULL,
                side TEXT NOT NULL,
                order_type TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                currency TEXT NOT NULL,
                quantity REAL,
                multiplier REAL,
                price REAL,
                total_value REAL,
                commission REAL,
                fee_multiplier REAL
            );
            CREATE INDEX IF NOT EXISTS idx_executions_date ON executions(date);
            CREATE INDEX IF NOT EXISTS idx_executions_symbol ON executions(symbol);
            CREATE INDEX IF NOT EXISTS idx_executions_date_symbol ON executions(date, symbol);
            CREATE INDEX IF NOT EXISTS idx_executions_account ON executions(account_id);
            CREATE TABLE IF NOT EXISTS positions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                company_name TEXT NOT NULL,
                currency TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                quantity REAL,
                multiplier REAL,
                avg_price REAL,
                total_value REAL,
                fee_multiplier REAL
            );
            CREATE INDEX IF NOT EXISTS idx_positions_account ON positions(account_id);
            CREATE INDEX IF NOT EXISTS idx_positions_symbol ON positions(symbol);
            CREATE TABLE IF NOT EXISTS daily_notes (
                date TEXT NOT NULL,
                account_id TEXT NOT NULL,
                content TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (date, account_id)
            );
            CREATE TABLE IF NOT EXISTS trade_notes (
                date TEXT NOT NULL,
                symbol TEXT NOT NULL,
                account_id TEXT NOT NULL,
                content TEXT NOT NULL,
                tags TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (date, symbol, account_id)
            );",
        )
        .map_err(query_err)?;

        Ok(())
    }
}

impl JournalStore for SqliteStore {
    fn import_data(
        &self,
        account: &Account,
        executions: &[Execution],
        lots: &[OpenLot],
    ) -> Result<(), JournalError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        tx.execute(
            "INSERT OR REPLACE INTO accounts (account_id, name, account_type, address, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account.account_id,
                account.name,
                account.account_type,
                account.address,
                account.imported_at
            ],
        )
        .map_err(query_err)?;

        for e in executions {
            tx.execute(
                "INSERT OR REPLACE INTO executions (trade_id, account_id, symbol, company_name,
                    exchanges, side, order_type, date, time, currency, quantity, multiplier,
                    price, total_value, commission, fee_multiplier)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    e.trade_id,
                    e.account_id,
                    e.symbol,
                    e.company_name,
                    e.exchanges,
                    e.side.code(),
                    e.order_type,
                    e.date,
                    e.time,
                    e.currency,
                    e.quantity,
                    e.multiplier,
                    e.price,
                    e.total_value,
                    e.commission,
                    e.fee_multiplier
                ],
            )
            .map_err(query_err)?;
        }

        tx.execute(
            "DELETE FROM positions WHERE account_id = ?1",
            params![account.account_id],
        )
        .map_err(query_err)?;

        for lot in lots {
            tx.execute(
                "INSERT INTO positions (account_id, symbol, company_name, currency, date, time,
                    quantity, multiplier, avg_price, total_value, fee_multiplier)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    lot.account_id,
                    lot.symbol,
                    lot.company_name,
                    lot.currency,
                    lot.date,
                    lot.time,
                    lot.quantity,
                    lot.multiplier,
                    lot.avg_price,
                    lot.total_value,
                    lot.fee_multiplier
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;

        tracing::info!(
            account = %account.account_id,
            executions = executions.len(),
            lots = lots.len(),
            "imported statement"
        );
        Ok(())
    }

    fn all_executions(&self) -> Result<Vec<Execution>, JournalError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT trade_id, account_id, symbol, company_name, exchanges, side, order_type,
                        date, time, currency, quantity, multiplier, price, total_value,
                        commission, fee_multiplier
                 FROM executions
                 ORDER BY trade_id",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| {
                let side_str: String = row.get(5)?;
                let side = side_str.parse::<ExecutionSide>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(Execution {
                    trade_id: row.get(0)?,
                    account_id: row.get(1)?,
                    symbol: row.get(2)?,
                    company_name: row.get(3)?,
                    exchanges: row.get(4)?,
                    side,
                    order_type: row.get(6)?,
                    date: row.get(7)?,
                    time: row.get(8)?,
                    currency: row.get(9)?,
                    quantity: real(row.get(10)?),
                    multiplier: real(row.get(11)?),
                    price: real(row.get(12)?),
                    total_value: real(row.get(13)?),
                    commission: real(row.get(14)?),
                    fee_multiplier: real(row.get(15)?),
                })
            })
            .map_err(query_err)?;

        let mut executions = Vec::new();
        for row in rows {
            executions.push(row.map_err(query_err)?);
        }

        Ok(executions)
    }

    fn execution_count(&self) -> Result<usize, JournalError> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM executions", [], |row| row.get(0))
            .map_err(query_err)?;
        Ok(count as usize)
    }

    fn open_lots(&self, account_id: &str) -> Result<Vec<OpenLot>, JournalError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT account_id, symbol, company_name, currency, date, time, quantity,
                        multiplier, avg_price, total_value, fee_multiplier
                 FROM positions
                 WHERE account_id = ?1
                 ORDER BY id",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![account_id], |row| {
                Ok(OpenLot {
                    account_id: row.get(0)?,
                    symbol: row.get(1)?,
                    company_name: row.get(2)?,
                    currency: row.get(3)?,
                    date: row.get(4)?,
                    time: row.get(5)?,
                    quantity: real(row.get(6)?),
                    multiplier: real(row.get(7)?),
                    avg_price: real(row.get(8)?),
                    total_value: real(row.get(9)?),
                    fee_multiplier: real(row.get(10)?),
                })
            })
            .map_err(query_err)?;

        let mut lots = Vec::new();
        for row in rows {
            lots.push(row.map_err(query_err)?);
        }

        Ok(lots)
    }

    fn clear_all(&self) -> Result<(), JournalError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        tx.execute_batch(
            "DELETE FROM accounts;
             DELETE FROM executions;
             DELETE FROM positions;
             DELETE FROM daily_notes;
             DELETE FROM trade_notes;",
        )
        .map_err(query_err)?;
        tx.commit().map_err(query_err)?;

        tracing::info!("cleared journal store");
        Ok(())
    }

    fn put_daily_note(&self, note: &DailyNote) -> Result<(), JournalError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO daily_notes (date, account_id, content, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![note.date, note.account_id, note.content, note.updated_at],
        )
        .map_err(query_err)?;
        Ok(())
    }

    fn daily_note(&self, date: &str, account_id: &str) -> Result<Option<DailyNote>, JournalError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT date, account_id, content, updated_at
             FROM daily_notes
             WHERE date = ?1 AND account_id = ?2",
            params![date, account_id],
            |row| {
                Ok(DailyNote {
                    date: row.get(0)?,
                    account_id: row.get(1)?,
                    content: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(query_err)
    }

    fn put_trade_note(&self, note: &TradeNote) -> Result<(), JournalError> {
        let tags = serde_json::to_string(&note.tags).map_err(|e| JournalError::DatabaseQuery {
            reason: format!("failed to encode tags: {e}"),
        })?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO trade_notes (date, symbol, account_id, content, tags, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                note.date,
                note.symbol,
                note.account_id,
                note.content,
                tags,
                note.updated_at
            ],
        )
        .map_err(query_err)?;
        Ok(())
    }

    fn trade_note(
        &self,
        date: &str,
        symbol: &str,
        account_id: &str,
    ) -> Result<Option<TradeNote>, JournalError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT date, symbol, account_id, content, tags, updated_at
                 FROM trade_notes
                 WHERE date = ?1 AND symbol = ?2 AND account_id = ?3",
                params![date, symbol, account_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(query_err)?;

        let Some((date, symbol, account_id, content, tags, updated_at)) = row else {
            return Ok(None);
        };
        let tags: Vec<String> =
            serde_json::from_str(&tags).map_err(|e| JournalError::DatabaseQuery {
                reason: format!("corrupt tags for {date} {symbol}: {e}"),
            })?;

        Ok(Some(TradeNote {
            date,
            symbol,
            account_id,
            content,
            tags,
            updated_at,
        }))
    }
}
