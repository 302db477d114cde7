//! Pipe-delimited broker statement (`.tlg`) parser.
//!
//! Only three record kinds are read:
//!
//! ```text
//! ACT_INF|accountId|name|type|address
//! STK_TRD|tradeId|symbol|company|exchanges|side|orderType|date|time|currency|qty|mult|price|total|commission|feeMult
//! STK_LOT|accountId|symbol|company|currency|date|time|qty|mult|avgPrice|total|feeMult
//! ```
//!
//! Every other line is ignored. Numeric cells that do not parse become NaN.

use crate::domain::account::{Account, OpenLot};
use crate::domain::error::JournalError;
use crate::domain::execution::{Execution, ExecutionSide, UnknownSide};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct TlgStatement {
    pub account: Account,
    pub executions: Vec<Execution>,
    pub lots: Vec<OpenLot>,
}

pub fn read_statement(path: &Path, imported_at: i64) -> Result<TlgStatement, JournalError> {
    let content = fs::read_to_string(path).map_err(|e| JournalError::Import {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_statement(&content, imported_at)
}

/// Parses statement text. `imported_at` stamps the account record.
///
/// Trade rows take the account id of the most recent `ACT_INF` line above
/// them, or an empty id if none has been seen yet.
pub fn parse_statement(content: &str, imported_at: i64) -> Result<TlgStatement, JournalError> {
    let mut account: Option<Account> = None;
    let mut executions = Vec::new();
    let mut lots = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let line_no = idx + 1;

        if line.starts_with("ACT_INF|") {
            let parts: Vec<&str> = line.split('|').collect();
            account = Some(Account {
                account_id: cell(&parts, 1).to_string(),
                name: cell(&parts, 2).to_string(),
                account_type: cell(&parts, 3).to_string(),
                address: cell(&parts, 4).to_string(),
                imported_at,
            });
        } else if line.starts_with("STK_TRD|") {
            let parts: Vec<&str> = line.split('|').collect();
            let side: ExecutionSide = cell(&parts, 5).parse().map_err(|e: UnknownSide| {
                JournalError::Import {
                    reason: format!("line {}: {}", line_no, e),
                }
            })?;
            executions.push(Execution {
                trade_id: cell(&parts, 1).to_string(),
                account_id: account
                    .as_ref()
                    .map(|a| a.account_id.clone())
                    .unwrap_or_default(),
                symbol: cell(&parts, 2).to_string(),
                company_name: cell(&parts, 3).to_string(),
                exchanges: cell(&parts, 4).to_string(),
                side,
                order_type: cell(&parts, 6).to_string(),
                date: cell(&parts, 7).to_string(),
                time: cell(&parts, 8).to_string(),
                currency: cell(&parts, 9).to_string(),
                quantity: number(&parts, 10),
                multiplier: number(&parts, 11),
                price: number(&parts, 12),
                total_value: number(&parts, 13),
                commission: number(&parts, 14),
                fee_multiplier: number(&parts, 15),
            });
        } else if line.starts_with("STK_LOT|") {
            let parts: Vec<&str> = line.split('|').collect();
            lots.push(OpenLot {
                account_id: cell(&parts, 1).to_string(),
                symbol: cell(&parts, 2).to_string(),
                company_name: cell(&parts, 3).to_string(),
                currency: cell(&parts, 4).to_string(),
                date: cell(&parts, 5).to_string(),
                time: cell(&parts, 6).to_string(),
                quantity: number(&parts, 7),
                multiplier: number(&parts, 8),
                avg_price: number(&parts, 9),
                total_value: number(&parts, 10),
                fee_multiplier: number(&parts, 11),
            });
        }
    }

    let account = account.ok_or_else(|| JournalError::Import {
        reason: "no account information found in statement".into(),
    })?;

    tracing::debug!(
        account = %account.account_id,
        executions = executions.len(),
        lots = lots.len(),
        "parsed statement"
    );

    Ok(TlgStatement {
        account,
        executions,
        lots,
    })
}

fn cell<'a>(parts: &[&'a str], i: usize) -> &'a str {
    parts.get(i).copied().unwrap_or("")
}

fn number(parts: &[&str], i: usize) -> f64 {
    cell(parts, i).trim().parse().unwrap_or(f64::NAN)
}
