//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mapping::{select_mapper, SAMPLE_ROWS};
use crate::adapters::tlg_adapter;
use crate::domain::account::{Account, OpenLot};
use crate::domain::config_validation::validate_journal_config;
use crate::domain::dashboard::DashboardData;
use crate::domain::error::JournalError;
use crate::domain::execution::Execution;
use crate::domain::format::{format_currency, format_pnl, format_time_12h, format_volume};
use crate::domain::import::{normalize_rows, to_execution, ExtractedTable, Field, MappingResult};
use crate::domain::journal::Journal;
use crate::domain::notes::{parse_tags, DailyNote, TradeNote};
use crate::domain::trade::TradeSide;
use crate::ports::config_port::ConfigPort;
use crate::ports::mapper_port::ColumnMapper;
use crate::ports::store_port::JournalStore;

pub const DEFAULT_ACCOUNT_ID: &str = "manual";

#[derive(Parser, Debug)]
#[command(name = "tradediary", about = "Trading journal and performance analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    Tlg,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a broker statement or CSV export
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        file: PathBuf,
        /// Inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<ImportFormat>,
        /// Account id for CSV imports
        #[arg(long)]
        account: Option<String>,
    },
    /// Print daily summaries, newest day first
    Journal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print dashboard statistics
    Dashboard {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show the detected column mapping for a CSV file
    MapColumns {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Read or write a daily or per-trade note
    Note {
        #[arg(short, long)]
        config: PathBuf,
        /// Trade date, YYYYMMDD
        #[arg(short, long)]
        date: String,
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(long)]
        account: Option<String>,
        /// Comma-separated, trade notes only
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// List open lots from the last statement import
    Positions {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        account: Option<String>,
    },
    /// Delete all stored data
    Clear {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Import {
            config,
            file,
            format,
            account,
        } => run_import(&config, &file, format, account.as_deref()),
        Command::Journal { config, json } => run_journal(&config, json),
        Command::Dashboard { config, json } => run_dashboard(&config, json),
        Command::MapColumns { file, config } => run_map_columns(&file, config.as_deref()),
        Command::Note {
            config,
            date,
            symbol,
            account,
            tags,
            text,
        } => run_note(
            &config,
            &date,
            symbol.as_deref(),
            account.as_deref(),
            tags.as_deref(),
            text.as_deref(),
        ),
        Command::Positions { config, account } => run_positions(&config, account.as_deref()),
        Command::Clear { config } => run_clear(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Loads the INI file at `path` and installs the log subscriber.
pub fn load_config(path: &Path) -> Result<FileConfigAdapter, JournalError> {
    let config = FileConfigAdapter::from_file(path)?;
    init_logging(Some(&config));
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// `RUST_LOG` wins, then `[logging] filter`, then `info`. Logs go to stderr,
/// colored unless `[logging] ansi = false`.
pub fn init_logging(config: Option<&dyn ConfigPort>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = config
            .and_then(|c| c.get_non_empty("logging", "filter"))
            .unwrap_or_else(|| "info".to_string());
        tracing_subscriber::EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });

    let ansi = config.is_none_or(|c| c.get_bool("logging", "ansi", true));

    // A subscriber may already be installed (tests, repeated loads).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(feature = "sqlite")]
pub fn open_store(config: &dyn ConfigPort) -> Result<Box<dyn JournalStore>, JournalError> {
    use crate::adapters::sqlite_store::SqliteStore;

    validate_journal_config(config)?;
    let store = SqliteStore::from_config(config)?;
    store.initialize_schema()?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
pub fn open_store(config: &dyn ConfigPort) -> Result<Box<dyn JournalStore>, JournalError> {
    validate_journal_config(config)?;
    Err(JournalError::Database {
        reason: "built without the sqlite feature".into(),
    })
}

/// Explicit `--account`, then `[import] account_id`, then `manual`.
pub fn resolve_account(explicit: Option<&str>, config: &dyn ConfigPort) -> String {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| config.get_non_empty("import", "account_id"))
        .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string())
}

/// Explicit format, else `.tlg` → statement and `.csv`/`.txt` → CSV.
pub fn resolve_format(
    path: &Path,
    explicit: Option<ImportFormat>,
) -> Result<ImportFormat, JournalError> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("tlg") => Ok(ImportFormat::Tlg),
        Some("csv") | Some("txt") => Ok(ImportFormat::Csv),
        _ => Err(JournalError::Import {
            reason: format!(
                "cannot infer format of {}, pass --format",
                path.display()
            ),
        }),
    }
}

/// Maps, validates and converts an extracted CSV table.
///
/// Returns the executions and the number of rows skipped for a missing or
/// unreadable required field. `imported_at` stamps ids generated for rows
/// without an order id.
pub fn csv_executions(
    table: &ExtractedTable,
    mapper: &dyn ColumnMapper,
    account_id: &str,
    imported_at: i64,
) -> Result<(Vec<Execution>, usize), JournalError> {
    if table.headers.is_empty() || table.rows.is_empty() {
        return Err(JournalError::Import {
            reason: "no data found".into(),
        });
    }

    let sample = &table.rows[..table.rows.len().min(SAMPLE_ROWS)];
    let MappingResult {
        mapping,
        side_values,
    } = mapper.map_columns(&table.headers, sample)?;

    let missing = mapping.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        return Err(JournalError::Mapping {
            reason: format!("no column found for {}", names.join(", ")),
        });
    }

    let normalized = normalize_rows(table, &mapping, &side_values);
    let executions = normalized
        .transactions
        .iter()
        .enumerate()
        .map(|(i, n)| to_execution(n, account_id, imported_at, i))
        .collect();
    Ok((executions, normalized.skipped))
}

fn run_import(
    config_path: &Path,
    file: &Path,
    format: Option<ImportFormat>,
    account: Option<&str>,
) -> Result<(), JournalError> {
    let config = load_config(config_path)?;
    let format = resolve_format(file, format)?;
    let store = open_store(&config)?;
    let now = Utc::now().timestamp_millis();

    match format {
        ImportFormat::Tlg => {
            tracing::info!(file = %file.display(), "importing statement");
            let statement = tlg_adapter::read_statement(file, now)?;
            store.import_data(&statement.account, &statement.executions, &statement.lots)?;
            println!(
                "Imported {} executions and {} open lots for account {}",
                statement.executions.len(),
                statement.lots.len(),
                statement.account.account_id
            );
        }
        ImportFormat::Csv => {
            tracing::info!(file = %file.display(), "importing CSV");
            let account_id = resolve_account(account, &config);
            let table = csv_adapter::read_table(file)?;
            let mapper = select_mapper(&config)?;
            let (executions, skipped) = csv_executions(&table, mapper.as_ref(), &account_id, now)?;
            if skipped > 0 {
                tracing::warn!(skipped, "rows missing required fields were skipped");
            }
            let account = Account {
                account_id: account_id.clone(),
                name: format!("CSV import {}", Local::now().format("%Y-%m-%d")),
                account_type: "csv".into(),
                address: String::new(),
                imported_at: now,
            };
            store.import_data(&account, &executions, &[])?;
            println!(
                "Imported {} executions for account {} ({} rows skipped)",
                executions.len(),
                account_id,
                skipped
            );
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JournalError> {
    serde_json::to_string_pretty(value).map_err(|e| JournalError::Io(std::io::Error::other(e)))
}

fn run_journal(config_path: &Path, json: bool) -> Result<(), JournalError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let journal = Journal::load(store.as_ref(), today())?;

    if json {
        println!("{}", to_json(&journal.summaries)?);
    } else if journal.summaries.is_empty() {
        eprintln!("No trades recorded");
    } else {
        print!("{}", render_journal(&journal));
    }
    Ok(())
}

fn run_dashboard(config_path: &Path, json: bool) -> Result<(), JournalError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let journal = Journal::load(store.as_ref(), today())?;

    if json {
        println!("{}", to_json(&journal.dashboard)?);
    } else {
        print!("{}", render_dashboard(&journal.dashboard));
    }
    Ok(())
}

fn run_map_columns(file: &Path, config_path: Option<&Path>) -> Result<(), JournalError> {
    let config = match config_path {
        Some(p) => load_config(p)?,
        None => {
            init_logging(None);
            FileConfigAdapter::empty()
        }
    };

    let table = csv_adapter::read_table(file)?;
    let mapper = select_mapper(&config)?;
    let sample = &table.rows[..table.rows.len().min(SAMPLE_ROWS)];
    let result = mapper.map_columns(&table.headers, sample)?;

    for field in Field::ALL {
        let header = result.mapping.get(field).unwrap_or("-");
        println!("{:<12} {}", field.name(), header);
    }
    let mut side_values: Vec<_> = result.side_values.iter().collect();
    side_values.sort_by(|a, b| a.0.cmp(b.0));
    for (raw, action) in side_values {
        println!("side value   {raw} => {action:?}");
    }

    let missing = result.mapping.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        eprintln!("missing required columns: {}", names.join(", "));
    }
    Ok(())
}

fn run_note(
    config_path: &Path,
    date: &str,
    symbol: Option<&str>,
    account: Option<&str>,
    tags: Option<&str>,
    text: Option<&str>,
) -> Result<(), JournalError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let account_id = resolve_account(account, &config);
    let now = Utc::now().timestamp_millis();

    match (symbol, text) {
        (Some(symbol), Some(text)) => {
            store.put_trade_note(&TradeNote {
                date: date.to_string(),
                symbol: symbol.to_string(),
                account_id,
                content: text.to_string(),
                tags: tags.map(parse_tags).unwrap_or_default(),
                updated_at: now,
            })?;
            tracing::info!(date, symbol, "saved trade note");
        }
        (Some(symbol), None) => match store.trade_note(date, symbol, &account_id)? {
            Some(note) => {
                if !note.tags.is_empty() {
                    println!("[{}]", note.tags.join(", "));
                }
                println!("{}", note.content);
            }
            None => eprintln!("No note for {symbol} on {date}"),
        },
        (None, Some(text)) => {
            store.put_daily_note(&DailyNote {
                date: date.to_string(),
                account_id,
                content: text.to_string(),
                updated_at: now,
            })?;
            tracing::info!(date, "saved daily note");
        }
        (None, None) => match store.daily_note(date, &account_id)? {
            Some(note) => println!("{}", note.content),
            None => eprintln!("No note for {date}"),
        },
    }
    Ok(())
}

fn run_positions(config_path: &Path, account: Option<&str>) -> Result<(), JournalError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let account_id = resolve_account(account, &config);
    let lots = store.open_lots(&account_id)?;

    if lots.is_empty() {
        eprintln!("No open lots for account {account_id}");
    }
    for lot in &lots {
        println!("{}", render_lot(lot));
    }
    Ok(())
}

fn run_clear(config_path: &Path) -> Result<(), JournalError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let before = store.execution_count()?;
    store.clear_all()?;
    println!("Deleted {before} executions and all notes");
    Ok(())
}

fn side_label(side: TradeSide) -> &'static str {
    match side {
        TradeSide::Long => "LONG",
        TradeSide::Short => "SHORT",
    }
}

/// Plain-text journal: one header line per day, one line per trade.
pub fn render_journal(journal: &Journal) -> String {
    let mut out = String::new();
    for day in &journal.summaries {
        let _ = writeln!(
            out,
            "{}  net {}  gross {}  fees {}  trades {}  win {:.0}%  vol {}",
            day.formatted_date,
            format_pnl(day.net_pnl),
            format_pnl(day.gross_pnl),
            format_currency(day.total_commissions),
            day.total_trades,
            day.win_rate,
            format_volume(day.total_volume),
        );
        for trade in &day.trades {
            let status = if trade.is_open { "open" } else { "closed" };
            let _ = writeln!(
                out,
                "  {:>8}  {:<8} {:<5} {:<6} {:>8}  {:>12}  {} fills, {:.0}m",
                format_time_12h(&trade.first_trade_time),
                trade.symbol,
                side_label(trade.side),
                status,
                format_volume(trade.volume),
                format_pnl(trade.net_pnl),
                trade.execution_count(),
                trade.hold_minutes(),
            );
        }
    }
    out
}

/// Plain-text dashboard: week strip, win/loss stats and the P&L curve.
pub fn render_dashboard(data: &DashboardData) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Week");
    for day in &data.calendar {
        let pnl = if day.has_data {
            format!("{} ({} trades)", format_pnl(day.pnl), day.trade_count)
        } else {
            "-".to_string()
        };
        let _ = writeln!(out, "  {} {:>2}  {}", day.day_name, day.day_num, pnl);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Wins          {}", data.total_wins);
    let _ = writeln!(out, "Losses        {}", data.total_losses);
    let _ = writeln!(out, "Avg win       {}", format_pnl(data.avg_win));
    let _ = writeln!(out, "Avg loss      {}", format_pnl(data.avg_loss));
    let _ = writeln!(out, "Largest gain  {}", format_pnl(data.largest_gain));
    let _ = writeln!(out, "Largest loss  {}", format_pnl(data.largest_loss));
    let _ = writeln!(out, "Win hold      {:.0}m", data.avg_win_hold_minutes);
    let _ = writeln!(out, "Loss hold     {:.0}m", data.avg_loss_hold_minutes);

    if !data.cumulative_pnl.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Cumulative P&L");
        for point in &data.cumulative_pnl {
            let _ = writeln!(out, "  {:<10} {}", point.label, format_pnl(point.value));
        }
    }
    out
}

fn render_lot(lot: &OpenLot) -> String {
    let direction = if lot.is_short() { "SHORT" } else { "LONG" };
    format!(
        "{:<8} {:<5} {:>8} @ {}  {}  since {}",
        lot.symbol,
        direction,
        format_volume(lot.quantity.abs()),
        format_currency(lot.avg_price),
        lot.currency,
        lot.date
    )
}
