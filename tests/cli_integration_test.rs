//! CLI command orchestration against real files and a SQLite store on disk.

#![cfg(feature = "sqlite")]

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tempfile::TempDir;
use tradediary::adapters::file_config_adapter::FileConfigAdapter;
use tradediary::adapters::sqlite_store::SqliteStore;
use tradediary::cli::{self, Cli};
use tradediary::ports::store_port::JournalStore;

const STATEMENT: &str = "\
ACT_INF|U7|Sam Trader|Individual|
STK_TRD|1|AAPL|APPLE INC|NASDAQ|BUYTOOPEN|LMT|20240105|09:30:00|USD|100|1|10|1000|-1|1
STK_TRD|2|AAPL|APPLE INC|NASDAQ|SELLTOCLOSE|LMT|20240105|09:45:00|USD|-100|1|12|-1200|-1|1
STK_LOT|U7|MSFT|MICROSOFT CORP|USD|20240105|15:00:00|20|1|370|7400|1
";

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("journal.db");
        let config = dir.path().join("tradediary.ini");
        fs::write(
            &config,
            format!(
                "[storage]\npath = {}\n\n[import]\naccount_id = U7\n\n[logging]\nfilter = warn\nansi = false\n",
                db.display()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> ExitCode {
        let mut argv = vec!["tradediary"];
        argv.extend_from_slice(args);
        cli::run(Cli::try_parse_from(argv).unwrap())
    }

    fn store(&self) -> SqliteStore {
        let config = FileConfigAdapter::from_file(&self.config).unwrap();
        let store = SqliteStore::from_config(&config).unwrap();
        store.initialize_schema().unwrap();
        store
    }

    fn config_str(&self) -> &str {
        self.config.to_str().unwrap()
    }
}

// ExitCode has no PartialEq; compare the Debug form.
fn assert_exit(actual: ExitCode, expected: ExitCode) {
    assert_eq!(format!("{actual:?}"), format!("{expected:?}"));
}

mod import {
    use super::*;

    #[test]
    fn statement_import_persists_executions_and_lots() {
        let ws = Workspace::new();
        let tlg = ws.file("U7.tlg", STATEMENT);

        let code = ws.run(&["import", "-c", ws.config_str(), "-f", tlg.to_str().unwrap()]);
        assert_exit(code, ExitCode::SUCCESS);

        let store = ws.store();
        assert_eq!(store.execution_count().unwrap(), 2);
        assert_eq!(store.open_lots("U7").unwrap().len(), 1);
    }

    #[test]
    fn csv_import_uses_configured_account() {
        let ws = Workspace::new();
        let csv = ws.file(
            "fills.csv",
            "Date,Symbol,Side,Quantity,Price\n20240105,AMD,BUY,10,100\n20240105,AMD,SELL,10,101\n",
        );

        let code = ws.run(&["import", "-c", ws.config_str(), "-f", csv.to_str().unwrap()]);
        assert_exit(code, ExitCode::SUCCESS);

        let execs = ws.store().all_executions().unwrap();
        assert_eq!(execs.len(), 2);
        assert!(execs.iter().all(|e| e.account_id == "U7"));
    }

    #[test]
    fn missing_import_file_is_import_error() {
        let ws = Workspace::new();
        let code = ws.run(&["import", "-c", ws.config_str(), "-f", "/nonexistent/U7.tlg"]);
        assert_exit(code, ExitCode::from(4));
    }

    #[test]
    fn unmappable_csv_is_mapping_error() {
        let ws = Workspace::new();
        let csv = ws.file("odd.csv", "Foo,Bar\n1,2\n");
        let code = ws.run(&["import", "-c", ws.config_str(), "-f", csv.to_str().unwrap()]);
        assert_exit(code, ExitCode::from(4));
        assert_eq!(ws.store().execution_count().unwrap(), 0);
    }
}

mod reporting {
    use super::*;

    #[test]
    fn journal_and_dashboard_succeed_on_empty_store() {
        let ws = Workspace::new();
        assert_exit(ws.run(&["journal", "-c", ws.config_str()]), ExitCode::SUCCESS);
        assert_exit(
            ws.run(&["dashboard", "-c", ws.config_str(), "--json"]),
            ExitCode::SUCCESS,
        );
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let code = cli::run(
            Cli::try_parse_from(["tradediary", "journal", "-c", "/nonexistent/tradediary.ini"])
                .unwrap(),
        );
        assert_exit(code, ExitCode::from(2));
    }

    #[test]
    fn config_without_storage_path_is_config_error() {
        let ws = Workspace::new();
        let bare = ws.file("bare.ini", "[logging]\nfilter = warn\n");
        let code = ws.run(&["journal", "-c", bare.to_str().unwrap()]);
        assert_exit(code, ExitCode::from(2));
    }

    #[test]
    fn map_columns_works_without_config() {
        let ws = Workspace::new();
        let csv = ws.file("fills.csv", "Ticker,Action,Trade Date,Qty,Price\nAAPL,B,2024-01-05,1,1\n");
        let code = ws.run(&["map-columns", "-f", csv.to_str().unwrap()]);
        assert_exit(code, ExitCode::SUCCESS);
    }
}

mod notes_and_clear {
    use super::*;

    #[test]
    fn daily_and_trade_notes_are_saved() {
        let ws = Workspace::new();
        let cfg = ws.config_str();

        assert_exit(
            ws.run(&["note", "-c", cfg, "-d", "20240105", "--text", "Slept badly"]),
            ExitCode::SUCCESS,
        );
        assert_exit(
            ws.run(&[
                "note",
                "-c",
                cfg,
                "-d",
                "20240105",
                "-s",
                "AAPL",
                "--tags",
                "breakout, a+",
                "--text",
                "Held to target",
            ]),
            ExitCode::SUCCESS,
        );
        assert_exit(
            ws.run(&["note", "-c", cfg, "-d", "20240105", "-s", "AAPL"]),
            ExitCode::SUCCESS,
        );

        let store = ws.store();
        let daily = store.daily_note("20240105", "U7").unwrap().unwrap();
        assert_eq!(daily.content, "Slept badly");
        let trade = store.trade_note("20240105", "AAPL", "U7").unwrap().unwrap();
        assert_eq!(trade.tags, vec!["breakout", "a+"]);
    }

    #[test]
    fn clear_removes_everything() {
        let ws = Workspace::new();
        let tlg = ws.file("U7.tlg", STATEMENT);
        ws.run(&["import", "-c", ws.config_str(), "-f", tlg.to_str().unwrap()]);
        ws.run(&["note", "-c", ws.config_str(), "-d", "20240105", "--text", "x"]);

        assert_exit(ws.run(&["clear", "-c", ws.config_str()]), ExitCode::SUCCESS);

        let store = ws.store();
        assert_eq!(store.execution_count().unwrap(), 0);
        assert!(store.open_lots("U7").unwrap().is_empty());
        assert!(store.daily_note("20240105", "U7").unwrap().is_none());
    }

    #[test]
    fn positions_lists_lots() {
        let ws = Workspace::new();
        let tlg = ws.file("U7.tlg", STATEMENT);
        ws.run(&["import", "-c", ws.config_str(), "-f", tlg.to_str().unwrap()]);
        assert_exit(
            ws.run(&["positions", "-c", ws.config_str()]),
            ExitCode::SUCCESS,
        );
    }
}
