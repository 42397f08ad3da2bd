//! CLI integration tests with real INI and CSV files on disk.
//!
//! Tests cover:
//! - Config parsing and validation (load_config, validate_all, build_* helpers)
//! - The backtest pipeline through the CSV loader and CSV report adapter
//! - Subcommand dispatch and exit codes

mod common;

use clap::Parser;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use stochtrader::adapters::csv_adapter::CsvSeriesLoader;
use stochtrader::adapters::csv_report_adapter::CsvReportAdapter;
use stochtrader::cli::{self, Cli};
use stochtrader::domain::config_validation::validate_all;
use stochtrader::domain::error::StochtraderError;
use stochtrader::domain::num::Num;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Writes an ascending daily CSV in the loader's format.
fn write_ticks_csv(dir: &Path, closes: &[i64]) -> std::path::PathBuf {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        let date = common::day(i as i64).format("%Y-%m-%d");
        writeln!(
            content,
            "{},{},{},{},{},1000",
            date,
            close,
            close + 1,
            close - 1,
            close
        )
        .unwrap();
    }
    let path = dir.join("ticks.csv");
    fs::write(&path, content).unwrap();
    path
}

fn same_code(a: ExitCode, b: ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}

mod config_parsing {
    use super::*;

    #[test]
    fn full_config_round_trips_into_params() {
        let ini = write_temp_ini(
            r#"
[data]
path = ticks.csv
name = ASML

[stochastic]
lookback = 28
d_smoothing = 3
d2_smoothing = 2

[strategy]
name = SO D/D2
unstable_period = 50

[backtest]
amount = 2.5
force_close = true
"#,
        );
        let config = cli::load_config(ini.path()).unwrap();
        validate_all(&config).unwrap();

        let params = cli::build_strategy_params(&config);
        assert_eq!(params.name, "SO D/D2");
        assert_eq!(params.stochastic.lookback, 28);
        assert_eq!(params.stochastic.d2_smoothing, 2);
        assert_eq!(params.unstable_period, 50);

        let bt = cli::build_backtest_config(&config);
        assert_eq!(bt.amount, Num::from(5) / Num::from(2));
        assert!(bt.force_close);
    }

    #[test]
    fn defaults_apply_when_sections_missing() {
        let ini = write_temp_ini("[data]\npath = ticks.csv\n");
        let config = cli::load_config(ini.path()).unwrap();
        let params = cli::build_strategy_params(&config);
        assert_eq!(params.stochastic.lookback, 14);
        assert_eq!(params.stochastic.d_smoothing, 3);
        assert_eq!(params.stochastic.d2_smoothing, 3);
        assert_eq!(params.unstable_period, 0);
        assert_eq!(cli::build_backtest_config(&config).amount, Num::ONE);
    }

    #[test]
    fn invalid_lookback_rejected_before_run() {
        let ini = write_temp_ini("[data]\npath = ticks.csv\n[stochastic]\nlookback = 0\n");
        let config = cli::load_config(ini.path()).unwrap();
        assert!(matches!(
            validate_all(&config),
            Err(StochtraderError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        assert!(matches!(
            cli::load_config(Path::new("/nonexistent/run.ini")),
            Err(StochtraderError::ConfigParse { .. })
        ));
    }
}

mod csv_pipeline {
    use super::*;

    #[test]
    fn writes_indicator_trade_and_summary_files() {
        let dir = TempDir::new().unwrap();
        let closes = common::oscillating_closes(60);
        let data = write_ticks_csv(dir.path(), &closes);
        let out = dir.path().join("out");
        let ini = format!(
            "[data]\npath = {}\n[strategy]\nunstable_period = 10\n\
             [report]\nindicators = {}\ntrades = {}\nsummary = {}\n",
            data.display(),
            out.join("so.csv").display(),
            out.join("trades.csv").display(),
            out.join("summary.csv").display(),
        );
        let config = stochtrader::adapters::file_config_adapter::FileConfigAdapter::from_string(
            &ini,
        )
        .unwrap();

        let loader = CsvSeriesLoader::new(data);
        let outcome =
            cli::run_backtest_pipeline(&loader, &CsvReportAdapter::new(), &config, "OSC").unwrap();
        assert_eq!(outcome.series.len(), closes.len());

        let indicators = fs::read_to_string(out.join("so.csv")).unwrap();
        assert_eq!(indicators.lines().next(), Some("timestamp,close,k,d,d2"));
        assert_eq!(indicators.lines().count(), closes.len() + 1);

        let trades = fs::read_to_string(out.join("trades.csv")).unwrap();
        let open = usize::from(outcome.summary.open_trade);
        assert_eq!(
            trades.lines().count(),
            1 + outcome.summary.trade_count + open
        );

        let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
        assert!(summary.starts_with("criterion,value\n"));
        assert!(summary.contains("Total profit,"));
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn info_succeeds_on_valid_file() {
        let dir = TempDir::new().unwrap();
        let data = write_ticks_csv(dir.path(), &[10, 11, 12]);
        let cli = Cli::try_parse_from(["stochtrader", "info", "--data", data.to_str().unwrap()])
            .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));
    }

    #[test]
    fn indicators_command_writes_output() {
        let dir = TempDir::new().unwrap();
        let data = write_ticks_csv(dir.path(), &[10, 11, 12, 11, 10]);
        let output = dir.path().join("so.csv");
        let cli = Cli::try_parse_from([
            "stochtrader",
            "indicators",
            "--data",
            data.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--lookback",
            "3",
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));
        assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 6);
    }

    #[test]
    fn malformed_data_exits_with_load_code() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("bad.csv");
        fs::write(&data, "date,open,high,low,close,volume\nnot-a-date,1,2,1,2,10\n").unwrap();
        let cli = Cli::try_parse_from(["stochtrader", "info", "--data", data.to_str().unwrap()])
            .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::from(3)));
    }

    #[test]
    fn validate_reports_config_errors() {
        let ini = write_temp_ini("[data]\nname = X\n");
        let cli = Cli::try_parse_from([
            "stochtrader",
            "validate",
            "--config",
            ini.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::from(2)));
    }

    #[test]
    fn zero_lookback_exits_with_parameter_code() {
        let dir = TempDir::new().unwrap();
        let data = write_ticks_csv(dir.path(), &[10, 11]);
        let output = dir.path().join("so.csv");
        let cli = Cli::try_parse_from([
            "stochtrader",
            "indicators",
            "--data",
            data.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--lookback",
            "0",
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::from(4)));
    }

    #[test]
    fn backtest_command_end_to_end() {
        let dir = TempDir::new().unwrap();
        let data = write_ticks_csv(dir.path(), &common::oscillating_closes(40));
        let trades = dir.path().join("trades.csv");
        let ini = write_temp_ini(&format!(
            "[data]\npath = {}\n[backtest]\nforce_close = true\n[report]\ntrades = {}\n",
            data.display(),
            trades.display()
        ));
        let cli = Cli::try_parse_from([
            "stochtrader",
            "backtest",
            "--config",
            ini.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));
        assert!(trades.exists());
    }
}
