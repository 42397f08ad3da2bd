//! CLI definition and dispatch.
//!
//! Every subcommand reads its inputs through the ports, hands them to the
//! engine and prints results to stderr. No engine behaviour lives here.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use crate::adapters::csv_adapter::CsvSeriesLoader;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::config_validation::validate_all;
use crate::domain::criteria::CriteriaSummary;
use crate::domain::error::StochtraderError;
use crate::domain::indicator::stochastic::{DEFAULT_LOOKBACK, DEFAULT_SMOOTHING};
use crate::domain::indicator::{StochasticBundle, StochasticParams};
use crate::domain::num::Num;
use crate::domain::series::TimeSeries;
use crate::domain::strategy::{build_stochastic_strategy, StochasticStrategyParams, Strategy};
use crate::domain::trading_record::TradingRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::SeriesLoader;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "stochtrader",
    about = "Stochastic oscillator indicators and backtests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the %D / %D2 crossover backtest described by a config file
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write close, %K, %D and %D2 for every tick to a CSV file
    Indicators {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_LOOKBACK)]
        lookback: usize,
        #[arg(long, default_value_t = DEFAULT_SMOOTHING)]
        d_smoothing: usize,
        #[arg(long, default_value_t = DEFAULT_SMOOTHING)]
        d2_smoothing: usize,
    },
    /// Show the name, length and period of a tick file
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Validate a config file without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest { config } => run_backtest_command(&config),
        Command::Indicators {
            data,
            output,
            lookback,
            d_smoothing,
            d2_smoothing,
        } => run_indicators(
            &data,
            &output,
            StochasticParams {
                lookback,
                d_smoothing,
                d2_smoothing,
            },
        ),
        Command::Info { data } => run_info(&data),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StochtraderError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Series name for a data file: its stem, or "series".
pub fn series_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string())
}

pub fn build_stochastic_params(config: &dyn ConfigPort) -> StochasticParams {
    StochasticParams {
        lookback: config.get_usize("stochastic", "lookback", DEFAULT_LOOKBACK),
        d_smoothing: config.get_usize("stochastic", "d_smoothing", DEFAULT_SMOOTHING),
        d2_smoothing: config.get_usize("stochastic", "d2_smoothing", DEFAULT_SMOOTHING),
    }
}

pub fn build_strategy_params(config: &dyn ConfigPort) -> StochasticStrategyParams {
    let defaults = StochasticStrategyParams::default();
    StochasticStrategyParams {
        name: config.get_string("strategy", "name").unwrap_or(defaults.name),
        stochastic: build_stochastic_params(config),
        unstable_period: config.get_usize("strategy", "unstable_period", defaults.unstable_period),
    }
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        amount: config.get_num("backtest", "amount", defaults.amount),
        force_close: config.get_bool("backtest", "force_close", defaults.force_close),
    }
}

/// Everything a backtest run produced.
#[derive(Debug)]
pub struct BacktestOutcome {
    pub series: Rc<TimeSeries>,
    pub strategy: Strategy,
    pub record: TradingRecord,
    pub summary: CriteriaSummary,
}

/// Load, build, run, measure and write the configured reports.
pub fn run_backtest_pipeline(
    loader: &dyn SeriesLoader,
    reporter: &dyn ReportPort,
    config: &dyn ConfigPort,
    name: &str,
) -> Result<BacktestOutcome, StochtraderError> {
    let series = Rc::new(loader.load_series(name)?);
    let params = build_strategy_params(config);
    let strategy = build_stochastic_strategy(series.clone(), &params)?;
    let bt_config = build_backtest_config(config);

    let record = run_backtest(&series, &strategy, &bt_config)?;
    let summary = CriteriaSummary::compute(&series, &record)?;

    if let Some(path) = report_path(config, "indicators") {
        let rows = StochasticBundle::new(series.clone(), params.stochastic)?.rows()?;
        reporter.write_indicators(&rows, &path)?;
        eprintln!("Indicators written to: {}", path.display());
    }
    if let Some(path) = report_path(config, "trades") {
        reporter.write_trades(&record, &path)?;
        eprintln!("Trades written to: {}", path.display());
    }
    if let Some(path) = report_path(config, "summary") {
        reporter.write_summary(&summary, &path)?;
        eprintln!("Summary written to: {}", path.display());
    }

    Ok(BacktestOutcome {
        series,
        strategy,
        record,
        summary,
    })
}

fn report_path(config: &dyn ConfigPort, key: &str) -> Option<PathBuf> {
    config
        .get_string("report", key)
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn run_backtest_command(config_path: &Path) -> Result<(), StochtraderError> {
    let config = load_config(config_path)?;
    validate_all(&config)?;

    let data_path = PathBuf::from(config.get_string("data", "path").unwrap_or_default());
    let name = config
        .get_string("data", "name")
        .unwrap_or_else(|| series_name(&data_path));
    let loader = CsvSeriesLoader::new(data_path);

    let outcome = run_backtest_pipeline(&loader, &CsvReportAdapter::new(), &config, &name)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &BacktestOutcome) {
    let s = &outcome.summary;
    eprintln!("\n=== {} ===", outcome.strategy.name);
    eprintln!("Series:           {}", outcome.series.name());
    eprintln!("Period:           {}", outcome.series.period_description());
    eprintln!("Unstable period:  {}", outcome.strategy.unstable_period);
    eprintln!("Trades:           {}", s.trade_count);
    if s.open_trade {
        eprintln!("Open trade:       yes (not counted)");
    }
    eprintln!("Total profit:     {}", fmt_ratio(s.total_profit));
    eprintln!("Average profit:   {}", fmt_ratio(s.average_profit));
    eprintln!("Buy and hold:     {}", fmt_ratio(s.buy_and_hold));
    eprintln!("Vs buy and hold:  {}", fmt_ratio(s.versus_buy_and_hold));
    eprintln!("Winning trades:   {}", fmt_ratio(s.winning_trades_ratio));
}

fn fmt_ratio(value: Num) -> String {
    match value.decimal() {
        Some(d) => d.round_dp(4).normalize().to_string(),
        None => "NaN".to_string(),
    }
}

fn run_indicators(
    data: &Path,
    output: &Path,
    params: StochasticParams,
) -> Result<(), StochtraderError> {
    let series = Rc::new(CsvSeriesLoader::new(data.to_path_buf()).load_series(&series_name(data))?);
    let rows = StochasticBundle::new(series, params)?.rows()?;
    CsvReportAdapter::new().write_indicators(&rows, output)?;
    eprintln!("{} rows written to: {}", rows.len(), output.display());
    Ok(())
}

fn run_info(data: &Path) -> Result<(), StochtraderError> {
    let series = CsvSeriesLoader::new(data.to_path_buf()).load_series(&series_name(data))?;
    eprintln!("Series:  {}", series.name());
    eprintln!("Ticks:   {}", series.len());
    eprintln!("Period:  {}", series.period_description());
    if let (Some(first), Some(last)) = (series.first_tick(), series.last_tick()) {
        eprintln!("Close:   {} -> {}", first.close, last.close);
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StochtraderError> {
    let config = load_config(config_path)?;
    validate_all(&config)?;

    let params = build_strategy_params(&config);
    let bt_config = build_backtest_config(&config);
    eprintln!("\nStrategy:         {}", params.name);
    eprintln!(
        "Stochastic:       %K({}) %D({}) %D2({})",
        params.stochastic.lookback, params.stochastic.d_smoothing, params.stochastic.d2_smoothing
    );
    eprintln!("Unstable period:  {}", params.unstable_period);
    eprintln!("Amount:           {}", bt_config.amount);
    eprintln!("Force close:      {}", bt_config.force_close);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_indicators_defaults() {
        let cli = Cli::try_parse_from([
            "stochtrader",
            "indicators",
            "--data",
            "asml.csv",
            "--output",
            "so.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Indicators {
                lookback,
                d_smoothing,
                d2_smoothing,
                ..
            } => {
                assert_eq!(lookback, 14);
                assert_eq!(d_smoothing, 3);
                assert_eq!(d2_smoothing, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_backtest_config() {
        let cli =
            Cli::try_parse_from(["stochtrader", "backtest", "--config", "run.ini"]).unwrap();
        assert!(matches!(cli.command, Command::Backtest { config } if config == Path::new("run.ini")));
    }

    #[test]
    fn backtest_requires_config() {
        assert!(Cli::try_parse_from(["stochtrader", "backtest"]).is_err());
    }

    #[test]
    fn series_name_from_stem() {
        assert_eq!(series_name(Path::new("data/ASML.csv")), "ASML");
    }

    #[test]
    fn params_from_config_and_defaults() {
        let config = FileConfigAdapter::from_string(
            "[stochastic]\nlookback = 28\nd2_smoothing = 2\n[strategy]\nunstable_period = 50\n",
        )
        .unwrap();
        let params = build_strategy_params(&config);
        assert_eq!(params.stochastic.lookback, 28);
        assert_eq!(params.stochastic.d_smoothing, 3);
        assert_eq!(params.stochastic.d2_smoothing, 2);
        assert_eq!(params.unstable_period, 50);

        let bt = build_backtest_config(&config);
        assert_eq!(bt, BacktestConfig::default());
    }

    #[test]
    fn ratio_formatting() {
        assert_eq!(fmt_ratio(Num::from(1) / Num::from(3)), "0.3333");
        assert_eq!(fmt_ratio(Num::from(2)), "2");
        assert_eq!(fmt_ratio(Num::NaN), "NaN");
    }
}
