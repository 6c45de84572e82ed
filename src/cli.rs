//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, BacktestResult, DEFAULT_INITIAL_CAPITAL,
    DEFAULT_RISK_FREE_RATE,
};
use crate::domain::config_validation::{
    parse_optional_date, parse_period, parse_resample, validate_backtest_config,
    validate_data_config, validate_macd_config,
};
use crate::domain::error::MacdtraderError;
use crate::domain::indicator::{calculate_macd, MacdParams, MacdPoint};
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::{closes, OhlcvBar};
use crate::domain::period::Period;
use crate::domain::price_point::{decorate, PricePoint};
use crate::domain::resample::Resample;
use crate::domain::summary::{daily_returns, rolling_mean, ColumnSummary};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "macdtrader", about = "MACD signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a MACD backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        /// Look-back period, e.g. 6mo, 1y, ytd, max
        #[arg(short, long)]
        period: Option<String>,
        /// Reject indicator gaps after the warm-up window
        #[arg(long)]
        strict: bool,
        /// Resample daily bars to weekly before computing MACD
        #[arg(long)]
        weekly: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print summary statistics for a ticker
    Describe {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        /// Moving average window
        #[arg(long, default_value_t = 50)]
        ma: usize,
    },
    /// Show data range for a ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// List tickers available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// What to load: ticker, date window and bar frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    pub ticker: String,
    pub period: Option<Period>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub resample: Resample,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            ticker,
            period,
            strict,
            weekly,
            dry_run,
        } => {
            let overrides = Overrides {
                ticker,
                period,
                strict,
                weekly,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides)
            }
        }
        Command::Describe {
            config,
            ticker,
            period,
            ma,
        } => {
            let overrides = Overrides {
                ticker,
                period,
                ..Overrides::default()
            };
            run_describe(&config, &overrides, ma)
        }
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub strict: bool,
    pub weekly: bool,
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MacdtraderError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, MacdtraderError> {
    let directory = config.require_string("data", "directory")?;
    Ok(CsvAdapter::new(PathBuf::from(directory)))
}

pub fn build_backtest_config(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestConfig, MacdtraderError> {
    validate_backtest_config(config)?;
    Ok(BacktestConfig {
        initial_capital: config
            .get_double("backtest", "initial_capital")?
            .unwrap_or(DEFAULT_INITIAL_CAPITAL),
        strict: overrides.strict || config.get_bool("backtest", "strict")?.unwrap_or(false),
        risk_free_rate: config
            .get_double("backtest", "risk_free_rate")?
            .unwrap_or(DEFAULT_RISK_FREE_RATE),
    })
}

pub fn build_macd_params(config: &dyn ConfigPort) -> Result<MacdParams, MacdtraderError> {
    validate_macd_config(config)?;
    let defaults = MacdParams::default();
    let period = |key: &str, default: usize| -> Result<usize, MacdtraderError> {
        Ok(config
            .get_int("macd", key)?
            .map_or(default, |v| v as usize))
    };
    Ok(MacdParams {
        fast: period("fast", defaults.fast)?,
        slow: period("slow", defaults.slow)?,
        signal: period("signal", defaults.signal)?,
    })
}

/// A `--period` flag replaces both `period` and `start_date` from the config.
pub fn build_data_request(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<DataRequest, MacdtraderError> {
    validate_backtest_config(config)?;

    let ticker = match overrides.ticker.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => config.require_string("backtest", "ticker")?,
    };

    let (period, start_date) = match &overrides.period {
        Some(raw) => {
            let period = raw
                .parse()
                .map_err(|reason| MacdtraderError::ConfigInvalid {
                    section: "backtest".into(),
                    key: "period".into(),
                    reason,
                })?;
            (Some(period), None)
        }
        None => (parse_period(config)?, parse_optional_date(config, "start_date")?),
    };

    let resample = if overrides.weekly {
        Resample::Weekly
    } else {
        parse_resample(config)?
    };

    Ok(DataRequest {
        ticker,
        period,
        start_date,
        end_date: parse_optional_date(config, "end_date")?,
        resample,
    })
}

pub fn build_report_adapter(config: &dyn ConfigPort) -> CsvReportAdapter {
    let path = |key: &str| {
        config
            .get_string("report", key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    };
    CsvReportAdapter::new(path("signals_path"), path("trades_path"))
}

/// Turn the request into concrete fetch bounds. A period counts back from
/// `end_date` when given, otherwise from the latest bar on file.
pub fn resolve_date_range(
    data_port: &dyn DataPort,
    request: &DataRequest,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), MacdtraderError> {
    let Some(period) = request.period else {
        return Ok((request.start_date, request.end_date));
    };

    let anchor = match request.end_date {
        Some(end) => end,
        None => match data_port.get_data_range(&request.ticker)? {
            Some((_, last, _)) => last,
            None => {
                return Err(MacdtraderError::NoData {
                    ticker: request.ticker.clone(),
                })
            }
        },
    };
    Ok((period.start_date(anchor), request.end_date))
}

/// Fetch, resample and check for emptiness.
pub fn load_bars(
    data_port: &dyn DataPort,
    request: &DataRequest,
) -> Result<Vec<OhlcvBar>, MacdtraderError> {
    let (start, end) = resolve_date_range(data_port, request)?;
    let bars = data_port.fetch_ohlcv(&request.ticker, start, end)?;
    let bars = request.resample.apply(bars);
    if bars.is_empty() {
        return Err(MacdtraderError::NoData {
            ticker: request.ticker.clone(),
        });
    }
    Ok(bars)
}

/// Everything a backtest run produced.
#[derive(Debug, Clone)]
pub struct BacktestRun {
    pub points: Vec<PricePoint>,
    pub result: BacktestResult,
    pub metrics: Metrics,
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    request: &DataRequest,
    macd_params: &MacdParams,
    bt_config: &BacktestConfig,
    report: Option<&dyn ReportPort>,
) -> Result<BacktestRun, MacdtraderError> {
    // Stage 1: Fetch data
    let bars = load_bars(data_port, request)?;
    let first = bars[0].date;
    let last = bars[bars.len() - 1].date;
    eprintln!(
        "Loaded {} {} bars for {} ({} to {})",
        bars.len(),
        request.resample,
        request.ticker,
        first,
        last
    );

    // Stage 2: Indicator and decoration
    let macd = calculate_macd(&bars, macd_params);
    if !macd.iter().any(MacdPoint::is_valid) {
        eprintln!(
            "warning: {} needs more than {} bars; no signals will fire",
            macd_params,
            macd_params.warmup()
        );
    }
    let points = decorate(&bars, &macd)?;

    // Stage 3: Simulate
    eprintln!(
        "Running backtest: {} with {:.2} starting cash{}",
        macd_params,
        bt_config.initial_capital,
        if bt_config.strict { " (strict)" } else { "" }
    );
    let result = backtest_engine::run_backtest(&points, bt_config)?;

    // Stage 4: Metrics
    let metrics = Metrics::compute(
        &result.portfolio,
        bt_config.risk_free_rate,
        request.resample.periods_per_year(),
    );
    print_summary(&request.ticker, bt_config, &metrics);

    // Stage 5: Audit output
    if let Some(report) = report {
        report.write(&points, &result)?;
    }

    Ok(BacktestRun {
        points,
        result,
        metrics,
    })
}

fn print_summary(ticker: &str, bt_config: &BacktestConfig, metrics: &Metrics) {
    eprintln!("\n=== Results: {} ===", ticker);
    eprintln!("Initial Capital:  {:.2}", bt_config.initial_capital);
    eprintln!("Final Value:      {:.2}", metrics.final_value);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!(
        "Annualized:       {:.2}%",
        metrics.annualized_return * 100.0
    );
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", metrics.sortino_ratio);
    eprintln!(
        "Max Drawdown:     -{:.1}% ({} bars)",
        metrics.max_drawdown * 100.0,
        metrics.max_drawdown_duration
    );
    eprintln!("Total Trades:     {}", metrics.total_trades);
    eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
    eprintln!("Avg Trade Return: {:.2}%", metrics.avg_trade_return);
    eprintln!("Profit Factor:    {:.2}", metrics.profit_factor);
    eprintln!("Exposure:         {:.1}%", metrics.exposure * 100.0);
}

fn run_backtest(config_path: &Path, overrides: &Overrides) -> Result<(), MacdtraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;

    let request = build_data_request(&config, overrides)?;
    let bt_config = build_backtest_config(&config, overrides)?;
    let macd_params = build_macd_params(&config)?;
    let data_port = build_data_port(&config)?;
    let report = build_report_adapter(&config);
    let report_port: Option<&dyn ReportPort> = if report.is_empty() {
        None
    } else {
        Some(&report)
    };

    let run = run_backtest_pipeline(&data_port, &request, &macd_params, &bt_config, report_port)?;

    if !report.is_empty() {
        eprintln!("\nAudit files written");
    }
    println!("{:.2}", run.result.final_value);
    Ok(())
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> Result<(), MacdtraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let request = build_data_request(&config, overrides)?;
    let bt_config = build_backtest_config(&config, overrides)?;
    let macd_params = build_macd_params(&config)?;
    eprintln!("Config validated successfully");

    let window = match request.period {
        Some(period) => match request.end_date {
            Some(end) => format!("{} ending {}", period, end),
            None => format!("{} ending at the latest bar", period),
        },
        None => format!(
            "{} to {}",
            request
                .start_date
                .map_or_else(|| "first bar".to_string(), |d| d.to_string()),
            request
                .end_date
                .map_or_else(|| "last bar".to_string(), |d| d.to_string()),
        ),
    };

    eprintln!("\nBacktest:");
    eprintln!("  ticker:          {}", request.ticker);
    eprintln!("  window:          {}", window);
    eprintln!("  frequency:       {}", request.resample);
    eprintln!("  indicator:       {}", macd_params);
    eprintln!("  initial capital: {:.2}", bt_config.initial_capital);
    eprintln!("  strict:          {}", bt_config.strict);

    let report = build_report_adapter(&config);
    if !report.is_empty() {
        eprintln!("  audit output:    enabled");
    }

    eprintln!("\nDry run complete: configuration is valid");
    Ok(())
}

fn run_describe(config_path: &Path, overrides: &Overrides, ma: usize) -> Result<(), MacdtraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let request = build_data_request(&config, overrides)?;
    let data_port = build_data_port(&config)?;

    let bars = load_bars(&data_port, &request)?;
    for line in describe_lines(&bars, ma) {
        println!("{}", line);
    }
    Ok(())
}

/// `describe`-style table for the OHLCV columns and daily returns, followed by
/// the latest `ma`-bar moving average of the close.
pub fn describe_lines(bars: &[OhlcvBar], ma: usize) -> Vec<String> {
    let column = |f: fn(&OhlcvBar) -> f64| bars.iter().map(f).collect::<Vec<f64>>();
    let columns: [(&str, Vec<f64>); 6] = [
        ("open", column(|b| b.open)),
        ("high", column(|b| b.high)),
        ("low", column(|b| b.low)),
        ("close", column(|b| b.close)),
        ("volume", column(|b| b.volume as f64)),
        ("return", daily_returns(bars)),
    ];

    let mut lines = vec![format!(
        "{:<8}{:>8}{:>14}{:>14}{:>14}{:>14}{:>14}{:>14}{:>14}",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )];
    for (name, values) in &columns {
        match ColumnSummary::describe(values) {
            Some(s) => lines.push(format!(
                "{:<8}{:>8}{:>14.4}{:>14.4}{:>14.4}{:>14.4}{:>14.4}{:>14.4}{:>14.4}",
                name, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
            )),
            None => lines.push(format!("{:<8}{:>8}", name, 0)),
        }
    }

    let latest = rolling_mean(&closes(bars), ma)
        .last()
        .copied()
        .filter(|v| !v.is_nan());
    lines.push(match latest {
        Some(v) => format!("MA({}) latest: {:.4}", ma, v),
        None => format!("MA({}) latest: n/a ({} bars)", ma, bars.len()),
    });
    lines
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> Result<(), MacdtraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let overrides = Overrides {
        ticker: ticker.map(str::to_string),
        ..Overrides::default()
    };
    let request = build_data_request(&config, &overrides)?;
    let data_port = build_data_port(&config)?;

    match data_port.get_data_range(&request.ticker)? {
        Some((first, last, count)) => {
            println!("{}: {} bars, {} to {}", request.ticker, count, first, last);
            Ok(())
        }
        None => Err(MacdtraderError::NoData {
            ticker: request.ticker,
        }),
    }
}

fn run_list_symbols(config_path: &Path) -> Result<(), MacdtraderError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let data_port = build_data_port(&config)?;

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
