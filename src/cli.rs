//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::render_candle_chart;
use crate::domain::config_validation::{
    parse_config_date, validate_data_config, validate_kdj_config, validate_scan_config,
};
use crate::domain::error::KdjTraderError;
use crate::domain::kdj::{compute_kdj, KdjParams};
use crate::domain::scan::scan_signals;
use crate::domain::signal::Signal;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "kdjtrader", about = "KDJ oscillator signal scanner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a ticker for J/D crossover signals
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Print the KDJ indicator table
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Render a candlestick chart as SVG
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-save fetched bars in the export filename format
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Show data range for ticker(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            ticker,
            data,
        } => run_scan(&config, ticker.as_deref(), data.as_ref()),
        Command::Indicators { config, ticker } => run_indicators(&config, ticker.as_deref()),
        Command::Chart {
            config,
            ticker,
            output,
        } => run_chart(&config, ticker.as_deref(), output.as_ref()),
        Command::Export { config, ticker } => run_export(&config, ticker.as_deref()),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_kdj_params(config: &dyn ConfigPort) -> Result<KdjParams, KdjTraderError> {
    validate_kdj_config(config)?;
    Ok(KdjParams {
        window: config.get_int("kdj", "window", 9) as usize,
        smoothing: config.get_int("kdj", "smoothing", 3) as usize,
    })
}

pub fn resolve_tickers(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(t) = ticker_override {
        return vec![t.to_uppercase()];
    }

    if let Some(tickers_str) = config.get_string("scan", "tickers") {
        return tickers_str
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(ticker) = config.get_string("scan", "ticker") {
        let ticker = ticker.trim().to_uppercase();
        if !ticker.is_empty() {
            return vec![ticker];
        }
    }

    vec![]
}

pub fn resolve_date_range(
    config: &dyn ConfigPort,
) -> Result<(chrono::NaiveDate, chrono::NaiveDate), KdjTraderError> {
    let start = parse_config_date(config, "scan", "start_date")?.unwrap_or(chrono::NaiveDate::MIN);
    let end = parse_config_date(config, "scan", "end_date")?.unwrap_or(chrono::NaiveDate::MAX);
    Ok((start, end))
}

fn resolve_data_root(
    data_override: Option<&PathBuf>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, KdjTraderError> {
    if let Some(path) = data_override {
        return Ok(path.clone());
    }

    validate_data_config(config)?;
    config
        .get_string("data", "root")
        .map(PathBuf::from)
        .ok_or_else(|| KdjTraderError::ConfigMissing {
            section: "data".into(),
            key: "root".into(),
        })
}

fn run_scan(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    data_override: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let params = match build_kdj_params(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let root = match resolve_data_root(data_override, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = resolve_tickers(ticker_override, &config);
    if tickers.is_empty() {
        eprintln!("error: no tickers configured");
        return ExitCode::from(2);
    }

    let (start, end) = match resolve_date_range(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(root);
    let mut failures = 0usize;

    for ticker in &tickers {
        let bars = match adapter.fetch_ohlcv(ticker, start, end) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                failures += 1;
                continue;
            }
        };

        let events = match scan_signals(&bars, &params) {
            Ok(events) => events,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                failures += 1;
                continue;
            }
        };

        let buys = events.iter().filter(|e| e.signal == Signal::Buy).count();
        let sells = events.iter().filter(|e| e.signal == Signal::Sell).count();

        for event in &events {
            println!("{},{},{},{:.2}", ticker, event.date, event.signal, event.close);
        }

        eprintln!(
            "{}: {} bars, {} decisions, {} buys, {} sells",
            ticker,
            bars.len(),
            events.len(),
            buys,
            sells,
        );
    }

    if failures == tickers.len() {
        eprintln!("error: no tickers produced signals");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn run_indicators(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let params = match build_kdj_params(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let root = match resolve_data_root(None, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = resolve_tickers(ticker_override, &config);
    if tickers.is_empty() {
        eprintln!("error: no tickers configured");
        return ExitCode::from(2);
    }

    let (start, end) = match resolve_date_range(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(root);

    for ticker in &tickers {
        let bars = match adapter.fetch_ohlcv(ticker, start, end) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        let series = match compute_kdj(&bars, &params) {
            Ok(series) => series,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        for point in series.valid_points() {
            println!(
                "{},{},{:.4},{:.4},{:.4}",
                ticker, point.date, point.k, point.d, point.j
            );
        }
    }

    ExitCode::SUCCESS
}

fn run_chart(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let root = match resolve_data_root(None, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = resolve_tickers(ticker_override, &config);
    let ticker = match tickers.as_slice() {
        [single] => single.clone(),
        [] => {
            eprintln!("error: no tickers configured");
            return ExitCode::from(2);
        }
        _ => {
            eprintln!("error: chart requires a single ticker (use --ticker)");
            return ExitCode::from(2);
        }
    };

    let (start, end) = match resolve_date_range(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(root);
    let bars = match adapter.fetch_ohlcv(&ticker, start, end) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        let err = KdjTraderError::NoData {
            ticker: ticker.clone(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    let svg = render_candle_chart(&bars, &format!("{} Prices", ticker));

    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from(format!("{}_chart.svg", ticker.to_lowercase())));

    match fs::write(&output, &svg) {
        Ok(()) => {
            eprintln!("Chart written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write chart: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_export(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let root = match resolve_data_root(None, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = resolve_tickers(ticker_override, &config);
    if tickers.is_empty() {
        eprintln!("error: no tickers configured");
        return ExitCode::from(2);
    }

    let (start, end) = match resolve_date_range(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let interval = config
        .get_string("data", "interval")
        .unwrap_or_else(|| "1d".to_string());

    let adapter = CsvAdapter::new(root);

    for ticker in &tickers {
        let bars = match adapter.fetch_ohlcv(ticker, start, end) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        match adapter.write_ohlcv(&bars, &interval) {
            Ok(path) => eprintln!("Exported {} bars to {}", bars.len(), path.display()),
            Err(e) => eprintln!("warning: export failed for {} ({})", ticker, e),
        }
    }

    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let root = match resolve_data_root(None, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(root);

    let tickers = if ticker_override.is_some() || config.get_string("scan", "ticker").is_some()
        || config.get_string("scan", "tickers").is_some()
    {
        resolve_tickers(ticker_override, &config)
    } else {
        match adapter.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
        return ExitCode::SUCCESS;
    }

    for ticker in &tickers {
        match adapter.get_data_range(ticker) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", ticker, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", ticker);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", ticker, e);
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    for result in [
        validate_data_config(&config),
        validate_kdj_config(&config),
        validate_scan_config(&config),
    ] {
        if let Err(e) = result {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let params = match build_kdj_params(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = resolve_tickers(None, &config);

    eprintln!("\nKDJ parameters:");
    eprintln!("  window:    {}", params.window);
    eprintln!("  smoothing: {}", params.smoothing);
    eprintln!("\nTickers: {}", tickers.join(", "));

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
