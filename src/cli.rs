//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_history_adapter::CsvHistoryAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::fallback_history::FallbackHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::advice_cache::AdviceCache;
use crate::domain::advisor::{
    AdvisorParams, AnalysisMode, StrategyAdvice, DEFAULT_MA_LONG, DEFAULT_MA_SHORT,
};
use crate::domain::config_validation::{validate_risk_config, validate_strategy_config};
use crate::domain::error::TwodayError;
use crate::domain::ma_health::{
    analyze_ma_arrangement, MaArrangement, HEALTH_MA_LONG, HEALTH_MA_SHORT,
};
use crate::domain::portfolio::{derive_holdings, portfolio_metrics, realized_pnl};
use crate::domain::position_size::{
    position_size_with_risk, stop_price_from_pct, RiskParams, DEFAULT_RISK_FRACTION,
};
use crate::domain::watchlist::group_by_status;
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::ledger_port::LedgerPort;

#[derive(Parser, Debug)]
#[command(name = "twoday", about = "Taiwan equity tracker with two-day-rule signals")]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Two-day-rule advice for one or more symbols
    Advise {
        #[arg(short, long)]
        config: PathBuf,
        /// Symbols to analyse; defaults to [watchlist] symbols
        #[arg(short, long)]
        symbol: Vec<String>,
        /// Override [strategy] mode (short | long)
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Maximum share count under the fractional-risk rule
    Size {
        #[arg(long)]
        assets: f64,
        #[arg(long)]
        entry: f64,
        #[arg(long, conflicts_with = "stop_pct", required_unless_present = "stop_pct")]
        stop: Option<f64>,
        #[arg(long)]
        stop_pct: Option<f64>,
        /// Fraction of assets at risk (default 0.01)
        #[arg(long)]
        risk: Option<f64>,
    },
    /// Watchlist grouped by advisory status
    Watchlist {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Open holdings with unrealized P&L
    Holdings {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Realized P&L between two dates (inclusive)
    Realized {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Advise {
            config,
            symbol,
            mode,
            json,
        } => run_advise(&config, &symbol, mode.as_deref(), json),
        Command::Size {
            assets,
            entry,
            stop,
            stop_pct,
            risk,
        } => run_size(assets, entry, stop, stop_pct, risk),
        Command::Watchlist { config, json } => run_watchlist(&config, json),
        Command::Holdings { config } => run_holdings(&config),
        Command::Realized { config, from, to } => run_realized(&config, &from, &to),
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

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, TwodayError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn config_period(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    let value = config.get_int("strategy", key, default as i64);
    usize::try_from(value).unwrap_or(default)
}

pub fn build_advisor_params(
    config: &dyn ConfigPort,
    mode_override: Option<&str>,
) -> Result<AdvisorParams, TwodayError> {
    validate_strategy_config(config)?;

    let mode = match mode_override {
        Some(m) => m.parse()?,
        None => match config.get_string("strategy", "mode") {
            Some(m) => m.parse()?,
            None => AnalysisMode::default(),
        },
    };

    Ok(AdvisorParams {
        ma_short_period: config_period(config, "ma_short", DEFAULT_MA_SHORT),
        ma_long_period: config_period(config, "ma_long", DEFAULT_MA_LONG),
        mode,
    })
}

pub fn build_risk_params(config: &dyn ConfigPort) -> Result<RiskParams, TwodayError> {
    validate_risk_config(config)?;
    let defaults = RiskParams::default();
    Ok(RiskParams {
        total_assets: config.get_double("risk", "total_assets", defaults.total_assets),
        risk_fraction: config.get_double("risk", "risk_fraction", defaults.risk_fraction),
        stop_loss_pct: config.get_double("risk", "stop_loss_pct", defaults.stop_loss_pct),
    })
}

/// `[data] history_dir` first, then each of `[data] fallback_dirs`.
pub fn build_history_port(config: &dyn ConfigPort) -> Result<FallbackHistoryAdapter, TwodayError> {
    let primary = config
        .get_string("data", "history_dir")
        .ok_or_else(|| TwodayError::ConfigMissing {
            section: "data".into(),
            key: "history_dir".into(),
        })?;

    let mut ladder = FallbackHistoryAdapter::new(vec![Box::new(CsvHistoryAdapter::new(
        PathBuf::from(primary.trim()),
    ))]);
    for dir in config.get_list("data", "fallback_dirs") {
        ladder.push(Box::new(CsvHistoryAdapter::new(PathBuf::from(dir))));
    }
    Ok(ladder)
}

pub fn build_ledger(config: &dyn ConfigPort) -> Result<CsvLedgerAdapter, TwodayError> {
    let path = config
        .get_string("data", "ledger")
        .ok_or_else(|| TwodayError::ConfigMissing {
            section: "data".into(),
            key: "ledger".into(),
        })?;
    Ok(CsvLedgerAdapter::new(PathBuf::from(path.trim())))
}

pub fn resolve_symbols(overrides: &[String], config: &dyn ConfigPort) -> Vec<String> {
    let raw = if overrides.is_empty() {
        config.get_list("watchlist", "symbols")
    } else {
        overrides.to_vec()
    };
    let mut symbols: Vec<String> = Vec::with_capacity(raw.len());
    for s in raw {
        let s = s.trim().to_uppercase();
        if !s.is_empty() && !symbols.contains(&s) {
            symbols.push(s);
        }
    }
    symbols
}

/// Advice for one symbol plus what the text output needs from its history.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAdvice {
    pub symbol: String,
    pub advice: StrategyAdvice,
    pub last_close: Option<f64>,
    pub arrangement: Option<MaArrangement>,
}

/// Fetch history once per symbol and refresh the cache. Symbols whose
/// history cannot be loaded are logged and skipped.
pub fn refresh_advice(
    history: &dyn HistoryPort,
    symbols: &[String],
    params: &AdvisorParams,
    cache: &mut AdviceCache,
) -> Vec<SymbolAdvice> {
    let mut results = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let bars = match history.fetch_history(symbol) {
            Ok(bars) => bars,
            Err(e) => {
                warn!("skipping {} ({})", symbol, e);
                continue;
            }
        };
        let advice = match cache.refresh(symbol, &bars, params) {
            Ok(advice) => advice.clone(),
            Err(e) => {
                warn!("skipping {} ({})", symbol, e);
                continue;
            }
        };
        let arrangement = match analyze_ma_arrangement(&bars, HEALTH_MA_SHORT, HEALTH_MA_LONG) {
            Ok(arrangement) => arrangement,
            Err(e) => {
                warn!("no MA arrangement for {} ({})", symbol, e);
                None
            }
        };
        results.push(SymbolAdvice {
            symbol: symbol.clone(),
            advice,
            last_close: bars.last().map(|b| b.close),
            arrangement,
        });
    }
    results
}

pub fn format_advice(symbol: &str, advice: &StrategyAdvice) -> String {
    format!(
        "{symbol}: {status}\n  {advice}\n  reason: {reason}\n  action: {action}",
        status = advice.status,
        advice = advice.advice,
        reason = advice.reason,
        action = advice.status.action(),
    )
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, TwodayError> {
    serde_json::to_string_pretty(value).map_err(|e| TwodayError::Io(e.into()))
}

fn run_advise(
    config_path: &PathBuf,
    symbol_overrides: &[String],
    mode_override: Option<&str>,
    json: bool,
) -> Result<(), TwodayError> {
    let config = load_config(config_path)?;
    let params = build_advisor_params(&config, mode_override)?;
    let history = build_history_port(&config)?;
    let symbols = resolve_symbols(symbol_overrides, &config);
    if symbols.is_empty() {
        return Err(TwodayError::ConfigMissing {
            section: "watchlist".into(),
            key: "symbols".into(),
        });
    }

    info!(
        "Advising {} symbols with MA({}) / MA({}), {} mode",
        symbols.len(),
        params.ma_short_period,
        params.ma_long_period,
        params.mode
    );

    let mut cache = AdviceCache::new();
    let results = refresh_advice(&history, &symbols, &params, &mut cache);
    if results.is_empty() {
        return Err(TwodayError::NoData {
            symbol: symbols.join(","),
        });
    }

    if json {
        let payload: BTreeMap<&str, &StrategyAdvice> = results
            .iter()
            .map(|r| (r.symbol.as_str(), &r.advice))
            .collect();
        println!("{}", to_json(&payload)?);
        return Ok(());
    }

    let risk = build_risk_params(&config)?;
    for r in &results {
        println!("{}", format_advice(&r.symbol, &r.advice));
        if let Some(a) = &r.arrangement {
            println!(
                "  MA({HEALTH_MA_SHORT})/MA({HEALTH_MA_LONG}): {} ({}), health {} {}",
                a.trend,
                a.trend.message(),
                a.health_score(),
                a.health_status()
            );
        }
        if let Some(close) = r.last_close {
            println!(
                "  size: {} shares at {:.2} with a {}% stop (max loss {:.0})",
                risk.size_at(close),
                close,
                risk.stop_loss_pct,
                risk.max_loss()
            );
        }
    }
    Ok(())
}

pub fn compute_size(
    assets: f64,
    entry: f64,
    stop: Option<f64>,
    stop_pct: Option<f64>,
    risk: Option<f64>,
) -> Result<u64, TwodayError> {
    let stop = match (stop, stop_pct) {
        (Some(s), _) => s,
        (None, Some(pct)) => stop_price_from_pct(entry, pct),
        (None, None) => {
            return Err(TwodayError::InvalidArgument {
                reason: "either --stop or --stop-pct is required".into(),
            })
        }
    };
    let risk = risk.unwrap_or(DEFAULT_RISK_FRACTION);
    if !(risk > 0.0 && risk < 1.0) {
        return Err(TwodayError::InvalidArgument {
            reason: format!("risk fraction {risk} must be between 0 and 1"),
        });
    }
    Ok(position_size_with_risk(assets, entry, stop, risk))
}

fn run_size(
    assets: f64,
    entry: f64,
    stop: Option<f64>,
    stop_pct: Option<f64>,
    risk: Option<f64>,
) -> Result<(), TwodayError> {
    let shares = compute_size(assets, entry, stop, stop_pct, risk)?;
    if shares == 0 {
        warn!("stop is not below entry or risk budget is below one share; size is 0");
    }
    println!("{shares}");
    Ok(())
}

fn run_watchlist(config_path: &PathBuf, json: bool) -> Result<(), TwodayError> {
    let config = load_config(config_path)?;
    let params = build_advisor_params(&config, None)?;
    let history = build_history_port(&config)?;
    let symbols = resolve_symbols(&[], &config);
    let pinned = resolve_symbols(&config.get_list("watchlist", "pinned"), &config);

    let mut cache = AdviceCache::new();
    refresh_advice(&history, &symbols, &params, &mut cache);
    let groups = group_by_status(&symbols, &pinned, &cache);

    if json {
        println!("{}", to_json(&groups)?);
        return Ok(());
    }

    for group in groups.iter().filter(|g| !g.symbols.is_empty()) {
        println!("{} ({})", group.category, group.symbols.len());
        for symbol in &group.symbols {
            let marker = if pinned.contains(symbol) { "*" } else { " " };
            println!("  {marker} {symbol}");
        }
    }
    Ok(())
}

fn run_holdings(config_path: &PathBuf) -> Result<(), TwodayError> {
    let config = load_config(config_path)?;
    let ledger = build_ledger(&config)?;
    let history = build_history_port(&config)?;

    let transactions = ledger.load_transactions()?;
    info!("Loaded {} transactions", transactions.len());
    let holdings = derive_holdings(&transactions)?;

    let mut prices = HashMap::new();
    for h in &holdings {
        match history.last_close(&h.symbol) {
            Ok(Some(close)) => {
                prices.insert(h.symbol.clone(), close);
            }
            Ok(None) => {}
            Err(e) => warn!("no price for {} ({}); valuing at cost", h.symbol, e),
        }
    }

    println!(
        "{:<8} {:>10} {:>12} {:>12} {:>14} {:>14}",
        "symbol", "shares", "avg cost", "price", "market value", "unrealized"
    );
    for h in &holdings {
        let price = prices.get(&h.symbol).copied();
        let shown = price.unwrap_or_else(|| h.avg_cost());
        println!(
            "{:<8} {:>10} {:>12.2} {:>12} {:>14.0} {:>+14.0}",
            h.symbol,
            h.shares,
            h.avg_cost(),
            price.map_or_else(|| "-".to_string(), |p| format!("{p:.2}")),
            h.market_value(shown),
            h.unrealized_pnl(shown),
        );
    }

    let metrics = portfolio_metrics(&holdings, &prices);
    println!("\nTotal cost:       {:.0}", metrics.total_cost);
    println!("Market value:     {:.0}", metrics.market_value);
    println!("Unrealized P&L:   {:+.0}", metrics.unrealized_pnl);
    println!("ROI:              {:+.2}%", metrics.roi_pct);
    Ok(())
}

fn parse_date_arg(value: &str, name: &str) -> Result<NaiveDate, TwodayError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TwodayError::InvalidArgument {
        reason: format!("--{name} must be YYYY-MM-DD, got '{value}'"),
    })
}

fn run_realized(config_path: &PathBuf, from: &str, to: &str) -> Result<(), TwodayError> {
    let from = parse_date_arg(from, "from")?;
    let to = parse_date_arg(to, "to")?;
    if from > to {
        return Err(TwodayError::InvalidArgument {
            reason: format!("--from {from} is after --to {to}"),
        });
    }

    let config = load_config(config_path)?;
    let transactions = build_ledger(&config)?.load_transactions()?;
    let realized = realized_pnl(&transactions, from, to)?;
    println!("{realized:+.0}");
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), TwodayError> {
    let config = load_config(config_path)?;
    let params = build_advisor_params(&config, None)?;
    let risk = build_risk_params(&config)?;

    eprintln!(
        "strategy: MA({}) / MA({}), {} mode, needs {} bars",
        params.ma_short_period,
        params.ma_long_period,
        params.mode,
        params.required_bars()
    );
    eprintln!(
        "risk: {:.0} assets, {:.2}% per trade, {}% stop",
        risk.total_assets,
        risk.risk_fraction * 100.0,
        risk.stop_loss_pct
    );
    eprintln!("Configuration is valid.");
    Ok(())
}
