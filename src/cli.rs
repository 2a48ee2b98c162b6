//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rand::RngCore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvPriceSource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::notify_adapter::{ConsoleNotifier, FileNotifier};
use crate::domain::backtest::{run_backtest_streaming, BacktestResult};
use crate::domain::config_validation::validate_all;
use crate::domain::error::SignalError;
use crate::domain::indicator::compute_frame;
use crate::domain::price::PriceSeries;
use crate::domain::report::{demo_report, SignalReport};
use crate::domain::signal::{generate_signal, Decision};
use crate::domain::signal_config::{RiskConfig, SignalConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSource;
use crate::ports::notify_port::Notifier;

pub const TEST_MESSAGE: &str = "This is a test message from your goldsignal signal generator.";

#[derive(Parser, Debug)]
#[command(name = "goldsignal", about = "Momentum trading signal generator")]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the price source and notify on every signal
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Send a demo signal every cycle instead of the evaluated one
        #[arg(long)]
        force_signal: bool,
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Evaluate once, then send a demo signal
    Once {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Send a test message through the configured notifier
    NotifyTest {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Replay the engine over recent history
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Settings for the surrounding runner, as opposed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub data_path: PathBuf,
    pub symbol: String,
    pub bars: usize,
    pub check_interval: Duration,
    pub timeframe: String,
    /// Notification file; `None` means stdout.
    pub output: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data"),
            symbol: "XAUUSD".to_string(),
            bars: 100,
            check_interval: Duration::from_secs(60),
            timeframe: "Short-term".to_string(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub force_signal: bool,
    pub cycles: Option<u64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            force_signal,
            cycles,
        } => run_continuous(
            &config,
            RunOptions {
                force_signal,
                cycles,
            },
        ),
        Command::Once { config } => run_once(&config),
        Command::NotifyTest { config } => run_notify_test(&config),
        Command::Backtest { config, days } => run_backtest(&config, days),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_signal_config(config: &dyn ConfigPort) -> Result<SignalConfig, SignalError> {
    let d = SignalConfig::default();
    Ok(SignalConfig {
        short_period: config.get_usize("signal", "short_period", d.short_period),
        long_period: config.get_usize("signal", "long_period", d.long_period),
        rsi_period: config.get_usize("signal", "rsi_period", d.rsi_period),
        rsi_oversold: config.get_double("signal", "rsi_oversold", d.rsi_oversold),
        rsi_overbought: config.get_double("signal", "rsi_overbought", d.rsi_overbought),
        macd_fast: config.get_usize("signal", "macd_fast", d.macd_fast),
        macd_slow: config.get_usize("signal", "macd_slow", d.macd_slow),
        macd_signal: config.get_usize("signal", "macd_signal", d.macd_signal),
        atr_period: config.get_usize("signal", "atr_period", d.atr_period),
        min_divergence: config.get_double("signal", "min_divergence", d.min_divergence),
        risk: build_risk_config(config)?,
    })
}

fn build_risk_config(config: &dyn ConfigPort) -> Result<RiskConfig, SignalError> {
    let d = RiskConfig::default();
    let pips = |key: &str, default: u32| {
        let raw = config.get_int("risk", key, i64::from(default));
        u32::try_from(raw).map_err(|_| SignalError::ConfigInvalid {
            section: "risk".to_string(),
            key: key.to_string(),
            reason: format!("{} must be a non-negative pip count, got {}", key, raw),
        })
    };
    Ok(RiskConfig {
        base_tp_pips: pips("base_tp_pips", d.base_tp_pips)?,
        base_sl_pips: pips("base_sl_pips", d.base_sl_pips)?,
        tp_atr_multiplier: config.get_double("risk", "tp_atr_multiplier", d.tp_atr_multiplier),
        sl_atr_multiplier: config.get_double("risk", "sl_atr_multiplier", d.sl_atr_multiplier),
        pip_scale: config.get_double("risk", "pip_scale", d.pip_scale),
    })
}

pub fn build_runner_config(config: &dyn ConfigPort) -> RunnerConfig {
    let d = RunnerConfig::default();
    let interval = config.get_usize("runner", "check_interval", d.check_interval.as_secs() as usize);
    RunnerConfig {
        data_path: config
            .get_string("data", "path")
            .map(PathBuf::from)
            .unwrap_or(d.data_path),
        symbol: config
            .get_string("data", "symbol")
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or(d.symbol),
        bars: config.get_usize("data", "bars", d.bars),
        check_interval: Duration::from_secs(interval as u64),
        timeframe: config
            .get_string("runner", "timeframe")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(d.timeframe),
        output: config
            .get_string("notify", "output")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
    }
}

/// Load, validate and build both configs, reporting failures on stderr.
pub fn load_validated(path: &Path) -> Result<(SignalConfig, RunnerConfig), ExitCode> {
    let adapter = load_config(path)?;
    let built = validate_all(&adapter).and_then(|()| build_signal_config(&adapter));
    match built {
        Ok(config) => Ok((config, build_runner_config(&adapter))),
        Err(e) => {
            eprintln!("error: {e}");
            Err((&e).into())
        }
    }
}

pub fn build_notifier(runner: &RunnerConfig) -> Box<dyn Notifier> {
    match &runner.output {
        Some(path) => Box::new(FileNotifier::new(path)),
        None => Box::new(ConsoleNotifier::new()),
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

/// Log the newest indicator readings at info level.
pub fn log_market_conditions(series: &PriceSeries, config: &SignalConfig) {
    let closes = series.closes();
    let frame = compute_frame(&closes, config);
    let Some(row) = frame.last() else {
        return;
    };
    info!("current price: {}", fmt_value(series.last_close()));
    info!("{}-period SMA: {}", config.short_period, fmt_value(row.sma_short));
    info!("{}-period SMA: {}", config.long_period, fmt_value(row.sma_long));
    info!("{}-period EMA: {}", config.short_period, fmt_value(row.ema_short));
    info!("{}-period EMA: {}", config.long_period, fmt_value(row.ema_long));
    info!("RSI: {}", fmt_value(row.rsi));
    info!("MACD: {}", fmt_value(row.macd));
    info!("MACD signal line: {}", fmt_value(row.macd_signal));
}

/// Fetch the latest snapshot, log it and evaluate it.
pub fn evaluate_latest(
    source: &dyn PriceSource,
    config: &SignalConfig,
    runner: &RunnerConfig,
) -> Result<Decision, SignalError> {
    info!(symbol = %runner.symbol, bars = runner.bars, "fetching latest prices");
    let series = source.fetch_latest(&runner.symbol, runner.bars)?;
    log_market_conditions(&series, config);
    generate_signal(&series.closes(), config)
}

fn with_prefix(prefix: Option<&str>, body: &str) -> String {
    match prefix {
        Some(p) => format!("{} {}", p, body),
        None => body.to_string(),
    }
}

/// Send a report, logging rather than propagating a delivery failure.
pub fn deliver(notifier: &dyn Notifier, report: &SignalReport, prefix: Option<&str>) -> bool {
    let message = with_prefix(prefix, &report.to_string());
    match notifier.send(&message) {
        Ok(()) => {
            info!(side = %report.side, entry = report.entry_price, "signal sent");
            true
        }
        Err(e) => {
            error!("{e}");
            false
        }
    }
}

/// What one polling cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Sent(SignalReport),
    /// A signal was produced but could not be delivered.
    Undelivered(SignalReport),
    NoSignal,
    Skipped,
}

/// One acquire -> compute -> notify cycle. Never fails: data errors skip the
/// cycle and notification errors are logged.
pub fn run_signal_cycle(
    source: &dyn PriceSource,
    notifier: &dyn Notifier,
    config: &SignalConfig,
    runner: &RunnerConfig,
    force_signal: bool,
    rng: &mut dyn RngCore,
) -> CycleOutcome {
    let decision = match evaluate_latest(source, config, runner) {
        Ok(d) => d,
        Err(e) => {
            warn!("could not evaluate prices, skipping this cycle: {e}");
            return CycleOutcome::Skipped;
        }
    };

    let report = if force_signal {
        info!("demo signal generated");
        demo_report(rng, &config.risk, &runner.timeframe)
    } else {
        match &decision {
            Decision::Signal(signal) => SignalReport::from_signal(signal, &runner.timeframe),
            Decision::NoSignal(reason) => {
                info!("no signal ({reason}), waiting for the next check");
                return CycleOutcome::NoSignal;
            }
        }
    };

    if deliver(notifier, &report, None) {
        CycleOutcome::Sent(report)
    } else {
        CycleOutcome::Undelivered(report)
    }
}

/// Serial polling loop; `pause` is called between cycles, not after the last.
pub fn run_polling<F: FnMut(Duration)>(
    source: &dyn PriceSource,
    notifier: &dyn Notifier,
    config: &SignalConfig,
    runner: &RunnerConfig,
    options: RunOptions,
    rng: &mut dyn RngCore,
    mut pause: F,
) -> Vec<CycleOutcome> {
    let mut outcomes = Vec::new();
    let mut cycle: u64 = 0;
    loop {
        cycle += 1;
        info!(cycle, "checking for signals");
        outcomes.push(run_signal_cycle(
            source,
            notifier,
            config,
            runner,
            options.force_signal,
            rng,
        ));
        if options.cycles.is_some_and(|max| cycle >= max) {
            break;
        }
        info!(
            "waiting {} seconds until the next check",
            runner.check_interval.as_secs()
        );
        pause(runner.check_interval);
    }
    outcomes
}

fn run_continuous(config_path: &Path, options: RunOptions) -> ExitCode {
    let (config, runner) = match load_validated(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let source = CsvPriceSource::new(runner.data_path.clone());
    let notifier = build_notifier(&runner);
    info!(symbol = %runner.symbol, "starting signal loop");

    let outcomes = run_polling(
        &source,
        notifier.as_ref(),
        &config,
        &runner,
        options,
        &mut rand::thread_rng(),
        std::thread::sleep,
    );
    info!(cycles = outcomes.len(), "signal loop finished");
    ExitCode::SUCCESS
}

/// Evaluate once and send the real signal, if any, prefixed `REAL:`; then
/// always send a demo signal prefixed `TEST:`.
pub fn once(
    source: &dyn PriceSource,
    notifier: &dyn Notifier,
    config: &SignalConfig,
    runner: &RunnerConfig,
    rng: &mut dyn RngCore,
) -> Result<Decision, SignalError> {
    let decision = evaluate_latest(source, config, runner);
    match &decision {
        Ok(Decision::Signal(signal)) => {
            let report = SignalReport::from_signal(signal, &runner.timeframe);
            notifier.send(&with_prefix(Some("REAL:"), &report.to_string()))?;
        }
        Ok(Decision::NoSignal(reason)) => info!("no real signal generated ({reason})"),
        Err(e) => warn!("could not evaluate prices: {e}"),
    }

    let demo = demo_report(rng, &config.risk, &runner.timeframe);
    notifier.send(&with_prefix(Some("TEST:"), &demo.to_string()))?;
    decision
}

fn run_once(config_path: &Path) -> ExitCode {
    let (config, runner) = match load_validated(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let source = CsvPriceSource::new(runner.data_path.clone());
    let notifier = build_notifier(&runner);

    match once(
        &source,
        notifier.as_ref(),
        &config,
        &runner,
        &mut rand::thread_rng(),
    ) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_notify_test(config_path: &Path) -> ExitCode {
    let (_, runner) = match load_validated(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    match build_notifier(&runner).send(TEST_MESSAGE) {
        Ok(()) => {
            eprintln!("Test message sent");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Replay the last `days` of history with the streaming engine.
pub fn backtest_recent(
    source: &dyn PriceSource,
    config: &SignalConfig,
    runner: &RunnerConfig,
    days: u32,
) -> Result<BacktestResult, SignalError> {
    let lookback = chrono::Duration::days(i64::from(days));
    let series = source.fetch_since(&runner.symbol, lookback)?;
    info!(symbol = %runner.symbol, days, bars = series.len(), "running backtest");
    run_backtest_streaming(&series, config)
}

pub fn format_backtest(result: &BacktestResult, days: u32, timeframe: &str) -> String {
    let summary = result.summary();
    let mut out = format!(
        "Backtest result for the last {} days\n\
         Bars evaluated: {}\n\
         Signals: {} ({} BUY, {} SELL)\n",
        days, summary.evaluated, summary.total, summary.buys, summary.sells
    );
    for entry in &result.signals {
        let when = entry
            .time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| format!("bar {}", entry.bar_index));
        let report = SignalReport::from_signal(&entry.signal, timeframe);
        out.push_str(&format!(
            "{}  {} entry {:.2} TP {:.2} SL {:.2}\n",
            when, report.side, report.entry_price, report.take_profit, report.stop_loss
        ));
    }
    out
}

fn run_backtest(config_path: &Path, days: u32) -> ExitCode {
    let (config, runner) = match load_validated(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let source = CsvPriceSource::new(runner.data_path.clone());

    match backtest_recent(&source, &config, &runner, days) {
        Ok(result) => {
            print!("{}", format_backtest(&result, days, &runner.timeframe));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let (config, runner) = match load_validated(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!("\nSignal:");
    eprintln!("  SMA/EMA periods: {} / {}", config.short_period, config.long_period);
    eprintln!(
        "  RSI: period {}, oversold {}, overbought {}",
        config.rsi_period, config.rsi_oversold, config.rsi_overbought
    );
    eprintln!(
        "  MACD: {} / {} / {}",
        config.macd_fast, config.macd_slow, config.macd_signal
    );
    eprintln!("  ATR period: {}", config.atr_period);
    eprintln!("  Warm-up: {} bars", config.required_bars());
    eprintln!("\nRunner:");
    eprintln!("  {} from {}", runner.symbol, runner.data_path.display());
    eprintln!("  {} bars every {}s", runner.bars, runner.check_interval.as_secs());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
