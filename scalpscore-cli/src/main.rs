//! ScalpScore CLI: score a symbol, scan a watchlist, list presets.
//!
//! Commands:
//! - `score`: evaluate one symbol from its CSV directory
//! - `scan`: evaluate every symbol under a data directory and rank them
//! - `presets`: list built-in and configured presets

mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use scalpscore_core::domain::SignalResult;
use scalpscore_runner::data_loader::{list_symbols, load_bundle, load_watchlist};
use scalpscore_runner::{export_csv, export_json, ScanConfig, Scanner};

#[derive(Parser)]
#[command(
    name = "scalpscore",
    about = "ScalpScore CLI: intraday confluence signal scoring"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single symbol at its most recent bar.
    Score {
        /// Directory holding one subdirectory per symbol.
        #[arg(long)]
        data_dir: PathBuf,

        /// Symbol to score (subdirectory name).
        #[arg(long)]
        symbol: String,

        /// Path to a TOML scan config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset name, overriding the config ("Fast scalp", "Cleaner signals", or a custom one).
        #[arg(long)]
        preset: Option<String>,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Score a watchlist and print the ranked results.
    Scan {
        /// Directory holding one subdirectory per symbol.
        #[arg(long)]
        data_dir: PathBuf,

        /// Symbols to scan. Defaults to every symbol directory under --data-dir.
        symbols: Vec<String>,

        /// Path to a TOML scan config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset name, overriding the config.
        #[arg(long)]
        preset: Option<String>,

        /// Worker thread cap. Defaults to all cores.
        #[arg(long)]
        threads: Option<usize>,

        /// Write the ranked results to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the full report as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List available presets and their settings.
    Presets {
        /// Path to a TOML scan config with custom presets.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match cli.command {
        Commands::Score {
            data_dir,
            symbol,
            config,
            preset,
            json,
        } => run_score(&data_dir, &symbol, config.as_deref(), preset, json),
        Commands::Scan {
            data_dir,
            symbols,
            config,
            preset,
            threads,
            output,
            json,
        } => run_scan(
            &data_dir,
            symbols,
            config.as_deref(),
            preset,
            threads,
            output.as_deref(),
            json,
        ),
        Commands::Presets { config } => run_presets(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>, preset: Option<String>) -> Result<ScanConfig> {
    let mut config = match path {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if let Some(preset) = preset {
        config.preset = preset;
    }
    Ok(config)
}

fn run_score(
    data_dir: &Path,
    symbol: &str,
    config_path: Option<&Path>,
    preset: Option<String>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, preset)?;
    let engine = config.build_engine()?;
    let bundle = load_bundle(data_dir, symbol)?;
    let result = engine.evaluate(&bundle.symbol, &bundle.bars, &bundle.oscillators);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_signal(&result);
    }
    Ok(())
}

fn run_scan(
    data_dir: &Path,
    symbols: Vec<String>,
    config_path: Option<&Path>,
    preset: Option<String>,
    threads: Option<usize>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path, preset)?;
    if threads.is_some() {
        config.max_threads = threads;
    }
    config.validate()?;

    let symbols = if symbols.is_empty() {
        list_symbols(data_dir)?
    } else {
        symbols
    };
    if symbols.is_empty() {
        bail!("no symbols found under {}", data_dir.display());
    }

    let bundles = load_watchlist(data_dir, &symbols);
    if bundles.is_empty() {
        bail!("none of the {} requested symbols could be loaded", symbols.len());
    }

    let scanner = Scanner::new(&config)?;
    let report = scanner.scan(&bundles);

    if let Some(path) = output {
        let csv = export_csv(&report.results)?;
        std::fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = report.len(), "results written");
    }

    if json {
        println!("{}", export_json(&report)?);
        return Ok(());
    }

    print_table(&report.results);
    println!();
    match report.top() {
        Some(top) if top.bias.is_directional() => {
            println!("Top setup:");
            print_signal(top);
        }
        _ => println!("No directional setup."),
    }
    let alerts = report.alerts().count();
    println!(
        "{alerts} alert(s) at score >= {} (config {})",
        report.alert_threshold,
        &report.config_hash[..12usize.min(report.config_hash.len())]
    );
    Ok(())
}

fn run_presets(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, None)?;
    let registry = config.registry()?;

    println!(
        "{:<20} {:>9} {:>8}  {}",
        "preset", "min score", "vol mult", "mandatory"
    );
    for preset in registry.iter() {
        let mandatory: Vec<String> = preset
            .mandatory()
            .required()
            .map(|f| format!("{f:?}").to_lowercase())
            .collect();
        let mandatory = if mandatory.is_empty() {
            "-".to_string()
        } else {
            mandatory.join(",")
        };
        println!(
            "{:<20} {:>9} {:>8.2}  {}",
            preset.name(),
            preset.min_actionable_score(),
            preset.volume_multiplier(),
            mandatory
        );
    }
    Ok(())
}

fn fmt_price(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn print_signal(r: &SignalResult) {
    let as_of = r
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{}  {}  score {}  [{}]  last {}  as of {}",
        r.symbol,
        r.bias,
        r.score,
        r.session,
        fmt_price(r.last_price),
        as_of
    );
    println!("  {}", r.reason);
    if let Some(plan) = r.plan {
        println!(
            "  entry {:.2}  stop {:.2}  1R {:.2}  2R {:.2}  (risk {:.2})",
            plan.entry,
            plan.stop,
            plan.target_1r,
            plan.target_2r,
            plan.risk()
        );
    }
}

fn print_table(results: &[SignalResult]) {
    println!(
        "{:<8} {:<8} {:>5} {:<8} {:>9} {:>9} {:>9} {:>9} {:>9}  reason",
        "symbol", "bias", "score", "session", "last", "entry", "stop", "1R", "2R"
    );
    for r in results {
        println!(
            "{:<8} {:<8} {:>5} {:<8} {:>9} {:>9} {:>9} {:>9} {:>9}  {}",
            r.symbol,
            r.bias.to_string(),
            r.score,
            r.session.to_string(),
            fmt_price(r.last_price),
            fmt_price(r.entry()),
            fmt_price(r.stop()),
            fmt_price(r.target_1r()),
            fmt_price(r.target_2r()),
            r.reason
        );
    }
}
