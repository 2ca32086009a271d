//! RollingIndex - Main Entry Point
//!
//! Prices the indices described by a configuration file and prints their
//! settlement levels, or runs a self-contained demo on synthetic prices.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rolling_index::{
    load_config, ContractNaming, IndexConfiguration, IndexDefinition, SettlementEngine,
    SingleAssetIndexConfiguration, SlopeOf, StaticCalendarService, StaticPriceService, WhiteNoise,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Index symbol to price; all configured indices when omitted
    #[arg(long)]
    symbol: Option<String>,

    /// Valuation date (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print the full level series rather than the final level
    #[arg(long)]
    series: bool,

    /// Run a self-contained demo on synthetic prices
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();

    if args.demo {
        return run_demo(&args);
    }

    let config = load_config(Some(&args.config))?;
    if config.indices.is_empty() {
        bail!("no indices configured in {}", args.config);
    }
    let (prices, calendars) = rolling_index::config::build_services(&config)?;
    let engine = SettlementEngine::new(&prices, &calendars);

    for definition in &config.indices {
        if let Some(symbol) = &args.symbol {
            if definition.symbol() != symbol {
                continue;
            }
        }
        let as_of = args
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        print_index(&engine, definition, as_of, args.series)?;
    }
    Ok(())
}

fn print_index(
    engine: &SettlementEngine<'_>,
    definition: &IndexDefinition,
    as_of: NaiveDate,
    series: bool,
) -> Result<()> {
    if series {
        let mut slope = SlopeOf::new();
        for (date, level) in engine.settlement_series(definition, as_of)? {
            let trend = slope.update(level);
            println!("{}  {date}  {level:.8}  (trend {trend:+.6}/day)", definition.symbol());
        }
    } else {
        let level = engine.settlement_level(definition, as_of)?;
        println!("{}  {as_of}  {level:.8}", definition.symbol());
    }
    Ok(())
}

/// Price a synthetic crude-style single-asset index over one roll cycle
fn run_demo(args: &Args) -> Result<()> {
    info!("running synthetic single-asset demo");

    let start = NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date");
    let as_of = args
        .as_of
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"));

    let definition = IndexDefinition::SingleAsset(SingleAssetIndexConfiguration {
        index: IndexConfiguration {
            symbol: "CL Index".to_string(),
            publish_holiday_calendar: "CL".to_string(),
            rounding: 8,
            initial_level: 100.0,
            start_date: start,
        },
        asset: "CL".to_string(),
        roll_period: (5, 10),
        roll_schedule: ["H0", "H0", "K0", "K0", "N0", "N0", "U0", "U0", "X0", "X0", "F0", "F1"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        roll_rounding: 8,
        trading_halt_calendar: None,
        contract_naming: ContractNaming::BloombergComdty,
    });

    let mut calendars = StaticCalendarService::new();
    calendars.insert_weekdays("CL", []);

    // Synthetic settlement prices for every contract the schedule can name
    let mut prices = StaticPriceService::new();
    let mut noise = WhiteNoise::seeded(42, 0.0, 0.35);
    for contract in ["CLK25 Comdty", "CLN25 Comdty", "CLU25 Comdty", "CLX25 Comdty"] {
        let initial = 60.0 + noise.sample().abs() * 10.0;
        prices.insert_series(contract, noise.dated_walk(start, 120, initial));
    }

    let engine = SettlementEngine::new(&prices, &calendars);
    print_index(&engine, &definition, as_of, true)?;
    Ok(())
}
