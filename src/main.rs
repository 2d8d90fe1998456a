use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use safety_stock::forecast::smoothing::DEFAULT_HORIZON_DAYS;
use safety_stock::io::demand::{self, DemoProfile};
use safety_stock::io::reporting;
use safety_stock::simulation::engine::DEFAULT_RUN_COUNT;
use safety_stock::strategy::sweep::default_grid;
use safety_stock::{InventoryEngine, RemoteConfig, SafetyStockConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "safety-stock", about = "Safety stock and reorder point report")]
struct Cli {
    /// CSV file with `date,demand` columns. Demo data is generated when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Days of demo history to generate when no input is given.
    #[arg(long, default_value_t = 90)]
    demo_days: usize,

    #[arg(long, default_value_t = 0.95)]
    service_level: f64,

    /// Lead time in days.
    #[arg(long, default_value_t = 7.0)]
    lead_time: f64,

    #[arg(long, default_value_t = 1.5)]
    lead_time_std_dev: f64,

    #[arg(long, default_value_t = 7.0)]
    review_period: f64,

    /// Holding cost per unit per year.
    #[arg(long, default_value_t = 5.0)]
    holding_cost: f64,

    /// Cost per unit short.
    #[arg(long, default_value_t = 50.0)]
    stockout_cost: f64,

    /// Monte Carlo runs.
    #[arg(long, default_value_t = DEFAULT_RUN_COUNT)]
    runs: usize,

    /// Forecast horizon in days.
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon: usize,

    /// Base URL of the remote forecasting/optimization service.
    #[arg(long, env = "SAFETY_STOCK_SERVICE_URL")]
    service_url: Option<String>,

    /// Remote request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Seed for reproducible simulation and demo data.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the cost sweep to this CSV file.
    #[arg(long)]
    sweep_output: Option<PathBuf>,

    /// Write the simulated lead-time demands to this CSV file.
    #[arg(long)]
    simulation_output: Option<PathBuf>,

    /// Write the forecast to this CSV file.
    #[arg(long)]
    forecast_output: Option<PathBuf>,
}

/// Info by default; `RUST_LOG` replaces the default when set.
fn logger(env: env_logger::Env) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}

fn main() -> Result<()> {
    logger(env_logger::Env::default()).init();

    let cli = Cli::parse();
    println!("=== Safety Stock Report ===");

    // 1. SETUP CONFIGURATION
    let config = SafetyStockConfig {
        service_level: cli.service_level,
        lead_time: cli.lead_time,
        lead_time_std_dev: cli.lead_time_std_dev,
        review_period: cli.review_period,
        holding_cost_per_unit: cli.holding_cost,
        stockout_cost_per_unit: cli.stockout_cost,
    };
    config.validate().context("invalid configuration")?;

    // 2. LOAD OR GENERATE DEMAND
    let series = match &cli.input {
        Some(path) => demand::load_demand_csv(path)
            .with_context(|| format!("failed to load demand from {}", path.display()))?,
        None => {
            let profile = DemoProfile {
                days: cli.demo_days,
                ..Default::default()
            };
            let today = Local::now().date_naive();
            let series = match cli.seed {
                Some(seed) => {
                    use rand::SeedableRng;
                    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                    demand::generate_demo_series(&profile, today, &mut rng)
                }
                None => demand::generate_demo_series(&profile, today, &mut rand::thread_rng()),
            }
            .context("failed to generate demo demand")?;
            println!("No input given, generated {} days of demo demand.", series.len());
            series
        }
    };

    // 3. BUILD ENGINE
    let mut engine = match &cli.service_url {
        Some(url) => {
            let remote =
                RemoteConfig::new(url.as_str()).with_timeout(Duration::from_secs(cli.timeout_secs));
            InventoryEngine::with_remote(remote).context("failed to build HTTP client")?
        }
        None => InventoryEngine::local(),
    };
    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }
    if cli.service_url.is_some() {
        let status = if engine.service_available() {
            "available"
        } else {
            "unavailable, computing locally"
        };
        println!("Remote service: {}", status);
    }

    // 4. RUN ANALYSIS
    let analysis = engine
        .analyze(&config, &series, cli.runs, cli.horizon)
        .context("analysis failed")?;

    let ss = &analysis.safety_stock.value;
    println!("\n=== Safety Stock ({:?}) ===", analysis.safety_stock.source);
    println!("Average daily demand: {:.2}", ss.average_demand);
    println!("Demand std dev:       {:.2}", ss.demand_std_dev);
    println!("Service level:        {:.2}%", ss.service_level);
    if ss.service_level_clamped {
        println!("  (outside the 90%-99.5% z-score table, clamped)");
    }
    println!("Safety stock:         {}", ss.safety_stock);
    println!("Reorder point:        {}", ss.reorder_point);
    println!("Holding cost / year:  ${:.0}", ss.expected_annual_holding_cost);
    println!("Stockout cost / year: ${:.0}", ss.expected_annual_stockout_cost);
    println!("Total cost / year:    ${:.0}", ss.total_cost);

    let mc = &analysis.simulation.value;
    println!("\n=== Monte Carlo ({:?}) ===", analysis.simulation.source);
    println!(
        "Stockouts: {} of {} runs ({:.2}%)",
        mc.stockout_count,
        mc.simulations.len(),
        mc.stockout_probability
    );
    println!("Mean lead-time demand: {:.2}", mc.mean_demand);
    println!(
        "P50 {:.0} | P75 {:.0} | P90 {:.0} | P95 {:.0} | P99 {:.0}",
        mc.percentiles.p50,
        mc.percentiles.p75,
        mc.percentiles.p90,
        mc.percentiles.p95,
        mc.percentiles.p99
    );

    let fc = &analysis.forecast.value;
    println!("\n=== Forecast ({:?}) ===", analysis.forecast.source);
    for (i, obs) in fc.forecast.iter().enumerate() {
        println!(
            "{}: {:.1} [{:.1}, {:.1}]",
            obs.date, obs.demand, fc.confidence.lower[i], fc.confidence.upper[i]
        );
    }

    // 5. COST SWEEP
    let sweep = engine
        .sweep(&config, &series, &default_grid())
        .context("cost sweep failed")?;
    let delta = engine
        .sweeper()
        .cost_delta(&sweep, &config, &series, config.service_level)?;
    println!("\n=== Cost Sweep ===");
    println!(
        "Optimal service level: {:.1}% (total ${:.0})",
        sweep.optimal.service_level * 100.0,
        sweep.optimal.total_cost
    );
    println!("Current setting costs ${:+.0} versus optimal", delta);

    // 6. EXPORT RESULTS
    if let Some(path) = &cli.sweep_output {
        reporting::write_cost_sweep(path, &sweep)?;
    }
    if let Some(path) = &cli.simulation_output {
        reporting::write_simulations(path, mc)?;
    }
    if let Some(path) = &cli.forecast_output {
        reporting::write_forecast(path, fc)?;
    }

    println!("\nReport Complete.");
    Ok(())
}
