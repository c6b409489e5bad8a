use checkout_sim::core::execution::{ConcurrencyMode, SimulationConfig};
use checkout_sim::grocery::{
    load_customer_script, run_replications, run_store, GroceryStore, RunSummary, StoreConfig,
};
use checkout_sim::{SimError, Simulation};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grocery_store")]
#[command(about = "Simulate a grocery store checkout network")]
#[command(version)]
struct Args {
    /// Store configuration (JSON); defaults apply when omitted
    config: Option<PathBuf>,

    /// Replay arrivals from a script instead of generating customers
    #[arg(long, value_name = "ARRIVALS")]
    script: Option<PathBuf>,

    /// Independent replications, seeded from the configured seed upwards
    #[arg(long, default_value_t = 1)]
    replications: usize,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,
}

fn report(summary: &RunSummary, json: bool) -> Result<(), SimError> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => StoreConfig::from_json_file(path)?,
        None => StoreConfig::default(),
    };
    info!("store configuration: {:?}", config);

    if let Some(path) = &args.script {
        let arrivals = load_customer_script(path)?;
        info!(
            "replaying {} scripted arrivals from {}",
            arrivals.len(),
            path.display()
        );

        let mut sim = Simulation::with_config(SimulationConfig::default().with_seed(config.seed));
        let (store, _) = GroceryStore::with_script(&mut sim, &config, arrivals)?;
        let mut engine = sim.build()?;
        engine.run_until(config.end_time)?;
        return report(&RunSummary::collect(&store, &engine)?, args.json);
    }

    if args.replications <= 1 {
        let summary = run_store(&config, &SimulationConfig::default())?;
        return report(&summary, args.json);
    }

    let seeds: Vec<u64> = (0..args.replications as u64)
        .map(|i| config.seed.wrapping_add(i))
        .collect();
    let sim_config = SimulationConfig::default().with_concurrency(ConcurrencyMode::Rayon);
    for summary in run_replications(&config, &seeds, &sim_config)? {
        report(&summary, args.json)?;
    }
    Ok(())
}
