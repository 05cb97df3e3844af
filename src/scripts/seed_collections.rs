use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use logistics_db_rust::config::AppConfig;
use logistics_db_rust::pipeline::{run_city_reduction, run_plane_seeding, sample_rng};
use logistics_db_rust::seed::{load_seed_data, read_world_cities_csv};
use logistics_db_rust::store::WorldCityStore;
use logistics_db_rust::{connect_postgres, init_logging};

/// Rebuild the `cities` and `planes` collections from the raw world cities dataset
#[derive(Parser)]
#[command(name = "seed-collections")]
#[command(about = "Reduce the world cities dataset and seed the cargo fleet", long_about = None)]
struct Cli {
    /// Replace the raw dataset with this worldcities.csv before seeding
    #[arg(long, value_name = "CSV")]
    import: Option<PathBuf>,

    /// Replace the raw dataset with the built-in sample before seeding
    #[arg(long, conflicts_with = "import")]
    demo: bool,

    /// Seed for the plane sample (overrides seeding.sample_seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Only rebuild the cities collection
    #[arg(long, conflicts_with = "planes_only")]
    cities_only: bool,

    /// Only rebuild the planes collection from the existing cities
    #[arg(long)]
    planes_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    init_logging();

    let mut config = AppConfig::load()?;
    if cli.seed.is_some() {
        config.seeding.sample_seed = cli.seed;
    }

    let store = connect_postgres(&config)
        .await
        .context("Failed to connect to the logistics database")?;
    println!("Connected to database.");

    if let Some(path) = &cli.import {
        println!("Importing {}...", path.display());
        let world_cities = read_world_cities_csv(path)?;
        let count = store.replace_world_cities(world_cities).await?;
        println!("Imported {} raw cities", count);
    } else if cli.demo {
        let count = load_seed_data(&store).await?;
        println!("Loaded {} built-in raw cities", count);
    }

    if !cli.planes_only {
        let report = run_city_reduction(&store, &config.seeding).await?;
        println!(
            "{} -> {}: {} read, {} written",
            report.source, report.destination, report.read, report.written
        );
    }

    if !cli.cities_only {
        let mut rng = sample_rng(config.seeding.sample_seed);
        let report = run_plane_seeding(&store, &config.seeding, &mut rng).await?;
        println!(
            "{} -> {}: {} read, {} written",
            report.source, report.destination, report.read, report.written
        );
    }

    println!("Seeding complete.");
    Ok(())
}
