// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use skyroute_core::airports::{extract_iata, AirportTable};
use skyroute_core::aircraft::AircraftCatalog;
use skyroute_core::config::OptimizerConfig;
use skyroute_core::network::{DataPaths, RouteNetwork};
use skyroute_core::optimizer::{optimize_route, OptimizationResult};
use skyroute_core::weather::{NoWeather, WeatherApiClient, WeatherProvider};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airports CSV (Name, IATA, City, Country, Latitude, Longitude)
    #[arg(long, env = "SKYROUTE_AIRPORTS", default_value = "airports.csv")]
    airports: PathBuf,

    /// Airline routes JSON
    #[arg(long, env = "SKYROUTE_ROUTES", default_value = "airline_routes.json")]
    routes: PathBuf,

    /// Aircraft CSV (Aircraft Model, Max Range (NM), Max Operation Mach No)
    #[arg(long, env = "SKYROUTE_AIRCRAFT", default_value = "Aircrafts.csv")]
    aircraft_csv: PathBuf,

    /// Optimizer config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the cheapest route between two airports
    Optimize {
        /// Source airport: IATA code or "Name (IATA)"
        #[arg(long)]
        from: String,
        /// Destination airport: IATA code or "Name (IATA)"
        #[arg(long)]
        to: String,
        /// Restrict to these aircraft models (repeatable; default: all)
        #[arg(long = "aircraft")]
        aircraft: Vec<String>,
        #[arg(long)]
        population: Option<usize>,
        #[arg(long)]
        generations: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// weatherapi.com key
        #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
        weather_api_key: Option<String>,
        /// Score without live weather
        #[arg(long)]
        no_weather: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the aircraft catalog
    Aircraft,
    /// Suggest airports whose name or code matches a query
    Airports { query: String },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("skyroute")
        .build();
    // A logger may already be installed when embedded; nothing to do then
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Optimize {
            from,
            to,
            aircraft,
            population,
            generations,
            seed,
            weather_api_key,
            no_weather,
            json,
        } => {
            let mut config = match &cli.config {
                Some(path) => OptimizerConfig::load_from(path),
                None => OptimizerConfig::load(),
            };
            if let Some(n) = population {
                config.population_size = *n;
            }
            if let Some(n) = generations {
                config.generations = *n;
            }
            if seed.is_some() {
                config.seed = *seed;
            }
            if *no_weather {
                config.weather.enabled = false;
            }
            if weather_api_key.is_some() {
                config.weather.api_key = weather_api_key.clone();
            }

            let source = extract_iata(from);
            let destination = extract_iata(to);
            let paths = DataPaths {
                airports: cli.airports.clone(),
                routes: cli.routes.clone(),
                aircraft: cli.aircraft_csv.clone(),
            };

            let result = run_optimization(&paths, &source, &destination, aircraft, &config)
                .context("Optimization failed")?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Commands::Aircraft => {
            let catalog = AircraftCatalog::from_path(&cli.aircraft_csv).with_context(|| {
                format!("Failed to load aircraft from {}", cli.aircraft_csv.display())
            })?;
            println!("{:<40} {:>10} {:>6}", "Model", "Range km", "Mach");
            for (name, spec) in catalog.iter() {
                println!("{:<40} {:>10.2} {:>6.2}", name, spec.range_km, spec.mach);
            }
        }
        Commands::Airports { query } => {
            let table = AirportTable::from_path(&cli.airports).with_context(|| {
                format!("Failed to load airports from {}", cli.airports.display())
            })?;
            let hits = table.search(query);
            if hits.is_empty() {
                println!("No airport found matching '{}'", query);
            }
            for hit in hits {
                println!("{}", hit);
            }
        }
    }

    Ok(())
}

fn run_optimization(
    paths: &DataPaths,
    source: &str,
    destination: &str,
    aircraft: &[String],
    config: &OptimizerConfig,
) -> Result<OptimizationResult> {
    let network = RouteNetwork::load(paths)?;

    let provider: Box<dyn WeatherProvider> = match (&config.weather.api_key, config.weather.enabled) {
        (Some(key), true) => Box::new(WeatherApiClient::new(&config.weather, key.clone())?),
        (None, true) => {
            log::warn!("No weather API key configured; scoring without weather");
            Box::new(NoWeather)
        }
        (_, false) => Box::new(NoWeather),
    };

    let result = optimize_route(
        &network,
        source,
        destination,
        aircraft,
        config,
        provider.as_ref(),
    )?;
    Ok(result)
}

fn print_result(result: &OptimizationResult) {
    println!("Optimized Route: {}", result.best_route);
    println!("Sequence:        {}", result.route_sequence.join(", "));
    println!("Total Cost:      {:.2}", result.total_cost);
    println!("Total Distance:  {:.1} km", result.total_distance_km);

    if result.evaluation.infeasible_direct {
        println!("(Direct flight exceeds aircraft range)");
        return;
    }
    println!();
    println!(
        "{:<5} {:<5} {:>10} {:>10} {:>9} {:>8}",
        "From", "To", "Dist km", "Cost", "Weather", "InRange"
    );
    for leg in &result.evaluation.legs {
        let weather = leg
            .weather_penalty
            .map_or_else(|| "-".to_string(), |p| format!("{:.0}", p));
        let marker = if leg.extreme_weather { "!" } else { "" };
        println!(
            "{:<5} {:<5} {:>10.1} {:>10.1} {:>8}{:1} {:>8}",
            leg.from,
            leg.to,
            leg.distance_km,
            leg.cost,
            weather,
            marker,
            if leg.within_range { "yes" } else { "no" }
        );
    }
    if let Some(p) = result.evaluation.arrival_weather_penalty {
        println!("Arrival weather penalty: {:.0}", p);
    }
}
