//! Command line front end of the genetic routing engine.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use santa_routing_ga::config::GenAlgConfig;
use santa_routing_ga::problem::OptimizationInput;
use santa_routing_ga::utils::{format_duration, print_routes, save_result, SearchStatistics};
use santa_routing_ga::{GeneticAlgorithm, Solver};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version, about = "Plan multi-day santa routes with a genetic algorithm")]
struct Args {
    /// Problem instance as JSON
    input: PathBuf,

    /// Santas that may be added beyond the ones of the input
    #[arg(long, default_value_t = 0)]
    additional_santas: usize,

    /// Generation cap
    #[arg(long)]
    generations: Option<u64>,

    /// Population size, derived from the instance size when omitted
    #[arg(long)]
    population_size: Option<usize>,

    /// Time limit in seconds
    #[arg(long, default_value_t = 60)]
    time_limit: u64,

    /// Seed of the random stream
    #[arg(long)]
    seed: Option<u64>,

    /// Write the result as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let input = OptimizationInput::from_file(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(
        "Loaded {} visits, {} santas, {} days",
        input.visits.len(),
        input.santas.len(),
        input.days.len()
    );

    let mut config = GenAlgConfig::for_input(&input, args.additional_santas);
    if let Some(generations) = args.generations {
        config = config.with_max_number_of_generations(generations);
    }
    if let Some(size) = args.population_size {
        config = config.with_population_size(size);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut algorithm =
        GeneticAlgorithm::new(input.clone(), config).context("failed to set up the solver")?;
    let seed = algorithm.seed();

    let mut last_reported = 0;
    let result = algorithm.solve(
        Duration::from_secs(args.time_limit),
        &mut |fraction: f64| {
            let percent = (fraction * 100.0) as u32;
            if percent >= last_reported + 10 {
                last_reported = percent;
                info!("Progress: {}%", percent);
            }
        },
        &mut |message: &str| info!("{}", message),
    );

    println!("Search completed in {}", format_duration(result.time_elapsed));
    println!("{}", SearchStatistics::new(&result, &input, seed).format());
    println!();
    print_routes(&result, &input);

    if let Some(path) = args.output {
        save_result(&result, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Saved result to {}", path.display());
    }

    Ok(())
}
