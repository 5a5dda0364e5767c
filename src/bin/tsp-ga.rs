//! Command-line front-end: solves a random TSP instance and prints the
//! convergence history and the best route found.

use clap::Parser;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tsp_ga::{City, GaConfig, GeneticEngine};
use u_numflow::random::create_rng;

#[derive(Parser)]
#[command(name = "tsp-ga", about = "Genetic algorithm for the Euclidean TSP")]
struct Args {
    /// number of random cities
    #[arg(long, default_value_t = 25)]
    cities: usize,

    /// tours per generation
    #[arg(long, default_value_t = 100)]
    population: usize,

    /// top tours carried over unchanged each generation
    #[arg(long, default_value_t = 20)]
    elite: usize,

    /// per-position swap probability
    #[arg(long, default_value_t = 0.01)]
    mutation_rate: f64,

    /// generations, counting the initial population
    #[arg(long, default_value_t = 100)]
    generations: usize,

    /// width of the city grid
    #[arg(long, default_value_t = 500)]
    width: u32,

    /// height of the city grid
    #[arg(long, default_value_t = 500)]
    height: u32,

    /// RNG seed for both city placement and the search
    #[arg(long)]
    seed: Option<u64>,

    /// print the best distance of every generation
    #[arg(long, default_value_t = false)]
    history: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_thread_names(true)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let cities = City::random_grid(args.cities, args.width, args.height, &mut create_rng(seed));
    let config = GaConfig::default()
        .with_population_size(args.population)
        .with_elite_size(args.elite)
        .with_mutation_rate(args.mutation_rate)
        .with_generations(args.generations)
        .with_seed(seed);

    // Results come back on the worker thread; hand them to main over a channel.
    let (tx, rx) = mpsc::channel();
    GeneticEngine::new(cities, config)?
        .on_finish(move |outcome| {
            let _ = tx.send(outcome);
        })
        .spawn()?;

    let report = rx.recv()??;

    if args.history {
        for (generation, (distance, fitness)) in report
            .history
            .distances
            .iter()
            .zip(&report.history.fitnesses)
            .enumerate()
        {
            println!("{generation:>5}  distance {distance:>12.3}  fitness {fitness:.6e}");
        }
    }

    let first = report.history.distances.first().copied().unwrap_or_default();
    let last = report.history.distances.last().copied().unwrap_or_default();
    println!("seed:                {}", report.seed);
    println!("generation 0 best:   {first:.3}");
    println!("final generation:    {last:.3}");

    if let Some(best) = report.best_tour() {
        println!("best route ({:.3}):", report.tour_distance(best)?);
        for city in report.route(best) {
            println!("  {city}");
        }
    }

    Ok(())
}
