//! Genetic Algorithm for the Euclidean TSP.
//!
//! Candidate tours are permutations of the input cities. Each generation is
//! ranked by fitness (`1 / distance`), elites are carried over, the rest of
//! the mating pool is drawn by roulette wheel, and children are produced by
//! ordered crossover followed by swap mutation.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, elites, mutation, generations)
//! - [`GeneticEngine`]: Executes the evolutionary loop, synchronously or on a worker thread
//! - [`RunReport`]: Per-generation history plus the final population
//!
//! # Submodules
//!
//! - [`operators`]: Ordered crossover and swap mutation on tours
//! - [`selection`]: Ranking and roulette-wheel selection
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{EngineState, GeneticEngine, RunHistory, RunOutcome, RunReport};
pub use types::{FitnessEvaluator, Population, RankedEntry, Tour};
