//! Genetic-algorithm heuristic for the Euclidean Traveling-Salesman Problem.
//!
//! A population of candidate tours is evolved over a fixed number of
//! generations toward shorter total travel distance:
//!
//! - **Cities**: named points with Euclidean distance ([`City`]).
//! - **Tours**: permutations of city indices with memoized distance
//!   ([`Tour`], [`FitnessEvaluator`]).
//! - **Engine**: ranking, roulette selection, ordered crossover and swap
//!   mutation, driven by one seeded generator ([`GeneticEngine`]).
//!
//! The search is stochastic and gives no optimality guarantee. A fixed seed
//! reproduces a run exactly.

pub mod city;
pub mod error;
pub mod ga;

pub use city::City;
pub use error::{Result, TspError};
pub use ga::{
    EngineState, FitnessEvaluator, GaConfig, GeneticEngine, Population, RankedEntry, RunHistory,
    RunOutcome, RunReport, Tour,
};
