//! Ranking and fitness-proportionate selection.
//!
//! Fitness is maximized here: a shorter tour has a larger `1 / distance`
//! and therefore a wider slice of the roulette wheel.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{FitnessEvaluator, Population, RankedEntry, Tour};
use crate::error::Result;
use rand::Rng;

/// Ranks a population by fitness, best first.
///
/// The sort is stable, so entries with equal fitness keep their population
/// order and a seeded run stays reproducible.
///
/// # Errors
/// Propagates [`TspError::DegenerateTour`](crate::TspError::DegenerateTour)
/// from the first tour with zero distance, or
/// [`TspError::InvalidConfiguration`](crate::TspError::InvalidConfiguration)
/// from the first tour that is not a permutation of the cities.
pub fn rank_population(
    population: &Population,
    evaluator: &FitnessEvaluator,
) -> Result<Vec<RankedEntry>> {
    let mut ranked = population
        .iter()
        .enumerate()
        .map(|(index, tour)| {
            evaluator
                .tour_fitness(tour)
                .map(|fitness| RankedEntry { index, fitness })
        })
        .collect::<Result<Vec<_>>>()?;

    ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    Ok(ranked)
}

/// Builds a mating pool of `ranked.len()` tours.
///
/// The top `elite_size` ranked tours come first in rank order. Remaining
/// slots are filled by roulette-wheel sampling with replacement.
///
/// # Panics
/// Panics if `elite_size > ranked.len()` or a ranked index is out of bounds
/// for `population`.
pub fn roulette_selection<R: Rng>(
    population: &Population,
    ranked: &[RankedEntry],
    elite_size: usize,
    rng: &mut R,
) -> Vec<Tour> {
    assert!(
        elite_size <= ranked.len(),
        "elite_size exceeds the ranked population"
    );

    let mut pool: Vec<Tour> = Vec::with_capacity(ranked.len());
    pool.extend(
        ranked[..elite_size]
            .iter()
            .map(|entry| population.tours()[entry.index].clone()),
    );

    let wheel = cumulative_weights(ranked);
    for _ in elite_size..ranked.len() {
        let pick: f64 = rng.random();
        let slot = spin(&wheel, pick);
        pool.push(population.tours()[ranked[slot].index].clone());
    }

    pool
}

/// Prefix sums of fitness normalized by total fitness; the last entry is 1.
fn cumulative_weights(ranked: &[RankedEntry]) -> Vec<f64> {
    let total: f64 = ranked.iter().map(|e| e.fitness).sum();
    let mut acc = 0.0;
    ranked
        .iter()
        .map(|e| {
            acc += e.fitness;
            acc / total
        })
        .collect()
}

/// Index of the first slot whose cumulative weight is `>= pick`.
fn spin(wheel: &[f64], pick: f64) -> usize {
    wheel
        .partition_point(|&c| c < pick)
        .min(wheel.len().saturating_sub(1)) // floating-point fallback
}
