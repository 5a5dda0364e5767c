//! Permutation-preserving genetic operators for tours.
//!
//! # Crossover
//!
//! - [`order_crossover`]: copies a contiguous slice of the father, then
//!   appends the mother's remaining cities in her order.
//! - [`breed_population`]: elite carryover followed by front-with-back
//!   pairing on a shuffled copy of the mating pool.
//!
//! # Mutation
//!
//! - [`swap_mutation`]: per-position swap with a uniformly random position.
//! - [`mutate_population`]: applies [`swap_mutation`] to every tour,
//!   elites included.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use super::types::{Population, Tour};
use rand::Rng;
use u_numflow::random::shuffle;

// ============================================================================
// Crossover operators
// ============================================================================

/// Ordered crossover producing one child.
///
/// # Algorithm
///
/// 1. Draw two independent indices `a`, `b` in `[0, n)`
/// 2. Copy `father[min(a, b)..max(a, b)]` to the front of the child
/// 3. Append every city of `mother`, in her order, not already copied
///
/// The segment is half-open, so it may be empty and the child is then a
/// copy of the mother.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents have different lengths or hold a city index
/// outside `0..n`.
pub fn order_crossover<R: Rng>(father: &Tour, mother: &Tour, rng: &mut R) -> Tour {
    let n = father.len();
    assert_eq!(n, mother.len(), "parents must have equal length");
    if n == 0 {
        return Tour::new(Vec::new());
    }

    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };

    ox_build_child(father.order(), mother.order(), start, end)
}

/// Build the child: `template[start..end]`, then the rest of `donor`.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Tour {
    let n = template.len();
    let mut child = Vec::with_capacity(n);
    let mut in_segment = vec![false; n];

    for &city in &template[start..end] {
        child.push(city);
        in_segment[city] = true;
    }

    child.extend(donor.iter().copied().filter(|&city| !in_segment[city]));

    Tour::new(child)
}

/// Breeds the next set of children from a mating pool.
///
/// The first `elite_size` pool entries are carried over unchanged. A
/// shuffled copy of the whole pool then supplies parents, pairing
/// position `i` with position `len - i - 1`, so elites can also take part
/// in crossover.
///
/// # Panics
/// Panics if `elite_size > pool.len()`.
pub fn breed_population<R: Rng>(pool: &[Tour], elite_size: usize, rng: &mut R) -> Vec<Tour> {
    assert!(
        elite_size <= pool.len(),
        "elite_size exceeds the mating pool"
    );
    let len = pool.len();

    let mut children: Vec<Tour> = pool[..elite_size].to_vec();

    let mut random_pool: Vec<&Tour> = pool.iter().collect();
    shuffle(&mut random_pool, rng);

    for i in 0..len - elite_size {
        children.push(order_crossover(
            random_pool[i],
            random_pool[len - i - 1],
            rng,
        ));
    }

    children
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation applied to a copy of `individual`.
///
/// Each position `i` is, with probability `rate`, exchanged with a
/// uniformly random position `j` (which may equal `i` or an earlier
/// position).
///
/// # Complexity
/// O(n)
pub fn swap_mutation<R: Rng>(individual: &Tour, rate: f64, rng: &mut R) -> Tour {
    let mut mutated = individual.clone();
    let n = mutated.len();
    for i in 0..n {
        if rng.random::<f64>() < rate {
            let j = rng.random_range(0..n);
            mutated.swap(i, j);
        }
    }
    mutated
}

/// Mutates every child, elite carryover included.
pub fn mutate_population<R: Rng>(children: &[Tour], rate: f64, rng: &mut R) -> Population {
    children
        .iter()
        .map(|child| swap_mutation(child, rate, rng))
        .collect::<Vec<_>>()
        .into()
}

// ============================================================================
// Tests
// ============================================================================
