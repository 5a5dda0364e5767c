//! Core representation types: tours, populations and fitness evaluation.
//!
//! A [`Tour`] stores indices into the engine's city list rather than the
//! cities themselves. City identity is therefore positional, and duplicate
//! coordinates never confuse the crossover exclusion test.

use crate::city::City;
use crate::error::{Result, TspError};
use std::cell::OnceCell;
use std::sync::Arc;

/// One candidate solution: a cyclic visiting order over all cities.
///
/// The total distance is memoized on first request. An empty cell means
/// "not computed yet"; a computed distance of `0.0` is cached like any other
/// value. Any in-place change goes through [`Tour::swap`], which clears the
/// cache.
#[derive(Debug, Clone)]
pub struct Tour {
    order: Vec<usize>,
    distance: OnceCell<f64>,
}

impl Tour {
    /// Wraps a visiting order of city indices.
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            distance: OnceCell::new(),
        }
    }

    /// City indices in visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Exchanges the cities at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.order.swap(i, j);
        self.distance.take();
    }

    /// Returns the memoized distance, if it was already computed.
    pub fn cached_distance(&self) -> Option<f64> {
        self.distance.get().copied()
    }

    /// Whether this tour visits each of `0..n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.order.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &c in &self.order {
            if c >= n || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }
}

impl PartialEq for Tour {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for Tour {}

impl From<Vec<usize>> for Tour {
    fn from(order: Vec<usize>) -> Self {
        Self::new(order)
    }
}

/// A fixed-size generation of tours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    tours: Vec<Tour>,
}

impl Population {
    pub fn new(tours: Vec<Tour>) -> Self {
        Self { tours }
    }

    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tour> {
        self.tours.iter()
    }
}

impl From<Vec<Tour>> for Population {
    fn from(tours: Vec<Tour>) -> Self {
        Self::new(tours)
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Tour;
    type IntoIter = std::slice::Iter<'a, Tour>;

    fn into_iter(self) -> Self::IntoIter {
        self.tours.iter()
    }
}

/// A ranking view entry: population index and its fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry {
    pub index: usize,
    pub fitness: f64,
}

/// Computes cyclic tour distance and fitness against a fixed city list.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    cities: Arc<[City]>,
}

impl FitnessEvaluator {
    pub fn new(cities: Arc<[City]>) -> Self {
        Self { cities }
    }

    pub fn cities(&self) -> &Arc<[City]> {
        &self.cities
    }

    /// Checks that `tour` visits every city exactly once.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] for a wrong length, a repeated
    /// city or an index outside the city list.
    pub fn check_tour(&self, tour: &Tour) -> Result<()> {
        if tour.is_permutation_of(self.cities.len()) {
            Ok(())
        } else {
            Err(TspError::invalid(format!(
                "tour is not a permutation of the {} cities",
                self.cities.len()
            )))
        }
    }

    /// Total cyclic distance, including the leg from the last city back to
    /// the first. Computed once per tour and cached on it.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if the tour fails
    /// [`check_tour`](Self::check_tour).
    pub fn tour_distance(&self, tour: &Tour) -> Result<f64> {
        if let Some(&distance) = tour.distance.get() {
            return Ok(distance);
        }
        self.check_tour(tour)?;
        Ok(*tour
            .distance
            .get_or_init(|| cyclic_distance(&self.cities, &tour.order)))
    }

    /// Fitness is `1 / distance`.
    ///
    /// # Errors
    /// [`TspError::DegenerateTour`] when the distance is zero, or
    /// [`TspError::InvalidConfiguration`] for a malformed tour.
    pub fn tour_fitness(&self, tour: &Tour) -> Result<f64> {
        let distance = self.tour_distance(tour)?;
        if distance == 0.0 {
            return Err(TspError::degenerate(distance));
        }
        Ok(1.0 / distance)
    }
}

fn cyclic_distance(cities: &[City], order: &[usize]) -> f64 {
    let n = order.len();
    (0..n)
        .map(|i| cities[order[i]].distance(&cities[order[(i + 1) % n]]))
        .sum()
}
