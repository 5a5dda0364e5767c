//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use crate::error::{Result, TspError};

/// Configuration for the genetic engine.
///
/// # Defaults
///
/// ```
/// use tsp_ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_elite_size(4)
///     .with_mutation_rate(0.01)
///     .with_generations(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of tours in every generation.
    pub population_size: usize,

    /// Number of top-ranked tours carried into the mating pool and the
    /// children unchanged before crossover fills the rest.
    ///
    /// Must not exceed `population_size`. Equal to it, the run degenerates
    /// to pure elite carryover.
    pub elite_size: usize,

    /// Per-position swap probability during mutation (0.0–1.0).
    ///
    /// Applied to elites as well, so the best distance per generation is
    /// not guaranteed to be non-increasing.
    pub mutation_rate: f64,

    /// Number of generations recorded, counting the initial population as
    /// generation 0.
    pub generations: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a seed from entropy; the drawn seed is reported back.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_size: 20,
            mutation_rate: 0.01,
            generations: 100,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the mutation rate. Out-of-range values are rejected by
    /// [`validate`](Self::validate), not clamped.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] describing the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(TspError::invalid("population_size must be at least 1"));
        }
        if self.elite_size > self.population_size {
            return Err(TspError::invalid(format!(
                "elite_size ({}) must not exceed population_size ({})",
                self.elite_size, self.population_size
            )));
        }
        check_mutation_rate(self.mutation_rate)?;
        if self.generations < 1 {
            return Err(TspError::invalid("generations must be at least 1"));
        }
        Ok(())
    }
}

/// Rejects a mutation rate outside `[0.0, 1.0]`, NaN included.
pub(crate) fn check_mutation_rate(rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(TspError::invalid(format!(
            "mutation_rate must be within [0.0, 1.0], got {rate}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.elite_size, 20);
        assert!((config.mutation_rate - 0.01).abs() < 1e-15);
        assert_eq!(config.generations, 100);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_elite_size(4)
            .with_mutation_rate(0.05)
            .with_generations(50)
            .with_seed(42);

        assert_eq!(config.population_size, 20);
        assert_eq!(config.elite_size, 4);
        assert!((config.mutation_rate - 0.05).abs() < 1e-15);
        assert_eq!(config.generations, 50);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_population_zero() {
        let config = GaConfig::default()
            .with_population_size(0)
            .with_elite_size(0);
        assert!(matches!(
            config.validate(),
            Err(TspError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validate_population_one() {
        let config = GaConfig::default()
            .with_population_size(1)
            .with_elite_size(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_elite_bounds() {
        let base = GaConfig::default().with_population_size(10);
        assert!(base.clone().with_elite_size(0).validate().is_ok());
        assert!(base.clone().with_elite_size(10).validate().is_ok());
        assert!(base.with_elite_size(11).validate().is_err());
    }

    #[test]
    fn test_validate_mutation_rate_not_clamped() {
        let config = GaConfig::default().with_mutation_rate(1.5);
        assert!((config.mutation_rate - 1.5).abs() < 1e-15);
        assert!(config.validate().is_err());

        assert!(GaConfig::default().with_mutation_rate(-0.1).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(f64::NAN).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(0.0).validate().is_ok());
        assert!(GaConfig::default().with_mutation_rate(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::default().with_generations(0);
        assert!(config.validate().is_err());
    }
}
