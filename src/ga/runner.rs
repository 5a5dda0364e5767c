//! GA evolutionary loop execution.
//!
//! [`GeneticEngine`] orchestrates the complete evolutionary process:
//! seeding → ranking → selection → crossover → mutation → repeat.
//!
//! The engine owns its [`FitnessEvaluator`], its configuration and a single
//! seeded generator. It runs either synchronously with [`GeneticEngine::run`]
//! or on a dedicated worker thread with [`GeneticEngine::spawn`].

use super::config::{check_mutation_rate, GaConfig};
use super::operators::{breed_population, mutate_population, order_crossover, swap_mutation};
use super::selection::{rank_population, roulette_selection};
use super::types::{FitnessEvaluator, Population, RankedEntry, Tour};
use crate::city::City;
use crate::error::{Result, TspError};
use rand::rngs::SmallRng;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::instrument;
use u_numflow::random::{create_rng, shuffled_indices};

/// What the completion callback receives: the report, or why the run failed.
pub type RunOutcome = Result<RunReport>;

type FinishCallback = Box<dyn FnOnce(RunOutcome) + Send + 'static>;

/// Lifecycle of an engine. There is no pause, resume or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Running,
    Finished,
}

/// Best distance and fitness per generation, generation 0 first.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunHistory {
    pub distances: Vec<f64>,
    pub fitnesses: Vec<f64>,
}

impl RunHistory {
    fn with_capacity(n: usize) -> Self {
        Self {
            distances: Vec::with_capacity(n),
            fitnesses: Vec::with_capacity(n),
        }
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Shortest best-of-generation distance seen over the run.
    pub fn best_distance(&self) -> Option<f64> {
        self.distances.iter().copied().min_by(f64::total_cmp)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Best distance and fitness of every generation.
    pub history: RunHistory,

    /// The last generation, in breeding order (not ranked).
    pub final_population: Population,

    /// Seed the run was driven by. Feed it back through
    /// [`GaConfig::with_seed`] to replay the run.
    pub seed: u64,

    cities: Arc<[City]>,
}

impl RunReport {
    /// Cities the tours index into.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Shortest tour of the final population (first one on ties).
    pub fn best_tour(&self) -> Option<&Tour> {
        let evaluator = FitnessEvaluator::new(Arc::clone(&self.cities));
        self.final_population
            .iter()
            .filter_map(|tour| Some((tour, evaluator.tour_distance(tour).ok()?)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(tour, _)| tour)
    }

    /// Total cyclic distance of `tour`.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if `tour` is not a permutation of
    /// this run's cities.
    pub fn tour_distance(&self, tour: &Tour) -> Result<f64> {
        FitnessEvaluator::new(Arc::clone(&self.cities)).tour_distance(tour)
    }

    /// Resolves a tour's indices to its cities in visiting order.
    ///
    /// # Panics
    /// Panics on an index outside this run's cities.
    pub fn route<'a>(&'a self, tour: &'a Tour) -> impl Iterator<Item = &'a City> + 'a {
        tour.order().iter().map(move |&i| &self.cities[i])
    }
}

/// Genetic-algorithm engine for one TSP run.
///
/// # Usage
///
/// ```
/// use tsp_ga::{City, GaConfig, GeneticEngine};
///
/// let cities = vec![
///     City::new(0.0, 0.0, "A"),
///     City::new(0.0, 10.0, "B"),
///     City::new(10.0, 10.0, "C"),
///     City::new(10.0, 0.0, "D"),
/// ];
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_elite_size(4)
///     .with_generations(10)
///     .with_seed(42);
///
/// let mut engine = GeneticEngine::new(cities, config)?;
/// let report = engine.run()?;
/// assert_eq!(report.history.len(), 10);
/// # Ok::<(), tsp_ga::TspError>(())
/// ```
///
/// # Threading
///
/// [`spawn`](Self::spawn) moves the engine onto its own thread and calls the
/// completion callback there. A consumer that is not thread-safe, such as UI
/// state, must marshal the outcome back to its own thread itself, for
/// example through a channel.
pub struct GeneticEngine {
    config: GaConfig,
    evaluator: FitnessEvaluator,
    rng: SmallRng,
    seed: u64,
    population: Population,
    state: EngineState,
    on_finish: Option<FinishCallback>,
}

impl fmt::Debug for GeneticEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneticEngine")
            .field("config", &self.config)
            .field("cities", &self.evaluator.cities().len())
            .field("seed", &self.seed)
            .field("population", &self.population.len())
            .field("state", &self.state)
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

impl GeneticEngine {
    /// Validates the inputs and prepares an engine.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if there are fewer than two cities,
    /// a coordinate is not finite, or [`GaConfig::validate`] fails.
    #[instrument(level = "debug", skip_all, fields(
        population_size = config.population_size,
        elite_size = config.elite_size,
        generations = config.generations
    ))]
    pub fn new(cities: impl Into<Arc<[City]>>, config: GaConfig) -> Result<Self> {
        let cities: Arc<[City]> = cities.into();
        if cities.len() < 2 {
            return Err(TspError::invalid(format!(
                "at least 2 cities are required, got {}",
                cities.len()
            )));
        }
        if let Some(city) = cities
            .iter()
            .find(|c| !c.x().is_finite() || !c.y().is_finite())
        {
            return Err(TspError::invalid(format!(
                "city {} has a non-finite coordinate",
                city.name()
            )));
        }
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::debug!(cities = cities.len(), seed, "engine configured");

        Ok(Self {
            config,
            evaluator: FitnessEvaluator::new(cities),
            rng: create_rng(seed),
            seed,
            population: Population::default(),
            state: EngineState::NotStarted,
            on_finish: None,
        })
    }

    /// Registers the callback that receives the outcome once the run ends.
    pub fn on_finish<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(RunOutcome) + Send + 'static,
    {
        self.on_finish = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn cities(&self) -> &[City] {
        self.evaluator.cities()
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Current generation. Empty until the population is created.
    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // ---- Operations ----

    /// Replaces the current population with `size` independent random
    /// permutations of all cities.
    pub fn create_population(&mut self, size: usize) -> &Population {
        let n = self.evaluator.cities().len();
        self.population = (0..size)
            .map(|_| Tour::new(shuffled_indices(n, &mut self.rng)))
            .collect::<Vec<_>>()
            .into();
        &self.population
    }

    /// Ranks `population` by fitness, best first.
    pub fn rank_population(&self, population: &Population) -> Result<Vec<RankedEntry>> {
        rank_population(population, &self.evaluator)
    }

    /// Builds a mating pool from the current population and its ranking.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if `elite_size` exceeds the ranking
    /// or the ranking does not cover the current population.
    pub fn selection(&mut self, ranked: &[RankedEntry], elite_size: usize) -> Result<Vec<Tour>> {
        if elite_size > ranked.len() {
            return Err(TspError::invalid(format!(
                "elite_size ({elite_size}) exceeds ranked population ({})",
                ranked.len()
            )));
        }
        if ranked.iter().any(|e| e.index >= self.population.len()) {
            return Err(TspError::invalid(
                "ranking refers to tours outside the current population",
            ));
        }
        Ok(roulette_selection(
            &self.population,
            ranked,
            elite_size,
            &mut self.rng,
        ))
    }

    /// Ordered crossover of two parents.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if the parents differ in length
    /// or either one is not a permutation of the engine's cities.
    pub fn breed(&mut self, father: &Tour, mother: &Tour) -> Result<Tour> {
        if father.len() != mother.len() {
            return Err(TspError::invalid("parents must have equal length"));
        }
        self.evaluator.check_tour(father)?;
        self.evaluator.check_tour(mother)?;
        Ok(order_crossover(father, mother, &mut self.rng))
    }

    /// Elite carryover plus crossover children, `pool.len()` in total.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if `elite_size` exceeds the pool
    /// or a pool tour is not a permutation of the engine's cities.
    pub fn breed_population(&mut self, pool: &[Tour], elite_size: usize) -> Result<Vec<Tour>> {
        if elite_size > pool.len() {
            return Err(TspError::invalid(format!(
                "elite_size ({elite_size}) exceeds mating pool ({})",
                pool.len()
            )));
        }
        for tour in pool {
            self.evaluator.check_tour(tour)?;
        }
        Ok(breed_population(pool, elite_size, &mut self.rng))
    }

    /// Swap-mutates a copy of `individual`.
    ///
    /// # Errors
    /// [`TspError::InvalidConfiguration`] if `mutation_rate` is outside
    /// `[0.0, 1.0]` or NaN.
    pub fn mutate(&mut self, individual: &Tour, mutation_rate: f64) -> Result<Tour> {
        check_mutation_rate(mutation_rate)?;
        Ok(swap_mutation(individual, mutation_rate, &mut self.rng))
    }

    /// Mutates every child, elites included.
    ///
    /// # Errors
    /// Same as [`mutate`](Self::mutate).
    pub fn mutate_population(
        &mut self,
        children: &[Tour],
        mutation_rate: f64,
    ) -> Result<Population> {
        check_mutation_rate(mutation_rate)?;
        Ok(mutate_population(children, mutation_rate, &mut self.rng))
    }

    /// Rank → select → breed → mutate; replaces the current population.
    ///
    /// # Errors
    /// [`TspError::DegenerateTour`] if any tour has zero distance, or
    /// [`TspError::InvalidConfiguration`] if no population was created yet
    /// while `elite_size > 0`.
    #[instrument(level = "debug", skip(self), fields(population = self.population.len()))]
    pub fn next_generation(&mut self) -> Result<()> {
        let elite_size = self.config.elite_size;
        let mutation_rate = self.config.mutation_rate;

        let ranked = self.rank_population(&self.population)?;
        let pool = self.selection(&ranked, elite_size)?;
        let children = self.breed_population(&pool, elite_size)?;
        self.population = self.mutate_population(&children, mutation_rate)?;
        Ok(())
    }

    // ---- Execution ----

    /// Runs the full generational loop on the calling thread.
    ///
    /// The outcome also goes to the registered callback, if any.
    ///
    /// # Errors
    /// [`TspError::AlreadyStarted`] on a second call, or the failure that
    /// aborted the run.
    pub fn run(&mut self) -> Result<RunReport> {
        let outcome = self.execute();
        if let Some(callback) = self.on_finish.take() {
            callback(outcome.clone());
        }
        outcome
    }

    /// Launches the run on a dedicated worker thread and returns at once.
    ///
    /// The outcome is delivered only through the callback, on the worker
    /// thread. A panic inside the run is caught and delivered as
    /// [`TspError::WorkerAborted`], so the callback is never left pending.
    ///
    /// # Errors
    /// Fails only if the OS refuses to create the thread.
    pub fn spawn(mut self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("tsp-ga-worker".into())
            .spawn(move || {
                let callback = self.on_finish.take();
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute()))
                    .unwrap_or_else(|payload| {
                        let reason = panic_message(payload.as_ref());
                        tracing::error!(%reason, "worker panicked");
                        Err(TspError::aborted(reason))
                    });
                if let Some(callback) = callback {
                    callback(outcome);
                }
            })
    }

    fn execute(&mut self) -> Result<RunReport> {
        if self.state != EngineState::NotStarted {
            return Err(TspError::AlreadyStarted);
        }
        self.state = EngineState::Running;
        tracing::info!(
            cities = self.evaluator.cities().len(),
            population_size = self.config.population_size,
            generations = self.config.generations,
            seed = self.seed,
            "run started"
        );

        let outcome = self.evolve();
        self.state = EngineState::Finished;

        match &outcome {
            Ok(report) => tracing::info!(
                best_distance = ?report.history.best_distance(),
                "run finished"
            ),
            Err(err) => tracing::error!(%err, "run aborted"),
        }
        outcome
    }

    fn evolve(&mut self) -> Result<RunReport> {
        let generations = self.config.generations;
        let mut history = RunHistory::with_capacity(generations);

        self.create_population(self.config.population_size);
        self.record_best(0, &mut history)?;

        for generation in 1..generations {
            self.next_generation()?;
            self.record_best(generation, &mut history)?;
        }

        Ok(RunReport {
            history,
            final_population: self.population.clone(),
            seed: self.seed,
            cities: Arc::clone(self.evaluator.cities()),
        })
    }

    fn record_best(&self, generation: usize, history: &mut RunHistory) -> Result<()> {
        let ranked = self.rank_population(&self.population)?;
        let best = ranked
            .first()
            .ok_or_else(|| TspError::invalid("population is empty"))?;
        let distance = self
            .evaluator
            .tour_distance(&self.population.tours()[best.index])?;

        tracing::debug!(generation, best_distance = distance, "generation ranked");
        history.distances.push(distance);
        history.fitnesses.push(best.fitness);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
