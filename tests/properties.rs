//! Property tests for the genetic operators.

use proptest::prelude::*;
use std::sync::Arc;
use tsp_ga::ga::operators::{breed_population, order_crossover, swap_mutation};
use tsp_ga::ga::selection::{rank_population, roulette_selection};
use tsp_ga::{City, FitnessEvaluator, Population, Tour};
use u_numflow::random::{create_rng, shuffled_indices};

fn cities_strategy() -> impl Strategy<Value = Vec<City>> {
    prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 2..30).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| City::new(x, y, i.to_string()))
            .collect()
    })
}

proptest! {
    #[test]
    fn crossover_yields_permutation(n in 1usize..40, seed in any::<u64>()) {
        let mut rng = create_rng(seed);
        let father = Tour::new(shuffled_indices(n, &mut rng));
        let mother = Tour::new(shuffled_indices(n, &mut rng));
        let child = order_crossover(&father, &mother, &mut rng);
        prop_assert!(child.is_permutation_of(n));
    }

    #[test]
    fn crossover_with_itself_keeps_city_set(n in 1usize..40, seed in any::<u64>()) {
        let mut rng = create_rng(seed);
        let parent = Tour::new(shuffled_indices(n, &mut rng));
        let child = order_crossover(&parent, &parent, &mut rng);
        prop_assert_eq!(child.len(), parent.len());
        prop_assert!(child.is_permutation_of(n));
    }

    #[test]
    fn mutation_yields_permutation(n in 1usize..40, rate in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = create_rng(seed);
        let tour = Tour::new(shuffled_indices(n, &mut rng));
        prop_assert!(swap_mutation(&tour, rate, &mut rng).is_permutation_of(n));
    }

    #[test]
    fn zero_rate_mutation_is_identity(n in 1usize..40, seed in any::<u64>()) {
        let mut rng = create_rng(seed);
        let tour = Tour::new(shuffled_indices(n, &mut rng));
        prop_assert_eq!(swap_mutation(&tour, 0.0, &mut rng), tour);
    }

    #[test]
    fn fitness_is_reciprocal_of_distance(cities in cities_strategy(), seed in any::<u64>()) {
        let n = cities.len();
        let evaluator = FitnessEvaluator::new(Arc::from(cities));
        let tour = Tour::new(shuffled_indices(n, &mut create_rng(seed)));
        let distance = evaluator.tour_distance(&tour).unwrap();
        prop_assume!(distance > 0.0);
        prop_assert_eq!(evaluator.tour_fitness(&tour).unwrap(), 1.0 / distance);
    }

    #[test]
    fn ranking_is_non_increasing(cities in cities_strategy(), size in 1usize..25, seed in any::<u64>()) {
        let n = cities.len();
        let evaluator = FitnessEvaluator::new(Arc::from(cities));
        let mut rng = create_rng(seed);
        let population: Population = (0..size)
            .map(|_| Tour::new(shuffled_indices(n, &mut rng)))
            .collect::<Vec<_>>()
            .into();
        prop_assume!(population.iter().all(|t| evaluator.tour_distance(t).unwrap() > 0.0));

        let ranked = rank_population(&population, &evaluator).unwrap();
        prop_assert_eq!(ranked.len(), size);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].fitness >= pair[1].fitness);
        }
        let max = population
            .iter()
            .map(|t| evaluator.tour_fitness(t).unwrap())
            .fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(ranked[0].fitness, max);
    }

    #[test]
    fn selection_and_breeding_keep_size_and_elites(
        n in 2usize..20,
        size in 1usize..25,
        elite_frac in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let cities: Vec<City> = (0..n).map(|i| City::new(i as f64, (i * i) as f64, i.to_string())).collect();
        let evaluator = FitnessEvaluator::new(Arc::from(cities));
        let mut rng = create_rng(seed);
        let population: Population = (0..size)
            .map(|_| Tour::new(shuffled_indices(n, &mut rng)))
            .collect::<Vec<_>>()
            .into();
        let elite = ((size as f64) * elite_frac) as usize;

        let ranked = rank_population(&population, &evaluator).unwrap();
        let pool = roulette_selection(&population, &ranked, elite, &mut rng);
        prop_assert_eq!(pool.len(), size);
        for (slot, entry) in ranked.iter().take(elite).enumerate() {
            prop_assert_eq!(&pool[slot], &population.tours()[entry.index]);
        }

        let children = breed_population(&pool, elite, &mut rng);
        prop_assert_eq!(children.len(), size);
        prop_assert_eq!(&children[..elite], &pool[..elite]);
        prop_assert!(children.iter().all(|c| c.is_permutation_of(n)));
    }
}
