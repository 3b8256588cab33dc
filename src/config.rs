//! Configuration parameters for the genetic algorithm.

use crate::error::{Error, Result};
use crate::problem::OptimizationInput;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Population size for small instances.
const POPULATION_SIZE_DEFAULT: usize = 262_144;
/// Population size for large instances.
const POPULATION_SIZE_BIGGER: usize = 16;

/// Configuration settings for the genetic algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenAlgConfig {
    /// Santa slots per day, input santas plus additional santas
    pub max_number_of_santas: usize,
    pub max_number_of_generations: u64,
    pub population_size: usize,
    /// Share of the population copied unchanged into the next generation
    pub elitism_percentage: f64,
    /// Share of the next generation created by mutating selected individuals
    pub direct_mutation_percentage: f64,
    /// Share of the next generation created at random
    pub random_percentage: f64,
    pub order_based_crossover_probability: f64,
    /// Offspring is left unmutated when a uniform draw falls below this value
    pub mutation_probability: f64,
    /// Chance of position mutation instead of inversion mutation
    pub position_mutation_probability: f64,
    pub time_limit: Option<Duration>,
    /// Seed of the random stream, drawn at random when absent
    pub seed: Option<u64>,
}

impl Default for GenAlgConfig {
    fn default() -> Self {
        GenAlgConfig {
            max_number_of_santas: 1,
            max_number_of_generations: u64::MAX,
            population_size: POPULATION_SIZE_DEFAULT,
            elitism_percentage: 0.357,
            direct_mutation_percentage: 0.378,
            random_percentage: 0.0,
            order_based_crossover_probability: 0.884,
            mutation_probability: 0.0,
            position_mutation_probability: 0.886,
            time_limit: None,
            seed: None,
        }
    }
}

impl GenAlgConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        GenAlgConfig::default()
    }

    /// Configuration sized for an input, allowing `max_number_of_additional_santas`
    /// santas beyond the ones of the input.
    pub fn for_input(input: &OptimizationInput, max_number_of_additional_santas: usize) -> Self {
        GenAlgConfig {
            max_number_of_santas: input.santas.len() + max_number_of_additional_santas,
            population_size: Self::calculate_population_size(input.number_of_alleles()),
            ..GenAlgConfig::default()
        }
    }

    /// Population size for `x` day-instantiated visits.
    ///
    /// Small instances are cheap to decode and get a large population, large
    /// instances are capped to bound the cost of a generation.
    pub fn calculate_population_size(x: usize) -> usize {
        let x = x as f64;
        let y = if x <= 34.0 {
            POPULATION_SIZE_DEFAULT as f64
        } else if x <= 50.0 {
            // linear interpolation
            -8192.0 * x + 540_672.0
        } else if x < 200.0 {
            // exponential decay fitted to measurements
            (-250.92 + 1_036_717.0 * (-0.041_323_1 * x).exp()).round()
        } else {
            POPULATION_SIZE_BIGGER as f64
        };
        y as usize
    }

    /// Number of elite individuals per generation, at least one.
    pub fn number_of_elites(&self) -> usize {
        (self.elitism_percentage * self.population_size as f64).max(1.0) as usize
    }

    pub fn number_of_direct_mutations(&self) -> usize {
        (self.direct_mutation_percentage * self.population_size as f64) as usize
    }

    pub fn number_of_random_individuals(&self) -> usize {
        (self.random_percentage * self.population_size as f64) as usize
    }

    /// Returns if this is a valid configuration.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the configuration, naming the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.max_number_of_santas < 1 {
            return Err(Error::InvalidConfig(
                "max number of santas must be at least 1".into(),
            ));
        }
        // one individual for elitism plus one regular individual
        if self.population_size < 2 {
            return Err(Error::InvalidConfig(
                "population size must be at least 2".into(),
            ));
        }

        if !(self.elitism_percentage > 0.0 && self.elitism_percentage < 1.0) {
            return Err(Error::InvalidConfig(
                "elitism percentage must lie in (0, 1)".into(),
            ));
        }
        let fractions = [
            ("direct mutation percentage", self.direct_mutation_percentage),
            ("random percentage", self.random_percentage),
            ("mutation probability", self.mutation_probability),
            (
                "order based crossover probability",
                self.order_based_crossover_probability,
            ),
            (
                "position mutation probability",
                self.position_mutation_probability,
            ),
        ];
        if let Some((name, value)) = fractions
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            return Err(Error::InvalidConfig(format!(
                "{name} must lie in [0, 1], got {value}"
            )));
        }

        // make sure the population size is stable
        let size = self.number_of_elites()
            + self.number_of_direct_mutations()
            + self.number_of_random_individuals();
        if size > self.population_size {
            return Err(Error::InvalidConfig(format!(
                "elitism, direct mutation and random shares need {} of {} individuals",
                size, self.population_size
            )));
        }

        Ok(())
    }

    /// Set the maximum number of santas per day.
    pub fn with_max_number_of_santas(mut self, santas: usize) -> Self {
        self.max_number_of_santas = santas;
        self
    }

    /// Set the generation cap.
    pub fn with_max_number_of_generations(mut self, generations: u64) -> Self {
        self.max_number_of_generations = generations;
        self
    }

    /// Set the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the elitism share.
    pub fn with_elitism_percentage(mut self, percentage: f64) -> Self {
        self.elitism_percentage = percentage;
        self
    }

    /// Set the direct mutation share.
    pub fn with_direct_mutation_percentage(mut self, percentage: f64) -> Self {
        self.direct_mutation_percentage = percentage;
        self
    }

    /// Set the random individual share.
    pub fn with_random_percentage(mut self, percentage: f64) -> Self {
        self.random_percentage = percentage;
        self
    }

    pub fn with_order_based_crossover_probability(mut self, probability: f64) -> Self {
        self.order_based_crossover_probability = probability;
        self
    }

    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    pub fn with_position_mutation_probability(mut self, probability: f64) -> Self {
        self.position_mutation_probability = probability;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the seed of the random stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
