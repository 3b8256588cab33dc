//! # Santa Routing GA
//!
//! A genetic algorithm for the multi-day vehicle routing problem with time
//! windows, availability constraints and recurring breaks.
//!
//! Candidate schedules are encoded as a flat permutation of visit alleles and
//! separators. Separators cut the permutation into one segment per day and
//! santa; every break has one allele per day which is kept on its day by a
//! repair step. Time windows are not enforced structurally: decoded routes are
//! scored by a cost function that penalizes violations.

pub mod config;
pub mod cost;
pub mod decoder;
pub mod error;
pub mod fitness;
pub mod genetic;
pub mod genotype;
pub mod individual;
pub mod mutation;
pub mod population;
pub mod problem;
pub mod repair;
pub mod solution;
pub mod utils;

use crate::config::GenAlgConfig;
use crate::cost::{CostFunction, WeightedCost};
use crate::decoder::Decoder;
use crate::error::Result;
use crate::fitness::FitnessEvaluator;
use crate::genetic::Genetic;
use crate::genotype::Genotype;
use crate::individual::Individual;
use crate::mutation::MutationOperation;
use crate::population::{Population, PopulationGenerator};
use crate::problem::OptimizationInput;
use crate::solution::{OptimizationResult, ResultState, Route};

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Common contract of all solving strategies.
pub trait Solver {
    /// Solve within `time_limit`, reporting progress in `[0, 1]` and
    /// human readable messages.
    fn solve(
        &mut self,
        time_limit: Duration,
        progress: &mut dyn FnMut(f64),
        message: &mut dyn FnMut(&str),
    ) -> OptimizationResult;
}

/// The generational controller of the genetic algorithm.
///
/// All randomness comes from one seeded stream, so a run without time limit
/// is reproducible from its seed.
pub struct GeneticAlgorithm<C = WeightedCost> {
    pub input: OptimizationInput,
    pub config: GenAlgConfig,
    pub population: Population,
    pub best: Option<Individual>,
    pub generation: u64,
    pub run_time: Duration,
    generator: PopulationGenerator,
    mutation: MutationOperation,
    evaluator: FitnessEvaluator<C>,
    rng: ChaCha8Rng,
    seed: u64,
    cancelled: Arc<AtomicBool>,
    start_time: Instant,
}

impl GeneticAlgorithm<WeightedCost> {
    /// Create a new instance scored with the default weighted cost.
    pub fn new(input: OptimizationInput, config: GenAlgConfig) -> Result<Self> {
        Self::with_cost_function(input, config, WeightedCost::default())
    }
}

impl<C: CostFunction> GeneticAlgorithm<C> {
    /// Create a new instance with a custom cost function.
    ///
    /// Input and configuration are validated here, before any search starts.
    pub fn with_cost_function(
        input: OptimizationInput,
        config: GenAlgConfig,
        cost_function: C,
    ) -> Result<Self> {
        input.validate()?;
        config.validate()?;

        let generator = PopulationGenerator::new(&input, config.max_number_of_santas)?;
        let decoder = Decoder::new(&input, config.max_number_of_santas);
        let seed = config.seed.unwrap_or_else(rand::random);

        info!(
            "Genetic algorithm for {} visits, {} days, {} santa slots (seed {})",
            input.visits.len(),
            input.days.len(),
            config.max_number_of_santas,
            seed
        );

        Ok(GeneticAlgorithm {
            mutation: MutationOperation::new(config.position_mutation_probability),
            evaluator: FitnessEvaluator::new(decoder, cost_function),
            rng: ChaCha8Rng::seed_from_u64(seed),
            population: Population::default(),
            best: None,
            generation: 0,
            run_time: Duration::from_secs(0),
            cancelled: Arc::new(AtomicBool::new(false)),
            start_time: Instant::now(),
            generator,
            input,
            config,
            seed,
        })
    }

    /// Seed of the random stream of this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Flag that stops the search at the next generation boundary when set.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn generator(&self) -> &PopulationGenerator {
        &self.generator
    }

    /// Initialize the population with random, repaired and evaluated individuals.
    pub fn initialize(&mut self) {
        let genotypes = self
            .generator
            .create_genotypes(self.config.population_size, &mut self.rng);
        let mut individuals: Vec<Individual> = genotypes.into_iter().map(Individual::new).collect();
        self.evaluator
            .evaluate_population(&mut individuals, self.generator.mapping(), &self.input);

        self.population = Population::new(individuals);
        self.generation = 0;
        self.best = None;
        self.update_best();
    }

    /// Replace the population by the next generation.
    pub fn next_generation(&mut self) {
        let size = self.config.population_size;
        let elites = self.config.number_of_elites().min(size);
        let mutants = self.config.number_of_direct_mutations();
        let randoms = self.config.number_of_random_individuals();
        let children = size.saturating_sub(elites + mutants + randoms);

        let mut offspring: Vec<Genotype> = Vec::with_capacity(size - elites);

        // Direct mutation of selected individuals
        for _ in 0..mutants {
            let mut genotype = self
                .population
                .binary_tournament_selection(&mut self.rng)
                .genotype
                .clone();
            self.mutation.apply(&mut genotype, &mut self.rng);
            offspring.push(genotype);
        }

        // Fresh random individuals
        offspring.extend(self.generator.create_genotypes(randoms, &mut self.rng));

        // Crossover children
        for _ in 0..children {
            let (parent1, parent2) = self.population.select_parents(&mut self.rng);
            let mut child = if self.rng.gen::<f64>() < self.config.order_based_crossover_probability {
                Genetic::crossover(&parent1.genotype, &parent2.genotype, &mut self.rng)
            } else {
                parent1.genotype.clone()
            };
            self.mutation
                .mutate(&mut child, self.config.mutation_probability, &mut self.rng);
            offspring.push(child);
        }

        self.generator
            .repair_operation()
            .repair_all(offspring.iter_mut(), self.generator.mapping());

        let mut individuals: Vec<Individual> = offspring.into_iter().map(Individual::new).collect();
        self.evaluator
            .evaluate_population(&mut individuals, self.generator.mapping(), &self.input);

        let mut next = self.population.elite(elites).to_vec();
        next.extend(individuals);
        self.population = Population::new(next);
        self.generation += 1;

        debug!(
            "Generation {}: best {:.2}, average {:.2}",
            self.generation,
            self.population.get_best().map_or(f64::INFINITY, |i| i.cost),
            self.population.average_cost()
        );

        self.update_best();
    }

    /// Run until the generation cap or the configured time limit is reached.
    pub fn run(&mut self) -> OptimizationResult {
        let time_limit = self.config.time_limit;
        self.optimize(time_limit, &mut |_: f64| {}, &mut |_: &str| {})
    }

    /// Decoded routes of the best individual found so far.
    pub fn best_routes(&self) -> Option<Vec<Route>> {
        self.best.as_ref().map(|best| {
            self.evaluator
                .decoder()
                .decode(&best.genotype, self.generator.mapping(), &self.input)
        })
    }

    /// Build the result from the best individual found so far.
    pub fn result(&self, result_state: ResultState) -> OptimizationResult {
        OptimizationResult {
            routes: self.best_routes().unwrap_or_default(),
            cost: self.best.as_ref().map_or(f64::INFINITY, |b| b.cost),
            result_state,
            time_elapsed: self.run_time,
            generations: self.generation,
        }
    }

    fn optimize(
        &mut self,
        time_limit: Option<Duration>,
        progress: &mut dyn FnMut(f64),
        message: &mut dyn FnMut(&str),
    ) -> OptimizationResult {
        self.start_time = Instant::now();
        message("Solving started.");
        progress(0.0);

        if self.population.is_empty() {
            self.initialize();
            message(&format!(
                "Initial population of {} created, best cost {:.2}.",
                self.population.len(),
                self.best.as_ref().map_or(f64::INFINITY, |b| b.cost)
            ));
        }

        let result_state = loop {
            if let Some(state) = self.termination(time_limit) {
                break state;
            }

            let previous_best = self.best.as_ref().map(|b| b.cost);
            self.next_generation();

            let current_best = self.best.as_ref().map(|b| b.cost);
            if current_best != previous_best {
                if let Some(cost) = current_best {
                    message(&format!(
                        "Generation {}: new best cost {:.2}",
                        self.generation, cost
                    ));
                }
            }
            progress(self.progress(time_limit));
        };

        self.run_time = self.start_time.elapsed();
        info!(
            "Search stopped after {} generations ({:?}), best cost {:.2}",
            self.generation,
            result_state,
            self.best.as_ref().map_or(f64::INFINITY, |b| b.cost)
        );
        message("Solver finished.");
        progress(1.0);

        self.result(result_state)
    }

    /// Check the termination criteria at a generation boundary.
    fn termination(&self, time_limit: Option<Duration>) -> Option<ResultState> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(ResultState::Cancelled);
        }
        if self.generation >= self.config.max_number_of_generations {
            return Some(ResultState::Finished);
        }
        if let Some(limit) = time_limit {
            if self.start_time.elapsed() >= limit {
                return Some(ResultState::TimeLimitReached);
            }
        }
        None
    }

    fn progress(&self, time_limit: Option<Duration>) -> f64 {
        let by_generation = self.generation as f64 / self.config.max_number_of_generations as f64;
        let by_time = time_limit.map_or(0.0, |limit| {
            self.start_time.elapsed().as_secs_f64() / limit.as_secs_f64().max(f64::EPSILON)
        });
        by_generation.max(by_time).clamp(0.0, 1.0)
    }

    fn update_best(&mut self) {
        let Some(candidate) = self.population.get_best() else {
            return;
        };
        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| candidate.cost < best.cost);
        if improved {
            debug!(
                "New best individual in generation {} with cost {:.2}",
                self.generation, candidate.cost
            );
            self.best = Some(candidate.clone());
        }
    }
}

impl<C: CostFunction> Solver for GeneticAlgorithm<C> {
    fn solve(
        &mut self,
        time_limit: Duration,
        progress: &mut dyn FnMut(f64),
        message: &mut dyn FnMut(&str),
    ) -> OptimizationResult {
        let limit = match self.config.time_limit {
            Some(configured) => configured.min(time_limit),
            None => time_limit,
        };
        self.optimize(Some(limit), progress, message)
    }
}
