//! Population generation and management for the genetic algorithm.

use crate::error::{Error, Result};
use crate::genotype::{Allele, AlleleMapping, Genotype, SegmentLayout};
use crate::individual::Individual;
use crate::problem::OptimizationInput;
use crate::repair::RepairOperation;
use log::debug;
use rand::{seq::SliceRandom, Rng};

/// Builds valid random genotypes for a problem instance.
pub struct PopulationGenerator {
    layout: SegmentLayout,
    mapping: AlleleMapping,
    /// Visit alleles followed by the separators
    elements: Vec<Allele>,
    repair: RepairOperation,
}

impl PopulationGenerator {
    /// Create the allele universe for `input` with `max_number_of_santas` santa slots per day.
    pub fn new(input: &OptimizationInput, max_number_of_santas: usize) -> Result<Self> {
        if input.days.is_empty() {
            return Err(Error::InvalidInput("at least one day is required".into()));
        }
        if max_number_of_santas == 0 || max_number_of_santas < input.santas.len() {
            return Err(Error::InvalidConfig(format!(
                "max number of santas ({}) must cover all {} santas of the input",
                max_number_of_santas,
                input.santas.len()
            )));
        }

        let layout = SegmentLayout::new(input.days.len(), max_number_of_santas);
        let mapping = AlleleMapping::new(input)?;

        let number_of_separators = layout.number_of_separators() as Allele;
        let mut elements: Vec<Allele> = mapping.alleles().collect();
        elements.extend(-number_of_separators..0);

        let repair = RepairOperation::new(layout, &mapping);

        Ok(PopulationGenerator {
            layout,
            mapping,
            elements,
            repair,
        })
    }

    /// Generate `number_of_individuals` repaired genotypes and the allele mapping.
    pub fn generate<R: Rng>(
        input: &OptimizationInput,
        number_of_individuals: usize,
        max_number_of_santas: usize,
        rng: &mut R,
    ) -> Result<(Vec<Genotype>, AlleleMapping)> {
        let generator = PopulationGenerator::new(input, max_number_of_santas)?;
        let population = generator.create_genotypes(number_of_individuals, rng);
        Ok((population, generator.mapping))
    }

    /// Create a single shuffled and repaired genotype.
    pub fn create_genotype<R: Rng>(&self, rng: &mut R) -> Genotype {
        let mut alleles = self.elements.clone();
        alleles.shuffle(rng);

        let mut genotype = Genotype::new(alleles);
        self.repair.repair(&mut genotype, &self.mapping);
        genotype
    }

    /// Create several genotypes.
    pub fn create_genotypes<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<Genotype> {
        debug!(
            "Generating {} genotypes of length {}",
            count,
            self.elements.len()
        );
        (0..count).map(|_| self.create_genotype(rng)).collect()
    }

    pub fn mapping(&self) -> &AlleleMapping {
        &self.mapping
    }

    pub fn layout(&self) -> SegmentLayout {
        self.layout
    }

    pub fn repair_operation(&self) -> &RepairOperation {
        &self.repair
    }

    /// Length of every genotype of this instance.
    pub fn genotype_length(&self) -> usize {
        self.elements.len()
    }
}

/// The individuals of one generation.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub individuals: Vec<Individual>,
}

impl Population {
    /// Create a population from evaluated individuals.
    pub fn new(individuals: Vec<Individual>) -> Self {
        let mut population = Population { individuals };
        population.sort_by_cost();
        population
    }

    /// Sort individuals ascending by cost.
    pub fn sort_by_cost(&mut self) {
        self.individuals.sort_by(|a, b| a.cmp_cost(b));
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get the individual with the lowest cost.
    pub fn get_best(&self) -> Option<&Individual> {
        self.individuals.iter().min_by(|a, b| a.cmp_cost(b))
    }

    /// The `count` best individuals. Expects the population to be sorted.
    pub fn elite(&self, count: usize) -> &[Individual] {
        &self.individuals[..count.min(self.individuals.len())]
    }

    /// Select two distinct parents using binary tournament selection.
    ///
    /// The second tournament is held among the individuals other than the
    /// first parent. A population of one yields the same individual twice.
    pub fn select_parents<R: Rng>(&self, rng: &mut R) -> (&Individual, &Individual) {
        let first = self.tournament_index(rng, None);
        if self.individuals.len() < 2 {
            return (&self.individuals[first], &self.individuals[first]);
        }
        let second = self.tournament_index(rng, Some(first));

        (&self.individuals[first], &self.individuals[second])
    }

    /// Perform binary tournament selection.
    pub fn binary_tournament_selection<R: Rng>(&self, rng: &mut R) -> &Individual {
        &self.individuals[self.tournament_index(rng, None)]
    }

    /// Index of the winner of a binary tournament among all individuals but `excluded`.
    fn tournament_index<R: Rng>(&self, rng: &mut R, excluded: Option<usize>) -> usize {
        if self.individuals.is_empty() {
            panic!("Cannot select from empty population");
        }

        let candidates = self.individuals.len() - usize::from(excluded.is_some());
        // Map a draw in 0..candidates onto an index skipping the excluded one
        let index = |draw: usize| match excluded {
            Some(skip) if draw >= skip => draw + 1,
            _ => draw,
        };

        let idx1 = index(rng.gen_range(0..candidates));
        if candidates == 1 {
            return idx1;
        }

        // Ensure they are different
        let mut idx2 = index(rng.gen_range(0..candidates));
        while idx1 == idx2 {
            idx2 = index(rng.gen_range(0..candidates));
        }

        // Return the one with lower cost
        if self.individuals[idx1].cost <= self.individuals[idx2].cost {
            idx1
        } else {
            idx2
        }
    }

    /// Mean cost over all individuals with a finite cost.
    pub fn average_cost(&self) -> f64 {
        let finite: Vec<f64> = self
            .individuals
            .iter()
            .map(|i| i.cost)
            .filter(|c| c.is_finite())
            .collect();
        if finite.is_empty() {
            return f64::INFINITY;
        }
        finite.iter().sum::<f64>() / finite.len() as f64
    }
}
