//! Individual representation for the genetic algorithm population.

use crate::genotype::Genotype;
use std::cmp::Ordering;

/// A genotype together with its cached cost.
#[derive(Debug, Clone)]
pub struct Individual {
    pub genotype: Genotype,
    /// Cost of the decoded genotype, `INFINITY` until evaluated
    pub cost: f64,
}

impl Individual {
    /// Create a new, not yet evaluated individual.
    pub fn new(genotype: Genotype) -> Self {
        Individual {
            genotype,
            cost: f64::INFINITY,
        }
    }

    /// Compare two individuals by cost, lower is better.
    pub fn cmp_cost(&self, other: &Individual) -> Ordering {
        self.cost.total_cmp(&other.cost)
    }
}

impl From<Genotype> for Individual {
    fn from(genotype: Genotype) -> Self {
        Individual::new(genotype)
    }
}
