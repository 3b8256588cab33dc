//! Fitness evaluation of genotypes.

use crate::cost::CostFunction;
use crate::decoder::Decoder;
use crate::genotype::{AlleleMapping, Genotype};
use crate::individual::Individual;
use crate::problem::OptimizationInput;
use crate::solution::Route;
use log::trace;

/// Decodes genotypes and scores them with a cost function.
pub struct FitnessEvaluator<C> {
    decoder: Decoder,
    cost_function: C,
}

impl<C: CostFunction> FitnessEvaluator<C> {
    pub fn new(decoder: Decoder, cost_function: C) -> Self {
        FitnessEvaluator {
            decoder,
            cost_function,
        }
    }

    /// Decode the genotype and return its routes together with their cost.
    pub fn decode_and_evaluate(
        &self,
        genotype: &Genotype,
        mapping: &AlleleMapping,
        input: &OptimizationInput,
    ) -> (Vec<Route>, f64) {
        let routes = self.decoder.decode(genotype, mapping, input);
        let cost = self.cost_function.cost(input, &routes);
        (routes, cost)
    }

    /// Cost of a single genotype.
    pub fn evaluate(
        &self,
        genotype: &Genotype,
        mapping: &AlleleMapping,
        input: &OptimizationInput,
    ) -> f64 {
        self.decode_and_evaluate(genotype, mapping, input).1
    }

    /// Recalculate and cache the cost of every individual.
    pub fn evaluate_population(
        &self,
        individuals: &mut [Individual],
        mapping: &AlleleMapping,
        input: &OptimizationInput,
    ) {
        for individual in individuals.iter_mut() {
            individual.cost = self.evaluate(&individual.genotype, mapping, input);
            trace!("Evaluated individual with cost {:.2}", individual.cost);
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn cost_function(&self) -> &C {
        &self.cost_function
    }
}
