//! Mutation operators: random pairwise swaps and block inversion.

use crate::genotype::Genotype;
use crate::individual::Individual;
use rand::Rng;
use std::f64::consts::PI;

/// Factor multiplied with the genotype length to get the stdev of the mutation size.
const MUTATION_SIZE_STDEV_FACTOR: f64 = 1.0 / 4.0;

/// Applies position or inversion mutation.
///
/// Both variants only reorder alleles. Day binding of breaks is not kept,
/// so mutated genotypes must be repaired afterwards.
#[derive(Debug, Clone, Copy)]
pub struct MutationOperation {
    position_mutation_probability: f64,
}

impl MutationOperation {
    pub fn new(position_mutation_probability: f64) -> Self {
        MutationOperation {
            position_mutation_probability,
        }
    }

    /// Mutate every individual of a population.
    pub fn mutate_population<R: Rng>(
        &self,
        population: &mut [Individual],
        probability: f64,
        rng: &mut R,
    ) {
        for individual in population.iter_mut() {
            self.mutate(&mut individual.genotype, probability, rng);
        }
    }

    /// Mutate unless a uniform draw falls below `probability`.
    ///
    /// Returns true if the genotype was mutated.
    pub fn mutate<R: Rng>(&self, genotype: &mut Genotype, probability: f64, rng: &mut R) -> bool {
        if rng.gen::<f64>() < probability {
            // no mutation
            return false;
        }
        self.apply(genotype, rng);
        true
    }

    /// Mutate unconditionally, choosing between position and inversion mutation.
    pub fn apply<R: Rng>(&self, genotype: &mut Genotype, rng: &mut R) {
        if rng.gen::<f64>() < self.position_mutation_probability {
            Self::position_mutate(genotype, rng);
        } else {
            Self::inversion_mutate(genotype, rng);
        }
    }

    /// Swap a Gaussian distributed number of random position pairs.
    pub fn position_mutate<R: Rng>(genotype: &mut Genotype, rng: &mut R) {
        let count = genotype.len();
        if count == 0 {
            return;
        }

        let mutation_size = Self::get_mutation_size(1, count as f64 * MUTATION_SIZE_STDEV_FACTOR, rng);
        let alleles = genotype.alleles_mut();
        for _ in 0..mutation_size {
            let position1 = rng.gen_range(0..count);
            let position2 = rng.gen_range(0..count);
            alleles.swap(position1, position2);
        }
    }

    /// Reverse a contiguous block of Gaussian distributed length.
    pub fn inversion_mutate<R: Rng>(genotype: &mut Genotype, rng: &mut R) {
        let count = genotype.len();
        let inversion_size = count.min(Self::get_mutation_size(
            2,
            count as f64 * MUTATION_SIZE_STDEV_FACTOR,
            rng,
        ));
        let inversion_start = rng.gen_range(0..=count - inversion_size);

        genotype.alleles_mut()[inversion_start..inversion_start + inversion_size].reverse();
    }

    /// Folded Gaussian sample (Box-Muller) that is at least `min`.
    pub fn get_mutation_size<R: Rng>(min: usize, stdev: f64, rng: &mut R) -> usize {
        let u1: f64 = rng.gen();
        let mut u2: f64 = rng.gen();
        while u2 == 0.0 {
            u2 = rng.gen();
        }

        let random_normal = (2.0 * PI * u1).cos() * (-2.0 * u2.ln()).sqrt();

        min + (stdev * random_normal).abs().floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_mutation_size_zero_stdev() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(MutationOperation::get_mutation_size(4, 0.0, &mut rng), 4);
        }
    }

    #[test]
    fn test_inversion_of_whole_genotype_when_short() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut genotype = Genotype::new(vec![1, 2]);
        MutationOperation::inversion_mutate(&mut genotype, &mut rng);
        assert_eq!(genotype.alleles(), &[2, 1]);
    }
}
