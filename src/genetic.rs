//! Crossover operator for permutation genotypes.

use crate::genotype::{Allele, Genotype};
use rand::Rng;
use std::collections::HashSet;

/// Implements order-based crossover (OX) on genotypes.
pub struct Genetic;

impl Genetic {
    /// Perform ordered crossover between two parent genotypes.
    ///
    /// A random slice of the first parent is kept in place; the remaining
    /// positions are filled, starting after the slice and wrapping around,
    /// with the missing alleles in the order they appear in the second parent.
    /// Both parents must be permutations of the same distinct alleles.
    pub fn crossover<R: Rng>(parent1: &Genotype, parent2: &Genotype, rng: &mut R) -> Genotype {
        let p1 = parent1.alleles();
        let p2 = parent2.alleles();
        debug_assert_eq!(p1.len(), p2.len());

        if p1.is_empty() {
            return Genotype::default();
        }

        // Determine cutting points
        let size = p1.len();
        let cut1 = rng.gen_range(0..size);
        let cut2 = rng.gen_range(0..size);
        let (start, end) = if cut1 <= cut2 { (cut1, cut2) } else { (cut2, cut1) };

        // Copy segment from first parent
        let mut offspring: Vec<Allele> = vec![0; size];
        offspring[start..=end].copy_from_slice(&p1[start..=end]);
        let mut used: HashSet<Allele> = p1[start..=end].iter().copied().collect();

        // Fill remaining positions from the second parent
        let mut j = (end + 1) % size;
        let mut p2_idx = (end + 1) % size;
        while used.len() < size {
            let allele = p2[p2_idx];
            if used.insert(allele) {
                offspring[j] = allele;
                j = (j + 1) % size;
            }
            p2_idx = (p2_idx + 1) % size;
        }

        Genotype::new(offspring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_crossover_of_identical_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let parent = Genotype::new(vec![4, -1, 2, 0, -2, 3]);
        let child = Genetic::crossover(&parent, &parent, &mut rng);
        assert_eq!(child, parent);
    }
}
