//! Unit tests for the order-based crossover.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use santa_routing_ga::genetic::Genetic;
use santa_routing_ga::genotype::Genotype;
use santa_routing_ga::population::PopulationGenerator;
use santa_routing_ga::problem::{OptimizationInput, Santa, Visit};

fn shuffled(alleles: &[i32], rng: &mut ChaCha8Rng) -> Genotype {
    let mut alleles = alleles.to_vec();
    alleles.shuffle(rng);
    Genotype::new(alleles)
}

#[test]
fn test_crossover_produces_permutation() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let elements: Vec<i32> = (-4..12).collect();

    for _ in 0..200 {
        let parent1 = shuffled(&elements, &mut rng);
        let parent2 = shuffled(&elements, &mut rng);
        let child = Genetic::crossover(&parent1, &parent2, &mut rng);

        assert_eq!(child.len(), parent1.len());
        assert!(child.is_permutation_of(&parent1));
    }
}

#[test]
fn test_crossover_keeps_slice_of_first_parent() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let parent1 = Genotype::new((0..10).collect());
    let parent2 = Genotype::new((0..10).rev().collect());

    for _ in 0..100 {
        let child = Genetic::crossover(&parent1, &parent2, &mut rng);
        let kept: Vec<usize> = (0..10)
            .filter(|&i| child.alleles()[i] == parent1.alleles()[i])
            .collect();

        // the kept slice is never empty
        assert!(!kept.is_empty());
        assert!(child.is_permutation_of(&parent1));
    }
}

#[test]
fn test_crossover_is_reproducible() {
    let elements: Vec<i32> = (-3..9).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let parent1 = shuffled(&elements, &mut rng);
    let parent2 = shuffled(&elements, &mut rng);

    let a = Genetic::crossover(&parent1, &parent2, &mut ChaCha8Rng::seed_from_u64(1));
    let b = Genetic::crossover(&parent1, &parent2, &mut ChaCha8Rng::seed_from_u64(1));
    assert_eq!(a, b);
}

#[test]
fn test_crossover_of_empty_genotypes() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let child = Genetic::crossover(&Genotype::default(), &Genotype::default(), &mut rng);
    assert!(child.is_empty());
}

#[test]
fn test_repaired_crossover_children() {
    let input = OptimizationInput::new(
        vec![Santa { id: 0 }, Santa { id: 1 }],
        vec![
            Visit::new(0, 600, 300, 300),
            Visit::new(1, 600, 300, 300),
            Visit::new(2, 600, 300, 300),
            Visit::new_break(3, 900, 0),
            Visit::new_break(4, 900, 1),
        ],
        vec![(0, 28_800), (86_400, 115_200)],
        vec![vec![120; 5]; 5],
    );
    let generator = PopulationGenerator::new(&input, 3).unwrap();
    let repair = generator.repair_operation();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let parents = generator.create_genotypes(20, &mut rng);
    for pair in parents.windows(2) {
        let mut child = Genetic::crossover(&pair[0], &pair[1], &mut rng);
        assert!(child.is_permutation_of(&pair[0]));

        repair.repair(&mut child, generator.mapping());
        assert!(repair.is_repaired(&child, generator.mapping()));
    }
}
