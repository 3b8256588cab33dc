//! Unit tests for the repair operation.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use santa_routing_ga::genotype::{Allele, AlleleMapping, Genotype, SegmentLayout};
use santa_routing_ga::population::PopulationGenerator;
use santa_routing_ga::problem::{OptimizationInput, Santa, Visit};
use santa_routing_ga::repair::RepairOperation;

const HOUR: i64 = 3600;

/// Two santas with one break each over three days.
fn create_test_problem() -> OptimizationInput {
    OptimizationInput::new(
        vec![Santa { id: 1 }, Santa { id: 2 }],
        vec![
            Visit::new(0, HOUR, HOUR, HOUR),
            Visit::new(1, HOUR, HOUR, HOUR),
            Visit::new(2, HOUR, HOUR, HOUR),
            Visit::new(3, HOUR, HOUR, HOUR),
            Visit::new_break(4, HOUR / 2, 1),
            Visit::new_break(5, HOUR / 2, 2),
        ],
        vec![(0, 8 * HOUR), (24 * HOUR, 32 * HOUR), (48 * HOUR, 56 * HOUR)],
        vec![vec![HOUR; 6]; 6],
    )
}

/// A shuffled, unrepaired genotype of the instance.
fn random_genotype(mapping: &AlleleMapping, layout: SegmentLayout, rng: &mut ChaCha8Rng) -> Genotype {
    let mut alleles: Vec<Allele> = mapping.alleles().collect();
    alleles.extend(-(layout.number_of_separators() as Allele)..0);
    alleles.shuffle(rng);
    Genotype::new(alleles)
}

#[test]
fn test_repair_restores_day_binding() {
    let input = create_test_problem();
    let generator = PopulationGenerator::new(&input, 3).unwrap();
    let mapping = generator.mapping();
    let layout = generator.layout();
    let repair = RepairOperation::new(layout, mapping);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for _ in 0..500 {
        let original = random_genotype(mapping, layout, &mut rng);
        let mut genotype = original.clone();
        repair.repair(&mut genotype, mapping);

        assert!(repair.is_repaired(&genotype, mapping));
        assert!(genotype.is_permutation_of(&original));
        assert_eq!(genotype.len(), original.len());

        // every break instance sits in the segment of its day
        for (&allele, segment) in genotype.alleles().iter().zip(genotype.segment_indices()) {
            if let Some(binding) = mapping.binding(allele) {
                assert_eq!(layout.day_of(segment), binding.day);
                assert_eq!(layout.santa_of(segment), binding.santa);
            }
        }
    }
}

#[test]
fn test_repair_keeps_valid_genotype() {
    let input = create_test_problem();
    let generator = PopulationGenerator::new(&input, 2).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for genotype in generator.create_genotypes(50, &mut rng) {
        let mut repaired = genotype.clone();
        generator
            .repair_operation()
            .repair(&mut repaired, generator.mapping());
        assert_eq!(repaired, genotype);
    }
}

#[test]
fn test_repair_moves_only_misplaced_breaks() {
    let input = create_test_problem();
    let generator = PopulationGenerator::new(&input, 2).unwrap();
    let mapping = generator.mapping();
    let repair = generator.repair_operation();

    // alleles: visits 0..=3, breaks 4 (santa 1) and 5 (santa 2) on day 0,
    // 6 and 7 for santa 1 on days 1 and 2, 8 and 9 for santa 2
    // segments: (d0,s1) (d0,s2) (d1,s1) (d1,s2) (d2,s1) (d2,s2)
    let mut genotype = Genotype::new(vec![
        9, 0, -1, 5, 1, -2, 6, -3, 8, 2, -4, 4, -5, 7, 3,
    ]);
    repair.repair(&mut genotype, mapping);

    assert_eq!(
        genotype.alleles(),
        &[0, 4, -1, 5, 1, -2, 6, -3, 8, 2, -4, 7, -5, 3, 9]
    );
    assert!(repair.is_repaired(&genotype, mapping));
}

#[test]
fn test_repair_into_empty_segments() {
    let input = create_test_problem();
    let generator = PopulationGenerator::new(&input, 2).unwrap();
    let mapping = generator.mapping();
    let repair = generator.repair_operation();

    // all visit alleles crammed into the last segment
    let mut genotype = Genotype::new(vec![
        -1, -2, -3, -4, -5, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9,
    ]);
    repair.repair(&mut genotype, mapping);

    assert_eq!(
        genotype.alleles(),
        &[4, -1, 5, -2, 6, -3, 8, -4, 7, -5, 0, 1, 2, 3, 9]
    );
}

#[test]
fn test_repair_all() {
    let input = create_test_problem();
    let generator = PopulationGenerator::new(&input, 2).unwrap();
    let mapping = generator.mapping();
    let layout = generator.layout();
    let mut rng = ChaCha8Rng::seed_from_u64(23);

    let mut genotypes: Vec<Genotype> = (0..20)
        .map(|_| random_genotype(mapping, layout, &mut rng))
        .collect();
    generator
        .repair_operation()
        .repair_all(genotypes.iter_mut(), mapping);

    assert!(genotypes
        .iter()
        .all(|g| generator.repair_operation().is_repaired(g, mapping)));
}
