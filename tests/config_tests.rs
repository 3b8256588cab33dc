//! Unit tests for the configuration and sizing policy.

use santa_routing_ga::config::GenAlgConfig;
use santa_routing_ga::error::Error;
use santa_routing_ga::problem::{OptimizationInput, Santa, Visit};

/// A valid configuration small enough for tests.
fn create_test_config() -> GenAlgConfig {
    GenAlgConfig::new()
        .with_max_number_of_santas(2)
        .with_population_size(100)
        .with_max_number_of_generations(10)
}

#[test]
fn test_population_size_boundaries() {
    assert_eq!(GenAlgConfig::calculate_population_size(0), 262_144);
    assert_eq!(GenAlgConfig::calculate_population_size(10), 262_144);
    assert_eq!(GenAlgConfig::calculate_population_size(34), 262_144);
    assert_eq!(GenAlgConfig::calculate_population_size(35), 253_952);
    assert_eq!(GenAlgConfig::calculate_population_size(50), 131_072);
    assert_eq!(GenAlgConfig::calculate_population_size(200), 16);
    assert_eq!(GenAlgConfig::calculate_population_size(1000), 16);

    let size = GenAlgConfig::calculate_population_size(100) as i64;
    assert!((size - 16_384).abs() <= 1, "got {}", size);
}

#[test]
fn test_population_size_is_decreasing() {
    let sizes: Vec<usize> = (0..250)
        .map(GenAlgConfig::calculate_population_size)
        .collect();
    for pair in sizes.windows(2) {
        assert!(pair[0] >= pair[1], "{} < {}", pair[0], pair[1]);
    }
}

#[test]
fn test_for_input() {
    let input = OptimizationInput::new(
        vec![Santa { id: 1 }, Santa { id: 2 }],
        vec![
            Visit::new(0, 60, 5, 5),
            Visit::new(1, 60, 5, 5),
            Visit::new_break(2, 30, 1),
        ],
        vec![(0, 3600), (86_400, 90_000), (172_800, 176_400)],
        vec![vec![0; 3]; 3],
    );

    let config = GenAlgConfig::for_input(&input, 3);
    assert_eq!(config.max_number_of_santas, 5);
    assert_eq!(config.population_size, 262_144);
    assert!(config.is_valid());
}

#[test]
fn test_default_shares_are_valid() {
    let config = create_test_config();
    assert!(config.is_valid());
    assert_eq!(config.number_of_elites(), 35);
    assert_eq!(config.number_of_direct_mutations(), 37);
    assert_eq!(config.number_of_random_individuals(), 0);
}

#[test]
fn test_zero_elitism_is_invalid() {
    let config = create_test_config().with_elitism_percentage(0.0);
    assert!(!config.is_valid());
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

    let config = create_test_config().with_elitism_percentage(1.0);
    assert!(!config.is_valid());
}

#[test]
fn test_population_of_one_is_invalid() {
    let config = create_test_config().with_population_size(1);
    assert!(!config.is_valid());

    let config = create_test_config().with_population_size(2);
    assert!(config.is_valid());
}

#[test]
fn test_no_santa_is_invalid() {
    let config = create_test_config().with_max_number_of_santas(0);
    assert!(!config.is_valid());
}

#[test]
fn test_overcommitted_shares_are_invalid() {
    let config = create_test_config()
        .with_population_size(10)
        .with_elitism_percentage(0.5)
        .with_direct_mutation_percentage(0.4)
        .with_random_percentage(0.2);
    assert!(!config.is_valid());

    let config = config.with_random_percentage(0.1);
    assert!(config.is_valid());
}

#[test]
fn test_minimum_elite_counts_towards_capacity() {
    // floor(0.1 * 2) = 0, but one elite is always kept
    let config = create_test_config()
        .with_population_size(2)
        .with_elitism_percentage(0.1)
        .with_direct_mutation_percentage(1.0);
    assert_eq!(config.number_of_elites(), 1);
    assert!(!config.is_valid());
}

#[test]
fn test_fractions_out_of_range_are_invalid() {
    assert!(!create_test_config().with_direct_mutation_percentage(-0.1).is_valid());
    assert!(!create_test_config().with_random_percentage(1.5).is_valid());
    assert!(!create_test_config().with_mutation_probability(2.0).is_valid());
    assert!(!create_test_config()
        .with_order_based_crossover_probability(-1.0)
        .is_valid());
    assert!(!create_test_config()
        .with_position_mutation_probability(f64::NAN)
        .is_valid());
    assert!(!create_test_config().with_elitism_percentage(f64::NAN).is_valid());
}
