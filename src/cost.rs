//! Cost functions scoring a set of decoded routes.

use crate::problem::{OptimizationInput, Time};
use crate::solution::{Route, RouteSet};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Scores routes against their problem instance. Lower is better.
///
/// Implementations must be deterministic for identical input.
pub trait CostFunction {
    fn cost(&self, input: &OptimizationInput, routes: &[Route]) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(&OptimizationInput, &[Route]) -> f64,
{
    fn cost(&self, input: &OptimizationInput, routes: &[Route]) -> f64 {
        self(input, routes)
    }
}

/// Weights of the penalty terms. Hourly weights apply per hour of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    pub not_visited: f64,
    pub missing_break: f64,
    pub additional_santa: f64,
    pub unavailable_per_hour: f64,
    /// Negative, time in desired windows is rewarded
    pub desired_per_hour: f64,
    pub work_per_hour: f64,
    pub additional_santa_work_per_hour: f64,
    pub longest_day_per_hour: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights {
            not_visited: 560.0,
            missing_break: 560.0,
            additional_santa: 400.0,
            unavailable_per_hour: 120.0,
            desired_per_hour: -20.0,
            work_per_hour: 40.0,
            additional_santa_work_per_hour: 40.0,
            longest_day_per_hour: 30.0,
        }
    }
}

/// Weighted sum of the route set metrics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeightedCost {
    pub weights: CostWeights,
}

impl WeightedCost {
    pub fn new(weights: CostWeights) -> Self {
        WeightedCost { weights }
    }
}

fn hours(time: Time) -> f64 {
    time as f64 / SECONDS_PER_HOUR
}

impl CostFunction for WeightedCost {
    fn cost(&self, input: &OptimizationInput, routes: &[Route]) -> f64 {
        let set = RouteSet::new(input, routes);
        let w = &self.weights;

        w.not_visited * set.number_of_not_visited_families() as f64
            + w.missing_break * set.number_of_missing_breaks() as f64
            + w.additional_santa * set.number_of_additional_santas() as f64
            + w.unavailable_per_hour * hours(set.visit_time_in_unavailable())
            + w.desired_per_hour * hours(set.visit_time_in_desired())
            + w.work_per_hour * hours(set.santa_work_time())
            + w.additional_santa_work_per_hour * hours(set.additional_santa_work_time())
            + w.longest_day_per_hour * hours(set.longest_day())
    }
}
