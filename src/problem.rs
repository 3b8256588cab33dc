//! Problem definition and data structures for the multi-day routing problem.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Point in time, in seconds.
pub type Time = i64;

/// Half-open time interval `(from, to)` in seconds.
pub type Interval = (Time, Time);

/// Identifier of a visit. Non-negative for real visits.
pub type VisitId = i32;

/// Identifier of a santa (vehicle).
pub type SantaId = i32;

/// Visit id used for the synthetic start and end waypoint of a route.
pub const VISIT_ID_HOME: VisitId = -1;

/// A santa (vehicle) available on every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Santa {
    pub id: SantaId,
}

/// A visit to be scheduled, or a break of a specific santa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub duration: Time,
    /// Windows in which the visit should preferably take place
    #[serde(default)]
    pub desired: Vec<Interval>,
    /// Windows in which the visit must not take place
    #[serde(default)]
    pub unavailable: Vec<Interval>,
    #[serde(default)]
    pub is_break: bool,
    /// Owning santa, required for breaks
    #[serde(default)]
    pub santa_id: Option<SantaId>,
    pub way_cost_from_home: Time,
    pub way_cost_to_home: Time,
}

impl Visit {
    /// Create a regular visit without time windows.
    pub fn new(id: VisitId, duration: Time, way_cost_from_home: Time, way_cost_to_home: Time) -> Self {
        Visit {
            id,
            duration,
            desired: Vec::new(),
            unavailable: Vec::new(),
            is_break: false,
            santa_id: None,
            way_cost_from_home,
            way_cost_to_home,
        }
    }

    /// Create a break of the given santa. A break recurs once per day.
    pub fn new_break(id: VisitId, duration: Time, santa_id: SantaId) -> Self {
        Visit {
            is_break: true,
            santa_id: Some(santa_id),
            ..Visit::new(id, duration, 0, 0)
        }
    }

    /// Set the desired windows.
    pub fn with_desired(mut self, desired: Vec<Interval>) -> Self {
        self.desired = desired;
        self
    }

    /// Set the unavailable windows.
    pub fn with_unavailable(mut self, unavailable: Vec<Interval>) -> Self {
        self.unavailable = unavailable;
        self
    }
}

/// A complete problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationInput {
    pub santas: Vec<Santa>,
    pub visits: Vec<Visit>,
    /// Working hours of each day
    pub days: Vec<Interval>,
    /// Travel times between visits, indexed by visit id
    pub route_costs: Vec<Vec<Time>>,
}

impl OptimizationInput {
    /// Create a new problem instance.
    pub fn new(
        santas: Vec<Santa>,
        visits: Vec<Visit>,
        days: Vec<Interval>,
        route_costs: Vec<Vec<Time>>,
    ) -> Self {
        OptimizationInput {
            santas,
            visits,
            days,
            route_costs,
        }
    }

    /// Load a problem from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let input: OptimizationInput = serde_json::from_reader(reader)?;
        input.validate()?;
        Ok(input)
    }

    /// Reject inputs the engine cannot map onto a genotype.
    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            return Err(Error::InvalidInput("at least one day is required".into()));
        }
        if let Some((from, to)) = self.days.iter().find(|(from, to)| from > to) {
            return Err(Error::InvalidInput(format!(
                "day ({from}, {to}) ends before it starts"
            )));
        }

        let santa_ids: HashSet<SantaId> = self.santas.iter().map(|s| s.id).collect();
        if santa_ids.len() != self.santas.len() {
            return Err(Error::InvalidInput("santa ids must be unique".into()));
        }

        let mut visit_ids = HashSet::with_capacity(self.visits.len());
        for visit in &self.visits {
            if visit.id < 0 {
                return Err(Error::InvalidInput(format!(
                    "visit id {} must not be negative",
                    visit.id
                )));
            }
            if !visit_ids.insert(visit.id) {
                return Err(Error::InvalidInput(format!("duplicate visit id {}", visit.id)));
            }
            if visit.is_break {
                match visit.santa_id {
                    None => {
                        return Err(Error::InvalidInput(format!(
                            "break {} has no owning santa",
                            visit.id
                        )))
                    }
                    Some(santa_id) if !santa_ids.contains(&santa_id) => {
                        return Err(Error::InvalidInput(format!(
                            "break {} belongs to unknown santa {}",
                            visit.id, santa_id
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        let size = self.route_costs.len();
        if self.route_costs.iter().any(|row| row.len() != size) {
            return Err(Error::InvalidInput("route costs must be a square matrix".into()));
        }
        if let Some(visit) = self.visits.iter().find(|v| v.id as usize >= size) {
            return Err(Error::InvalidInput(format!(
                "route costs do not cover visit id {}",
                visit.id
            )));
        }

        Ok(())
    }

    /// Get the travel time between two visits.
    pub fn get_route_cost(&self, from: VisitId, to: VisitId) -> Time {
        self.route_costs[from as usize][to as usize]
    }

    /// Index of a santa in `santas`.
    pub fn santa_index(&self, id: SantaId) -> Option<usize> {
        self.santas.iter().position(|s| s.id == id)
    }

    /// Number of day-instantiated visits: regular visits plus one break per day.
    pub fn number_of_alleles(&self) -> usize {
        let breaks = self.visits.iter().filter(|v| v.is_break).count();
        self.visits.len() - breaks + breaks * self.days.len()
    }

    /// Iterate over regular (non-break) visits.
    pub fn regular_visits(&self) -> impl Iterator<Item = &Visit> {
        self.visits.iter().filter(|v| !v.is_break)
    }

    /// Iterate over breaks.
    pub fn breaks(&self) -> impl Iterator<Item = &Visit> {
        self.visits.iter().filter(|v| v.is_break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> OptimizationInput {
        OptimizationInput::new(
            vec![Santa { id: 10 }],
            vec![Visit::new(0, 60, 10, 10), Visit::new_break(1, 30, 10)],
            vec![(0, 3600), (86400, 90000)],
            vec![vec![0, 5], vec![5, 0]],
        )
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
        assert_eq!(input().number_of_alleles(), 3);
    }

    #[test]
    fn test_break_of_unknown_santa_is_rejected() {
        let mut input = input();
        input.visits[1].santa_id = Some(99);
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_break_without_santa_is_rejected() {
        let mut input = input();
        input.visits[1].santa_id = None;
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_route_costs_must_cover_visits() {
        let mut input = input();
        input.route_costs = vec![vec![0]];
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_no_days_is_rejected() {
        let mut input = input();
        input.days.clear();
        assert!(input.validate().is_err());
    }
}
