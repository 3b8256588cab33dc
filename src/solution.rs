//! Decoded routes, result metrics and the optimization result.

use crate::problem::{Interval, OptimizationInput, SantaId, Time, Visit, VisitId, VISIT_ID_HOME};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

/// A stop of a route with its start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub visit_id: VisitId,
    pub start_time: Time,
}

impl Waypoint {
    pub fn new(visit_id: VisitId, start_time: Time) -> Self {
        Waypoint {
            visit_id,
            start_time,
        }
    }

    pub fn is_home(&self) -> bool {
        self.visit_id == VISIT_ID_HOME
    }
}

/// The route of one santa on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub santa_id: SantaId,
    pub day: usize,
    /// Empty for an unused santa, otherwise opened and closed by home
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create a new, empty route.
    pub fn new(santa_id: SantaId, day: usize) -> Self {
        Route {
            santa_id,
            day,
            waypoints: Vec::new(),
        }
    }

    /// Check if the route is empty.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Time from leaving home until returning.
    pub fn duration(&self) -> Time {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(first), Some(last)) => last.start_time - first.start_time,
            _ => 0,
        }
    }

    /// Waypoints that are real visits.
    pub fn visits(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|w| !w.is_home())
    }

    /// Check if the route contains the given visit.
    pub fn contains(&self, visit_id: VisitId) -> bool {
        self.waypoints.iter().any(|w| w.visit_id == visit_id)
    }
}

/// Length of the overlap of `[start, end)` with `interval`.
fn overlap(start: Time, end: Time, interval: &Interval) -> Time {
    (end.min(interval.1) - start.max(interval.0)).max(0)
}

/// A set of routes viewed against its problem instance.
#[derive(Clone)]
pub struct RouteSet<'a> {
    pub input: &'a OptimizationInput,
    pub routes: &'a [Route],
    /// Visit lookup by id, built once per set
    visits: HashMap<VisitId, &'a Visit>,
}

impl<'a> RouteSet<'a> {
    pub fn new(input: &'a OptimizationInput, routes: &'a [Route]) -> Self {
        let visits = input.visits.iter().map(|v| (v.id, v)).collect();
        RouteSet {
            input,
            routes,
            visits,
        }
    }

    fn non_empty_routes(&self) -> impl Iterator<Item = &'a Route> {
        self.routes.iter().filter(|r| !r.is_empty())
    }

    fn visit(&self, id: VisitId) -> Option<&'a Visit> {
        self.visits.get(&id).copied()
    }

    fn is_additional_santa(&self, santa_id: SantaId) -> bool {
        self.input.santa_index(santa_id).is_none()
    }

    /// Visited waypoints with their visit data.
    fn visited(&self) -> impl Iterator<Item = (&'a Waypoint, &'a Visit)> + '_ {
        self.non_empty_routes()
            .flat_map(|r| r.visits())
            .filter_map(move |w| self.visit(w.visit_id).map(|v| (w, v)))
    }

    /// Travel legs of a route as `(departure, travel time)`.
    fn legs(&self, route: &Route) -> Vec<(Time, Time)> {
        route
            .waypoints
            .iter()
            .tuple_windows()
            .map(|(from, to)| {
                let departure = from.start_time + self.duration_of(from.visit_id);
                (departure, self.travel_time(from.visit_id, to.visit_id))
            })
            .collect()
    }

    fn duration_of(&self, visit_id: VisitId) -> Time {
        self.visit(visit_id).map_or(0, |v| v.duration)
    }

    /// Travel time between two waypoints, home included.
    pub fn travel_time(&self, from: VisitId, to: VisitId) -> Time {
        match (from == VISIT_ID_HOME, to == VISIT_ID_HOME) {
            (true, true) => 0,
            (true, false) => self.visit(to).map_or(0, |v| v.way_cost_from_home),
            (false, true) => self.visit(from).map_or(0, |v| v.way_cost_to_home),
            (false, false) => self.input.get_route_cost(from, to),
        }
    }

    /// Regular visits that no route visits.
    pub fn number_of_not_visited_families(&self) -> usize {
        let visited: HashSet<VisitId> = self
            .non_empty_routes()
            .flat_map(|r| r.visits().map(|w| w.visit_id))
            .collect();
        self.input
            .regular_visits()
            .filter(|v| !visited.contains(&v.id))
            .count()
    }

    /// Breaks missing from routes of the santa they belong to.
    pub fn number_of_missing_breaks(&self) -> usize {
        self.non_empty_routes()
            .map(|route| {
                self.input
                    .breaks()
                    .filter(|b| b.santa_id == Some(route.santa_id) && !route.contains(b.id))
                    .count()
            })
            .sum()
    }

    /// Santas used that are not part of the input.
    pub fn number_of_additional_santas(&self) -> usize {
        self.non_empty_routes()
            .map(|r| r.santa_id)
            .filter(|&id| self.is_additional_santa(id))
            .unique()
            .count()
    }

    pub fn additional_santa_work_time(&self) -> Time {
        self.non_empty_routes()
            .filter(|r| self.is_additional_santa(r.santa_id))
            .map(Route::duration)
            .sum()
    }

    pub fn visit_time_in_unavailable(&self) -> Time {
        self.visited()
            .map(|(w, v)| {
                let end = w.start_time + v.duration;
                v.unavailable
                    .iter()
                    .map(|i| overlap(w.start_time, end, i))
                    .sum::<Time>()
            })
            .sum()
    }

    pub fn visit_time_in_desired(&self) -> Time {
        self.visited()
            .map(|(w, v)| {
                let end = w.start_time + v.duration;
                v.desired
                    .iter()
                    .map(|i| overlap(w.start_time, end, i))
                    .sum::<Time>()
            })
            .sum()
    }

    /// Travel time spent outside of the working hours of any day.
    pub fn way_time_outside_business_hours(&self) -> Time {
        self.non_empty_routes()
            .flat_map(|r| self.legs(r))
            .map(|(departure, travel)| {
                let inside: Time = self
                    .input
                    .days
                    .iter()
                    .map(|day| overlap(departure, departure + travel, day))
                    .sum();
                travel - inside
            })
            .sum()
    }

    pub fn santa_work_time(&self) -> Time {
        self.non_empty_routes().map(Route::duration).sum()
    }

    pub fn longest_day(&self) -> Time {
        self.non_empty_routes()
            .map(Route::duration)
            .max()
            .unwrap_or(0)
    }

    /// Maximum number of santas working on the same day.
    pub fn number_of_needed_santas(&self) -> usize {
        self.non_empty_routes()
            .counts_by(|r| r.day)
            .into_values()
            .max()
            .unwrap_or(0)
    }

    pub fn number_of_routes(&self) -> usize {
        self.non_empty_routes().count()
    }

    pub fn number_of_visits(&self) -> usize {
        self.input.visits.len()
    }

    pub fn total_way_time(&self) -> Time {
        self.non_empty_routes()
            .flat_map(|r| self.legs(r))
            .map(|(_, travel)| travel)
            .sum()
    }

    pub fn total_visit_time(&self) -> Time {
        self.visited().map(|(_, v)| v.duration).sum()
    }

    pub fn average_way_time_per_route(&self) -> Time {
        match self.number_of_routes() {
            0 => 0,
            n => self.total_way_time() / n as Time,
        }
    }

    pub fn average_duration_per_route(&self) -> Time {
        match self.number_of_routes() {
            0 => 0,
            n => self.santa_work_time() / n as Time,
        }
    }

    /// Check the structural consistency of the routes.
    ///
    /// Every non-empty route starts and ends at home, no leg is shorter than
    /// the visit duration plus travel time, and no santa works twice a day.
    pub fn is_valid(&self) -> bool {
        let mut santa_days = HashSet::new();
        for route in self.non_empty_routes() {
            if !santa_days.insert((route.santa_id, route.day)) {
                return false;
            }

            let first = route.waypoints.first();
            let last = route.waypoints.last();
            if route.waypoints.len() < 2
                || !first.is_some_and(Waypoint::is_home)
                || !last.is_some_and(Waypoint::is_home)
            {
                return false;
            }

            let too_short = route.waypoints.iter().tuple_windows().any(|(from, to)| {
                let earliest = from.start_time
                    + self.duration_of(from.visit_id)
                    + self.travel_time(from.visit_id, to.visit_id);
                to.start_time < earliest
            });
            if too_short {
                return false;
            }
        }
        true
    }
}

/// Final state of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultState {
    /// The generation cap was reached
    Finished,
    TimeLimitReached,
    Cancelled,
}

/// Outcome of a solver run.
#[derive(Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub routes: Vec<Route>,
    pub cost: f64,
    pub result_state: ResultState,
    pub time_elapsed: Duration,
    pub generations: u64,
}

impl OptimizationResult {
    /// View the routes against their input for metric calculations.
    pub fn route_set<'a>(&'a self, input: &'a OptimizationInput) -> RouteSet<'a> {
        RouteSet::new(input, &self.routes)
    }

    /// Routes that contain at least one waypoint.
    pub fn non_empty_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|r| !r.is_empty())
    }
}

impl fmt::Debug for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OptimizationResult:")?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  State: {:?}", self.result_state)?;
        writeln!(f, "  Generations: {}", self.generations)?;
        writeln!(f, "  Elapsed: {:.2}s", self.time_elapsed.as_secs_f64())?;

        for route in self.non_empty_routes() {
            writeln!(
                f,
                "  Santa {} day {}: {}",
                route.santa_id,
                route.day,
                route
                    .waypoints
                    .iter()
                    .map(|w| format!("{}@{}", w.visit_id, w.start_time))
                    .join(" -> ")
            )?;
        }

        Ok(())
    }
}
