//! Decoding of genotypes into timed routes.

use crate::genotype::{AlleleMapping, Gene, Genotype, SegmentLayout};
use crate::problem::{OptimizationInput, SantaId, Time, VisitId, VISIT_ID_HOME};
use crate::solution::{Route, Waypoint};
use std::collections::HashMap;

/// Converts genotypes into one route per (santa, day) segment.
///
/// Decoding never rejects a genotype: time window and availability
/// violations are left to the cost function.
pub struct Decoder {
    layout: SegmentLayout,
    /// Santa id of every santa slot, additional santas included
    santa_ids: Vec<SantaId>,
    /// Visit id -> (duration, way from home, way to home)
    visits: HashMap<VisitId, (Time, Time, Time)>,
}

impl Decoder {
    /// Create a decoder for `input` with `max_number_of_santas` santa slots per day.
    ///
    /// Slots beyond the input santas are additional santas with fresh ids.
    pub fn new(input: &OptimizationInput, max_number_of_santas: usize) -> Self {
        let next_id = input.santas.iter().map(|s| s.id).max().unwrap_or(-1) + 1;
        let santa_ids = input
            .santas
            .iter()
            .map(|s| s.id)
            .chain((next_id..).take(max_number_of_santas.saturating_sub(input.santas.len())))
            .collect();

        let visits = input
            .visits
            .iter()
            .map(|v| (v.id, (v.duration, v.way_cost_from_home, v.way_cost_to_home)))
            .collect();

        Decoder {
            layout: SegmentLayout::new(input.days.len(), max_number_of_santas),
            santa_ids,
            visits,
        }
    }

    /// Decode a genotype into routes, ordered by segment.
    pub fn decode(
        &self,
        genotype: &Genotype,
        mapping: &AlleleMapping,
        input: &OptimizationInput,
    ) -> Vec<Route> {
        let mut segments: Vec<Vec<VisitId>> = vec![Vec::new(); self.layout.number_of_segments()];
        let mut cursor = 0;

        for gene in genotype.genes() {
            match gene {
                Gene::Separator => cursor += 1,
                Gene::Visit(allele) => {
                    let visit_id = mapping
                        .visit_id(allele)
                        .unwrap_or_else(|| unreachable!("allele {allele} is not part of the mapping"));
                    segments[cursor].push(visit_id);
                }
            }
        }

        segments
            .into_iter()
            .enumerate()
            .map(|(segment, visit_ids)| {
                let day = self.layout.day_of(segment);
                let santa_id = self.santa_ids[self.layout.santa_of(segment)];
                let mut route = Route::new(santa_id, day);
                route.waypoints = self.schedule(&visit_ids, input.days[day].0, input);
                route
            })
            .collect()
    }

    /// Compute start times for a route leaving home at `day_start`.
    fn schedule(&self, visit_ids: &[VisitId], day_start: Time, input: &OptimizationInput) -> Vec<Waypoint> {
        if visit_ids.is_empty() {
            return Vec::new();
        }

        let mut waypoints = Vec::with_capacity(visit_ids.len() + 2);
        waypoints.push(Waypoint::new(VISIT_ID_HOME, day_start));

        let mut previous: Option<VisitId> = None;
        let mut time = day_start;
        for &visit_id in visit_ids {
            let (_, from_home, _) = self.visits[&visit_id];
            time += match previous {
                None => from_home,
                Some(prev) => self.visits[&prev].0 + input.get_route_cost(prev, visit_id),
            };
            waypoints.push(Waypoint::new(visit_id, time));
            previous = Some(visit_id);
        }

        if let Some(last) = previous {
            let (duration, _, to_home) = self.visits[&last];
            time += duration + to_home;
        }
        waypoints.push(Waypoint::new(VISIT_ID_HOME, time));

        waypoints
    }

    pub fn layout(&self) -> SegmentLayout {
        self.layout
    }
}
