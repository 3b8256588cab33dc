//! Reporting helpers: duration formatting, result persistence and statistics.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use itertools::Itertools;

use crate::error::Result;
use crate::problem::{OptimizationInput, Time, VISIT_ID_HOME};
use crate::solution::{OptimizationResult, RouteSet};

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Format a point in time given in seconds as `hh:mm`.
pub fn format_time(time: Time) -> String {
    let sign = if time < 0 { "-" } else { "" };
    let time = time.abs();
    format!("{}{:02}:{:02}", sign, time / 3600, (time % 3600) / 60)
}

/// Save a result as JSON.
pub fn save_result<P: AsRef<Path>>(result: &OptimizationResult, path: P) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

/// Write a human readable route listing.
pub fn write_routes<W: Write>(
    out: &mut W,
    result: &OptimizationResult,
    input: &OptimizationInput,
) -> std::io::Result<()> {
    writeln!(out, "Cost: {:.2}", result.cost)?;
    writeln!(out, "Number of Routes: {}", result.non_empty_routes().count())?;
    writeln!(out)?;

    for route in result.non_empty_routes() {
        let stops = route
            .waypoints
            .iter()
            .map(|w| match w.visit_id {
                VISIT_ID_HOME => format!("home@{}", format_time(w.start_time)),
                id => format!("{}@{}", id, format_time(w.start_time)),
            })
            .join(" -> ");
        writeln!(out, "Santa {} / day {}: {}", route.santa_id, route.day + 1, stops)?;
    }

    let set = result.route_set(input);
    writeln!(out)?;
    writeln!(out, "Not visited: {}", set.number_of_not_visited_families())?;
    writeln!(out, "Missing breaks: {}", set.number_of_missing_breaks())?;
    writeln!(out, "Additional santas: {}", set.number_of_additional_santas())?;
    Ok(())
}

/// Print the route listing to stdout.
pub fn print_routes(result: &OptimizationResult, input: &OptimizationInput) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write_routes(&mut handle, result, input) {
        log::warn!("Failed to print routes: {}", e);
    }
}

/// Statistics about a finished search.
pub struct SearchStatistics {
    pub generations: u64,
    pub runtime: Duration,
    pub seed: u64,
    pub best_cost: f64,
    pub routes: usize,
    pub not_visited: usize,
    pub missing_breaks: usize,
    pub additional_santas: usize,
    pub santa_work_time: Time,
    pub longest_day: Time,
}

impl SearchStatistics {
    /// Collect statistics of a result.
    pub fn new(result: &OptimizationResult, input: &OptimizationInput, seed: u64) -> Self {
        let set = RouteSet::new(input, &result.routes);
        SearchStatistics {
            generations: result.generations,
            runtime: result.time_elapsed,
            seed,
            best_cost: result.cost,
            routes: set.number_of_routes(),
            not_visited: set.number_of_not_visited_families(),
            missing_breaks: set.number_of_missing_breaks(),
            additional_santas: set.number_of_additional_santas(),
            santa_work_time: set.santa_work_time(),
            longest_day: set.longest_day(),
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Generations: {}
- Runtime: {}
- Seed: {}
- Best Cost: {:.2}
- Routes: {}
- Not Visited: {}
- Missing Breaks: {}
- Additional Santas: {}
- Santa Work Time: {}
- Longest Day: {}",
            self.generations,
            format_duration(self.runtime),
            self.seed,
            self.best_cost,
            self.routes,
            self.not_visited,
            self.missing_breaks,
            self.additional_santas,
            format_time(self.santa_work_time),
            format_time(self.longest_day)
        )
    }
}
