//! Allocation aggregation over the team x iteration planning grid.
//!
//! # Responsibility
//! - Derive numbered iterations from cycle records.
//! - Sum allocation percentages per (team, iteration) cell.
//! - Compute coverage, over-allocation and utilisation statistics.
//!
//! # Invariants
//! - Only allocations of the requested cycle whose team and iteration are part
//!   of the grid are counted, so coverage stays within `0..=1`.
//! - Cells without allocations are excluded from averages.
//! - Inputs are never mutated.

use crate::model::cycle::{Allocation, Cycle, CycleKind};
use crate::model::team::Team;
use crate::model::{CycleId, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Cell sums above this are over-allocated.
pub const FULL_ALLOCATION: f64 = 100.0;
/// Cell sums within `OPTIMAL_ALLOCATION_MIN..=FULL_ALLOCATION` are optimal.
pub const OPTIMAL_ALLOCATION_MIN: f64 = 80.0;

/// One numbered iteration of a planning cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iteration {
    pub cycle_id: CycleId,
    /// 1-based position inside the parent cycle.
    pub number: u32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Allocation classification of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    UnderAllocated,
    Optimal,
    OverAllocated,
}

impl CellStatus {
    pub fn classify(total_percentage: f64) -> Self {
        if total_percentage > FULL_ALLOCATION {
            Self::OverAllocated
        } else if total_percentage >= OPTIMAL_ALLOCATION_MIN {
            Self::Optimal
        } else {
            Self::UnderAllocated
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    pub total_percentage: f64,
    pub allocation_count: usize,
    pub status: CellStatus,
}

/// Non-empty cells keyed by `(team_id, iteration_number)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationGrid {
    pub cells: BTreeMap<(TeamId, u32), CellSummary>,
}

impl AllocationGrid {
    pub fn cell(&self, team_id: &str, iteration_number: u32) -> Option<&CellSummary> {
        self.cells.get(&(team_id.to_string(), iteration_number))
    }
}

/// Dashboard statistics for one cycle's planning grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningProgress {
    pub total_cells: usize,
    pub allocated_cells: usize,
    /// Fraction `0..=1` of teams with at least one allocation.
    pub team_coverage: f64,
    /// Fraction `0..=1` of iterations with at least one allocation.
    pub iteration_coverage: f64,
    pub over_allocated_cells: usize,
    pub optimal_cells: usize,
    pub under_allocated_cells: usize,
    /// Mean cell sum over allocated cells only.
    pub average_allocation: f64,
    /// `allocated_cells / total_cells * 100`.
    pub completion_percentage: f64,
}

/// Utilisation of one team across a cycle's iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamUtilization {
    pub team_id: TeamId,
    /// Mean cell sum across all iterations (empty iterations count as 0).
    pub average_percentage: f64,
    pub peak_percentage: f64,
    pub over_allocated_iterations: Vec<u32>,
}

/// Share of allocated percentage by work type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkSplit {
    pub project_percentage: f64,
    pub run_work_percentage: f64,
    pub unassigned_percentage: f64,
}

/// Returns the iterations of a quarter ordered by `(start_date, id)`.
///
/// When `cycle_id` itself is an iteration without children, it is returned
/// as iteration 1. Unknown cycle ids yield an empty list.
pub fn iterations_for_cycle(cycles: &[Cycle], cycle_id: &str) -> Vec<Iteration> {
    let mut children: Vec<&Cycle> = cycles
        .iter()
        .filter(|cycle| cycle.parent_cycle_id.as_deref() == Some(cycle_id))
        .collect();

    if children.is_empty() {
        if let Some(cycle) = cycles
            .iter()
            .find(|cycle| cycle.id == cycle_id && cycle.kind == CycleKind::Iteration)
        {
            children.push(cycle);
        }
    }

    children.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.id.cmp(&b.id))
    });

    children
        .into_iter()
        .zip(1u32..)
        .map(|(cycle, number)| Iteration {
            cycle_id: cycle_id.to_string(),
            number,
            name: cycle.name.clone(),
            start_date: cycle.start_date,
            end_date: cycle.end_date,
        })
        .collect()
}

/// Sums allocations into grid cells.
pub fn build_allocation_grid(
    teams: &[Team],
    iterations: &[Iteration],
    allocations: &[Allocation],
    cycle_id: &str,
) -> AllocationGrid {
    let team_ids: BTreeSet<&str> = teams.iter().map(|team| team.id.as_str()).collect();
    let numbers: BTreeSet<u32> = iterations.iter().map(|iteration| iteration.number).collect();

    let mut sums: BTreeMap<(TeamId, u32), (f64, usize)> = BTreeMap::new();
    for allocation in allocations.iter().filter(|allocation| {
        allocation.cycle_id == cycle_id
            && team_ids.contains(allocation.team_id.as_str())
            && numbers.contains(&allocation.iteration_number)
    }) {
        let entry = sums
            .entry((allocation.team_id.clone(), allocation.iteration_number))
            .or_insert((0.0, 0));
        entry.0 += allocation.percentage;
        entry.1 += 1;
    }

    let cells = sums
        .into_iter()
        .map(|(key, (total_percentage, allocation_count))| {
            (
                key,
                CellSummary {
                    total_percentage,
                    allocation_count,
                    status: CellStatus::classify(total_percentage),
                },
            )
        })
        .collect();

    AllocationGrid { cells }
}

/// Aggregates one cycle's allocations into planning progress statistics.
pub fn aggregate_allocations(
    teams: &[Team],
    iterations: &[Iteration],
    allocations: &[Allocation],
    cycle_id: &str,
) -> PlanningProgress {
    let grid = build_allocation_grid(teams, iterations, allocations, cycle_id);

    let team_count = teams
        .iter()
        .map(|team| team.id.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let iteration_count = iterations
        .iter()
        .map(|iteration| iteration.number)
        .collect::<BTreeSet<_>>()
        .len();
    let total_cells = team_count * iteration_count;

    let allocated_cells = grid.cells.len();
    let covered_teams = grid
        .cells
        .keys()
        .map(|(team_id, _)| team_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let covered_iterations = grid
        .cells
        .keys()
        .map(|(_, number)| *number)
        .collect::<BTreeSet<_>>()
        .len();

    let mut over_allocated_cells = 0;
    let mut optimal_cells = 0;
    let mut under_allocated_cells = 0;
    let mut total_percentage = 0.0;
    for cell in grid.cells.values() {
        total_percentage += cell.total_percentage;
        match cell.status {
            CellStatus::OverAllocated => over_allocated_cells += 1,
            CellStatus::Optimal => optimal_cells += 1,
            CellStatus::UnderAllocated => under_allocated_cells += 1,
        }
    }

    PlanningProgress {
        total_cells,
        allocated_cells,
        team_coverage: ratio(covered_teams, team_count),
        iteration_coverage: ratio(covered_iterations, iteration_count),
        over_allocated_cells,
        optimal_cells,
        under_allocated_cells,
        average_allocation: if allocated_cells == 0 {
            0.0
        } else {
            total_percentage / allocated_cells as f64
        },
        completion_percentage: ratio(allocated_cells, total_cells) * 100.0,
    }
}

/// Computes one team's utilisation across the given iterations.
pub fn team_utilization(
    team_id: &str,
    iterations: &[Iteration],
    allocations: &[Allocation],
    cycle_id: &str,
) -> TeamUtilization {
    let mut per_iteration: BTreeMap<u32, f64> = iterations
        .iter()
        .map(|iteration| (iteration.number, 0.0))
        .collect();

    for allocation in allocations
        .iter()
        .filter(|allocation| allocation.cycle_id == cycle_id && allocation.team_id == team_id)
    {
        if let Some(total) = per_iteration.get_mut(&allocation.iteration_number) {
            *total += allocation.percentage;
        }
    }

    let peak_percentage = per_iteration.values().copied().fold(0.0, f64::max);
    let average_percentage = if per_iteration.is_empty() {
        0.0
    } else {
        per_iteration.values().sum::<f64>() / per_iteration.len() as f64
    };
    let over_allocated_iterations = per_iteration
        .iter()
        .filter(|(_, total)| **total > FULL_ALLOCATION)
        .map(|(number, _)| *number)
        .collect();

    TeamUtilization {
        team_id: team_id.to_string(),
        average_percentage,
        peak_percentage,
        over_allocated_iterations,
    }
}

/// Splits a cycle's allocated percentage into project, run and unassigned work.
///
/// Returned values are shares in `0..=100` of the cycle total.
pub fn work_split(allocations: &[Allocation], cycle_id: &str) -> WorkSplit {
    let mut project = 0.0;
    let mut run_work = 0.0;
    let mut unassigned = 0.0;
    for allocation in allocations
        .iter()
        .filter(|allocation| allocation.cycle_id == cycle_id)
    {
        if allocation.epic_id.is_some() {
            project += allocation.percentage;
        } else if allocation.run_work_category_id.is_some() {
            run_work += allocation.percentage;
        } else {
            unassigned += allocation.percentage;
        }
    }

    let total = project + run_work + unassigned;
    if total <= 0.0 {
        return WorkSplit::default();
    }
    WorkSplit {
        project_percentage: project / total * 100.0,
        run_work_percentage: run_work / total * 100.0,
        unassigned_percentage: unassigned / total * 100.0,
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{CellStatus, FULL_ALLOCATION, OPTIMAL_ALLOCATION_MIN};

    #[test]
    fn classify_uses_inclusive_optimal_band() {
        assert_eq!(CellStatus::classify(79.9), CellStatus::UnderAllocated);
        assert_eq!(CellStatus::classify(OPTIMAL_ALLOCATION_MIN), CellStatus::Optimal);
        assert_eq!(CellStatus::classify(FULL_ALLOCATION), CellStatus::Optimal);
        assert_eq!(CellStatus::classify(100.5), CellStatus::OverAllocated);
    }
}
