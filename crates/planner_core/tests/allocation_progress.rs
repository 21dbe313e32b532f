use chrono::NaiveDate;
use planner_core::{
    aggregate_allocations, build_allocation_grid, iterations_for_cycle, team_utilization,
    work_split, Allocation, CellStatus, Cycle, CycleKind, Iteration, Team,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quarter_cycles() -> Vec<Cycle> {
    let quarter = Cycle {
        id: "q1".to_string(),
        name: "Q1 2025".to_string(),
        kind: CycleKind::Quarter,
        start_date: date(2025, 1, 1),
        end_date: date(2025, 3, 31),
        parent_cycle_id: None,
    };
    // Stored out of order on purpose; numbering follows start date.
    let iteration = |id: &str, name: &str, start: NaiveDate, end: NaiveDate| Cycle {
        id: id.to_string(),
        name: name.to_string(),
        kind: CycleKind::Iteration,
        start_date: start,
        end_date: end,
        parent_cycle_id: Some("q1".to_string()),
    };
    vec![
        quarter,
        iteration("it-c", "Sprint 3", date(2025, 3, 1), date(2025, 3, 31)),
        iteration("it-a", "Sprint 1", date(2025, 1, 1), date(2025, 1, 31)),
        iteration("it-b", "Sprint 2", date(2025, 2, 1), date(2025, 2, 28)),
    ]
}

fn teams() -> Vec<Team> {
    vec![
        Team::new("fe", "Frontend"),
        Team::new("be", "Backend"),
        Team::new("ops", "Ops"),
    ]
}

fn iterations() -> Vec<Iteration> {
    iterations_for_cycle(&quarter_cycles(), "q1")
}

fn alloc(team: &str, iteration: u32, percentage: f64) -> Allocation {
    Allocation::new(team, "q1", iteration, percentage)
}

#[test]
fn iterations_are_numbered_by_start_date() {
    let iterations = iterations();
    let names: Vec<(u32, &str)> = iterations
        .iter()
        .map(|iteration| (iteration.number, iteration.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![(1, "Sprint 1"), (2, "Sprint 2"), (3, "Sprint 3")]
    );
    assert!(iterations_for_cycle(&quarter_cycles(), "missing").is_empty());
}

#[test]
fn standalone_iteration_cycle_is_its_own_single_iteration() {
    let cycles = quarter_cycles();
    let iterations = iterations_for_cycle(&cycles, "it-b");
    assert_eq!(iterations.len(), 1);
    assert_eq!(iterations[0].number, 1);
    assert_eq!(iterations[0].name, "Sprint 2");
}

#[test]
fn aggregate_classifies_cells_and_averages_allocated_cells_only() {
    let allocations = vec![
        alloc("fe", 1, 60.0),
        alloc("fe", 1, 30.0), // fe/1 = 90 optimal
        alloc("fe", 2, 120.0), // fe/2 = 120 over
        alloc("be", 1, 50.0), // be/1 = 50 under
        alloc("be", 3, 100.0), // be/3 = 100 optimal
    ];

    let progress = aggregate_allocations(&teams(), &iterations(), &allocations, "q1");

    assert_eq!(progress.total_cells, 9);
    assert_eq!(progress.allocated_cells, 4);
    assert_eq!(progress.over_allocated_cells, 1);
    assert_eq!(progress.optimal_cells, 2);
    assert_eq!(progress.under_allocated_cells, 1);
    assert!((progress.team_coverage - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(progress.iteration_coverage, 1.0);
    assert!((progress.average_allocation - 90.0).abs() < 1e-9);
    assert!((progress.completion_percentage - 400.0 / 9.0).abs() < 1e-9);
}

#[test]
fn allocations_outside_grid_or_cycle_are_ignored() {
    let allocations = vec![
        alloc("ghost-team", 1, 100.0),
        alloc("fe", 7, 100.0),
        Allocation::new("fe", "q2", 1, 100.0),
        alloc("fe", 2, 40.0),
    ];

    let progress = aggregate_allocations(&teams(), &iterations(), &allocations, "q1");
    assert_eq!(progress.allocated_cells, 1);
    assert!(progress.team_coverage <= 1.0);
    assert!(progress.iteration_coverage <= 1.0);
    assert_eq!(progress.average_allocation, 40.0);
}

#[test]
fn coverage_stays_bounded_under_heavy_allocation() {
    let mut allocations = Vec::new();
    for team in ["fe", "be", "ops", "ghost"] {
        for iteration in 1..=6 {
            for _ in 0..10 {
                allocations.push(alloc(team, iteration, 75.0));
            }
        }
    }

    let progress = aggregate_allocations(&teams(), &iterations(), &allocations, "q1");
    assert_eq!(progress.team_coverage, 1.0);
    assert_eq!(progress.iteration_coverage, 1.0);
    assert_eq!(progress.allocated_cells, progress.total_cells);
    assert_eq!(progress.over_allocated_cells, 9);
    assert_eq!(progress.completion_percentage, 100.0);
}

#[test]
fn empty_grid_is_all_zero() {
    let progress = aggregate_allocations(&[], &[], &[alloc("fe", 1, 50.0)], "q1");
    assert_eq!(progress.total_cells, 0);
    assert_eq!(progress.allocated_cells, 0);
    assert_eq!(progress.team_coverage, 0.0);
    assert_eq!(progress.iteration_coverage, 0.0);
    assert_eq!(progress.average_allocation, 0.0);
    assert_eq!(progress.completion_percentage, 0.0);
}

#[test]
fn grid_exposes_cell_sums() {
    let allocations = vec![alloc("be", 2, 70.0), alloc("be", 2, 35.0)];
    let grid = build_allocation_grid(&teams(), &iterations(), &allocations, "q1");

    let cell = grid.cell("be", 2).unwrap();
    assert_eq!(cell.total_percentage, 105.0);
    assert_eq!(cell.allocation_count, 2);
    assert_eq!(cell.status, CellStatus::OverAllocated);
    assert!(grid.cell("be", 1).is_none());
}

#[test]
fn team_utilization_counts_empty_iterations_as_zero() {
    let allocations = vec![alloc("fe", 1, 90.0), alloc("fe", 3, 120.0), alloc("be", 2, 50.0)];
    let utilization = team_utilization("fe", &iterations(), &allocations, "q1");

    assert_eq!(utilization.peak_percentage, 120.0);
    assert!((utilization.average_percentage - 70.0).abs() < 1e-9);
    assert_eq!(utilization.over_allocated_iterations, vec![3]);
}

#[test]
fn work_split_separates_project_and_run_work() {
    let mut epic_work = alloc("fe", 1, 60.0);
    epic_work.epic_id = Some("epic-1".to_string());
    let mut support = alloc("fe", 1, 30.0);
    support.run_work_category_id = Some("support".to_string());
    let loose = alloc("be", 1, 10.0);

    let split = work_split(&[epic_work, support, loose], "q1");
    assert!((split.project_percentage - 60.0).abs() < 1e-9);
    assert!((split.run_work_percentage - 30.0).abs() < 1e-9);
    assert!((split.unassigned_percentage - 10.0).abs() < 1e-9);

    let empty = work_split(&[], "q1");
    assert_eq!(empty.project_percentage, 0.0);
}
