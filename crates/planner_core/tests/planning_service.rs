use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::{
    Allocation, Cycle, CycleKind, FeasibilityOptions, Importance, ModelValidationError,
    PlanningContext, PlanningService, Project, ServiceError, Skill, SkillSource, Solution,
    SqlitePlanningRepository, Team,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed(service: &mut PlanningService<SqlitePlanningRepository<'_>>) {
    service
        .upsert_skill(Skill::new("react", "React", "frontend"))
        .unwrap();
    service
        .upsert_skill(Skill::new("node", "Node", "backend"))
        .unwrap();
    service
        .upsert_solution(Solution::new(
            "sol-ecom",
            "E-commerce Platform",
            "web",
            vec!["react".to_string(), "node".to_string()],
        ))
        .unwrap();
    service
        .upsert_project(Project::with_id(
            "p-shop",
            "Shop",
            date(2025, 1, 6),
            date(2025, 3, 28),
        ))
        .unwrap();
    service
        .upsert_team(Team::new("fe", "Frontend").with_target_skills(["react"]))
        .unwrap();
    service
        .upsert_team(Team::new("be", "Backend").with_target_skills(["node"]))
        .unwrap();
}

fn sprint(id: &str) -> Cycle {
    Cycle {
        id: id.to_string(),
        name: "Sprint".to_string(),
        kind: CycleKind::Iteration,
        start_date: date(2025, 1, 6),
        end_date: date(2025, 1, 17),
        parent_cycle_id: None,
    }
}

#[test]
fn edits_persist_and_reload() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    seed(&mut service);
    service
        .link_solution("p-shop", "sol-ecom", Importance::High)
        .unwrap();
    service.save().unwrap();

    let reloaded = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    assert_eq!(reloaded.context(), service.context());
    assert_eq!(reloaded.context().teams.len(), 2);
}

#[test]
fn upsert_replaces_records_with_the_same_id() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    seed(&mut service);

    service
        .upsert_team(Team::new("fe", "Web").with_target_skills(["react", "node"]))
        .unwrap();
    let teams = &service.context().teams;
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].name, "Web");
}

#[test]
fn invalid_edits_never_reach_the_context() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();

    let err = service
        .upsert_project(Project::with_id(
            "p-bad",
            "Backwards",
            date(2025, 3, 1),
            date(2025, 1, 1),
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ModelValidationError::InvalidDateRange { .. })
    ));

    let err = service
        .upsert_allocation(Allocation::new("fe", "q1", 0, 50.0))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ModelValidationError::InvalidIterationNumber { .. })
    ));
    assert_eq!(service.context(), &PlanningContext::default());
}

#[test]
fn link_solution_checks_references_and_updates_importance() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    seed(&mut service);

    let missing_project = service
        .link_solution("ghost", "sol-ecom", Importance::High)
        .unwrap_err();
    assert!(matches!(
        missing_project,
        ServiceError::NotFound { entity: "project", .. }
    ));
    let missing_solution = service
        .link_solution("p-shop", "ghost", Importance::High)
        .unwrap_err();
    assert_eq!(missing_solution.to_string(), "solution not found: ghost");

    let first = service
        .link_solution("p-shop", "sol-ecom", Importance::Low)
        .unwrap();
    let second = service
        .link_solution("p-shop", "sol-ecom", Importance::Critical)
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(service.context().project_solutions.len(), 1);
    assert_eq!(
        service.context().project_solutions[0].importance,
        Importance::Critical
    );
}

#[test]
fn required_skills_combine_solution_and_manual_entries() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    seed(&mut service);
    service
        .link_solution("p-shop", "sol-ecom", Importance::High)
        .unwrap();
    service
        .add_manual_skill("p-shop", "uiux", Importance::Low)
        .unwrap();

    let required = service.project_required_skills("p-shop").unwrap();
    let summary: Vec<(&str, bool)> = required
        .iter()
        .map(|entry| (entry.skill_id.as_str(), entry.is_derived()))
        .collect();
    assert_eq!(
        summary,
        vec![("react", true), ("node", true), ("uiux", false)]
    );
    assert_eq!(required[2].source, SkillSource::Manual);

    assert!(matches!(
        service.add_manual_skill("ghost", "react", Importance::Low),
        Err(ServiceError::NotFound { entity: "project", .. })
    ));
}

#[test]
fn remove_team_drops_its_allocations() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    seed(&mut service);
    service
        .upsert_allocation(Allocation::new("fe", "q1", 1, 60.0))
        .unwrap();
    service
        .upsert_allocation(Allocation::new("fe", "q1", 2, 60.0))
        .unwrap();
    service
        .upsert_allocation(Allocation::new("be", "q1", 1, 60.0))
        .unwrap();

    assert_eq!(service.remove_team("fe").unwrap(), 2);
    assert_eq!(service.context().allocations.len(), 1);
    assert!(service.context().team("fe").is_none());
    assert!(matches!(
        service.remove_team("fe"),
        Err(ServiceError::NotFound { entity: "team", .. })
    ));
}

#[test]
fn cycle_views_require_a_known_cycle() {
    let mut context = PlanningContext {
        teams: vec![Team::new("fe", "Frontend"), Team::new("be", "Backend")],
        cycles: vec![sprint("it-1")],
        ..PlanningContext::default()
    };
    context.allocations.push(Allocation::new("fe", "it-1", 1, 90.0));

    let conn = open_db_in_memory().unwrap();
    let service = PlanningService::with_context(SqlitePlanningRepository::new(&conn), context);

    let progress = service.planning_progress("it-1").unwrap();
    assert_eq!(progress.total_cells, 2);
    assert_eq!(progress.allocated_cells, 1);
    assert_eq!(progress.optimal_cells, 1);

    let utilizations = service.team_utilizations("it-1").unwrap();
    let peaks: Vec<(&str, f64)> = utilizations
        .iter()
        .map(|u| (u.team_id.as_str(), u.peak_percentage))
        .collect();
    assert_eq!(peaks, vec![("fe", 90.0), ("be", 0.0)]);

    assert_eq!(service.work_split("it-1").unwrap().unassigned_percentage, 100.0);
    assert!(matches!(
        service.planning_progress("q9"),
        Err(ServiceError::NotFound { entity: "cycle", .. })
    ));
}

#[test]
fn scenario_covers_selected_projects() {
    let conn = open_db_in_memory().unwrap();
    let mut service = PlanningService::load(SqlitePlanningRepository::new(&conn)).unwrap();
    seed(&mut service);
    service
        .link_solution("p-shop", "sol-ecom", Importance::High)
        .unwrap();

    let selected = vec!["p-shop".to_string(), "ghost".to_string()];
    let analyses = service.analyze(&selected, &FeasibilityOptions::default());
    assert_eq!(analyses.len(), 1);

    let summary = service.scenario(&selected, &FeasibilityOptions::default());
    assert_eq!(summary.project_count, 1);
    assert_eq!(summary.ranking[0].project_id, "p-shop");
    assert_eq!(summary.team_demand.len(), 2);
}
