use chrono::NaiveDate;
use planner_core::{
    Allocation, FinancialConfig, Importance, ModelValidationError, Person, Project, ProjectSkill,
    SkillSource, Team, Validate,
};
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn project_rejects_negative_budget_and_blank_name() {
    let mut project = Project::with_id("p", "Shop", date(2025, 1, 1), date(2025, 2, 1));
    assert!(project.validate().is_ok());

    project.budget = Some(-1.0);
    assert!(matches!(
        project.validate(),
        Err(ModelValidationError::InvalidAmount { field: "budget", .. })
    ));

    project.budget = Some(f64::NAN);
    assert!(project.validate().is_err());

    project.budget = None;
    project.name = " ".to_string();
    assert_eq!(
        project.validate().unwrap_err().to_string(),
        "project `p` name cannot be empty"
    );
}

#[test]
fn allocation_requires_positive_iteration_and_finite_percentage() {
    assert!(Allocation::new("fe", "q1", 1, 0.0).validate().is_ok());
    assert!(Allocation::new("fe", "q1", 1, 250.0).validate().is_ok());
    assert!(Allocation::new("fe", "q1", 1, f64::INFINITY)
        .validate()
        .is_err());
    assert!(matches!(
        Allocation::new("", "q1", 1, 10.0).validate(),
        Err(ModelValidationError::EmptyId { entity: "team" })
    ));
}

#[test]
fn financial_config_rejects_zero_divisors() {
    assert!(FinancialConfig::default().validate().is_ok());
    let zero_days = FinancialConfig {
        working_days_per_year: 0,
        ..FinancialConfig::default()
    };
    assert!(zero_days.validate().is_err());
    let zero_hours = FinancialConfig {
        working_hours_per_day: 0.0,
        ..FinancialConfig::default()
    };
    assert!(zero_hours.validate().is_err());
}

#[test]
fn project_skill_wire_shape_is_snake_case_with_tagged_source() {
    let mut link = ProjectSkill::manual("p", "react", Importance::Critical);
    link.id = "ps-1".to_string();
    link.source = SkillSource::Solution {
        solution_id: "sol-ecom".to_string(),
    };

    let value = serde_json::to_value(&link).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "ps-1",
            "project_id": "p",
            "skill_id": "react",
            "importance": "critical",
            "source": { "kind": "solution", "solution_id": "sol-ecom" },
            "notes": null
        })
    );

    let manual: ProjectSkill = serde_json::from_value(json!({
        "id": "ps-2",
        "project_id": "p",
        "skill_id": "db",
        "source": { "kind": "manual" }
    }))
    .unwrap();
    assert_eq!(manual.source, SkillSource::Manual);
    assert_eq!(manual.importance, Importance::Medium);
}

#[test]
fn sparse_records_fill_defaults() {
    let person: Person = serde_json::from_value(json!({ "id": "ada", "name": "Ada" })).unwrap();
    assert!(person.is_active);
    assert_eq!(person.team_id, None);

    let team: Team = serde_json::from_value(json!({
        "id": "fe",
        "name": "Frontend",
        "target_skills": ["react", "react", "css"]
    }))
    .unwrap();
    assert_eq!(team.target_skills.len(), 2);
    assert_eq!(team.capacity, 0);
}
