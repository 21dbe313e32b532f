use chrono::NaiveDate;
use planner_core::{
    derive_required_skills, required_skill_ids, Importance, Project, ProjectSkill,
    ProjectSolution, Skill, SkillSource, Solution,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn project(id: &str) -> Project {
    Project::with_id(id, "Storefront", date(2025, 1, 6), date(2025, 3, 28))
}

fn registry() -> Vec<Skill> {
    vec![
        Skill::new("react", "React", "frontend"),
        Skill::new("node", "Node", "backend"),
        Skill::new("db", "DB", "data"),
        Skill::new("uiux", "UI/UX", "design"),
    ]
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn ecommerce() -> Solution {
    Solution::new(
        "sol-ecom",
        "E-commerce Platform",
        "web",
        ids(&["react", "node", "db"]),
    )
}

fn link(project_id: &str, solution_id: &str, importance: Importance) -> ProjectSolution {
    ProjectSolution {
        id: format!("{project_id}-{solution_id}"),
        project_id: project_id.to_string(),
        solution_id: solution_id.to_string(),
        importance,
    }
}

#[test]
fn ecommerce_solution_yields_three_derived_skills() {
    let derived = derive_required_skills(
        &project("p"),
        &[],
        &[ecommerce()],
        &registry(),
        &[link("p", "sol-ecom", Importance::High)],
    );

    assert_eq!(derived.len(), 3);
    let skill_ids: Vec<&str> = derived.iter().map(|entry| entry.skill_id.as_str()).collect();
    assert_eq!(skill_ids, vec!["react", "node", "db"]);
    for entry in &derived {
        assert_eq!(entry.notes.as_deref(), Some("Required by E-commerce Platform"));
        assert_eq!(entry.importance, Importance::High);
        assert_eq!(entry.project_id, "p");
        assert_eq!(entry.source.solution_id(), Some("sol-ecom"));
    }
}

#[test]
fn shared_skills_across_solutions_appear_once_with_first_provenance() {
    let analytics = Solution::new("sol-bi", "Analytics Suite", "data", ids(&["db", "uiux"]));
    let derived = derive_required_skills(
        &project("p"),
        &[],
        &[ecommerce(), analytics],
        &registry(),
        &[
            link("p", "sol-ecom", Importance::High),
            link("p", "sol-bi", Importance::Low),
        ],
    );

    let db_entries: Vec<&ProjectSkill> = derived.iter().filter(|e| e.skill_id == "db").collect();
    assert_eq!(db_entries.len(), 1);
    assert_eq!(
        db_entries[0].source,
        SkillSource::Solution {
            solution_id: "sol-ecom".to_string()
        }
    );
    assert_eq!(db_entries[0].importance, Importance::High);

    let order: Vec<&str> = derived.iter().map(|e| e.skill_id.as_str()).collect();
    assert_eq!(order, vec!["react", "node", "db", "uiux"]);
}

#[test]
fn missing_solution_contributes_nothing() {
    let derived = derive_required_skills(
        &project("p"),
        &[],
        &[ecommerce()],
        &registry(),
        &[link("p", "does-not-exist", Importance::High)],
    );
    assert!(derived.is_empty());
}

#[test]
fn solution_without_skill_field_contributes_nothing() {
    let empty: Solution = serde_json::from_value(serde_json::json!({
        "id": "sol-empty",
        "name": "Blank",
        "category": "misc"
    }))
    .unwrap();
    assert!(empty.skill_ids.is_empty());

    let derived = derive_required_skills(
        &project("p"),
        &[],
        &[empty],
        &registry(),
        &[link("p", "sol-empty", Importance::Medium)],
    );
    assert!(derived.is_empty());
}

#[test]
fn manual_skills_fill_gaps_after_solution_skills() {
    let manual = vec![
        ProjectSkill::manual("p", "node", Importance::Critical),
        ProjectSkill::manual("p", "uiux", Importance::Low),
    ];
    let derived = derive_required_skills(
        &project("p"),
        &manual,
        &[ecommerce()],
        &registry(),
        &[link("p", "sol-ecom", Importance::Medium)],
    );

    let order: Vec<&str> = derived.iter().map(|e| e.skill_id.as_str()).collect();
    assert_eq!(order, vec!["react", "node", "db", "uiux"]);

    let node = derived.iter().find(|e| e.skill_id == "node").unwrap();
    assert!(node.is_derived(), "solution entry must win over manual entry");
    assert_eq!(node.importance, Importance::Medium);

    let uiux = derived.iter().find(|e| e.skill_id == "uiux").unwrap();
    assert_eq!(uiux.source, SkillSource::Manual);
    assert_eq!(uiux.id, manual[1].id);
}

#[test]
fn repeated_manual_skill_keeps_its_first_entry() {
    let manual = vec![
        ProjectSkill::manual("p", "uiux", Importance::High),
        ProjectSkill::manual("p", "uiux", Importance::Low),
    ];
    let derived = derive_required_skills(&project("p"), &manual, &[], &registry(), &[]);

    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].id, manual[0].id);
    assert_eq!(derived[0].importance, Importance::High);
}

#[test]
fn links_and_manual_skills_of_other_projects_are_ignored() {
    let manual = vec![ProjectSkill::manual("other", "uiux", Importance::Low)];
    let derived = derive_required_skills(
        &project("p"),
        &manual,
        &[ecommerce()],
        &registry(),
        &[link("other", "sol-ecom", Importance::High)],
    );
    assert!(derived.is_empty());
}

#[test]
fn dangling_and_blank_skill_ids_pass_through_but_are_not_required_ids() {
    let odd = Solution::new("sol-odd", "Odd", "misc", ids(&["", "ghost", "react"]));
    let derived = derive_required_skills(
        &project("p"),
        &[],
        &[odd],
        &registry(),
        &[link("p", "sol-odd", Importance::Medium)],
    );

    let order: Vec<&str> = derived.iter().map(|e| e.skill_id.as_str()).collect();
    assert_eq!(order, vec!["", "ghost", "react"]);
    assert_eq!(required_skill_ids(&derived), ids(&["ghost", "react"]));
}

#[test]
fn derivation_is_deterministic() {
    let run = || {
        derive_required_skills(
            &project("p"),
            &[],
            &[ecommerce()],
            &registry(),
            &[link("p", "sol-ecom", Importance::High)],
        )
    };
    assert_eq!(run(), run());
}
