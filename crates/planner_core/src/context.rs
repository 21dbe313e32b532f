//! Explicit planning context passed to every analysis call.
//!
//! # Responsibility
//! - Bundle all reference collections the analyses read.
//! - Provide id lookups without any ambient/global state.
//!
//! # Invariants
//! - Lookups return the first record with a matching id.
//! - The context is read-only from the analysis point of view.

use crate::model::cycle::{Allocation, Cycle, RunWorkCategory};
use crate::model::project::{Epic, Project};
use crate::model::skill::{ProjectSkill, ProjectSolution, Skill, Solution};
use crate::model::team::{
    Division, DivisionBudget, FinancialConfig, Person, PersonSkill, Role, Team,
};
use serde::{Deserialize, Serialize};

/// Every collection the planning application holds in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningContext {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub solutions: Vec<Solution>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub project_skills: Vec<ProjectSkill>,
    #[serde(default)]
    pub project_solutions: Vec<ProjectSolution>,
    #[serde(default)]
    pub epics: Vec<Epic>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub division_budgets: Vec<DivisionBudget>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub person_skills: Vec<PersonSkill>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub cycles: Vec<Cycle>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub run_work_categories: Vec<RunWorkCategory>,
    #[serde(default)]
    pub financial_config: FinancialConfig,
}

impl PlanningContext {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    pub fn solution(&self, id: &str) -> Option<&Solution> {
        self.solutions.iter().find(|solution| solution.id == id)
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == id)
    }

    pub fn cycle(&self, id: &str) -> Option<&Cycle> {
        self.cycles.iter().find(|cycle| cycle.id == id)
    }

    /// Stored skill requirements of one project, whatever their source.
    ///
    /// Includes entries upgraded from legacy notes to solution provenance.
    pub fn stored_skills_for<'a>(
        &'a self,
        project_id: &'a str,
    ) -> impl Iterator<Item = &'a ProjectSkill> + 'a {
        self.project_skills
            .iter()
            .filter(move |link| link.project_id == project_id)
    }

    /// Active members of one team.
    pub fn active_members<'a>(&'a self, team_id: &'a str) -> impl Iterator<Item = &'a Person> + 'a {
        self.people
            .iter()
            .filter(move |person| person.is_active && person.team_id.as_deref() == Some(team_id))
    }

    /// Budget envelope for a division and calendar year.
    pub fn division_budget(&self, division_id: &str, year: i32) -> Option<&DivisionBudget> {
        self.division_budgets
            .iter()
            .find(|budget| budget.division_id == division_id && budget.year == year)
    }
}

#[cfg(test)]
mod tests {
    use super::PlanningContext;
    use crate::model::skill::{Importance, ProjectSkill, SkillSource};

    #[test]
    fn stored_skills_include_every_source_of_one_project() {
        let mut upgraded = ProjectSkill::manual("p", "react", Importance::High);
        upgraded.source = SkillSource::Solution {
            solution_id: "sol-ecom".to_string(),
        };
        let context = PlanningContext {
            project_skills: vec![
                ProjectSkill::manual("p", "uiux", Importance::Low),
                upgraded,
                ProjectSkill::manual("other", "db", Importance::Low),
            ],
            ..PlanningContext::default()
        };

        let skill_ids: Vec<&str> = context
            .stored_skills_for("p")
            .map(|link| link.skill_id.as_str())
            .collect();
        assert_eq!(skill_ids, vec!["uiux", "react"]);
    }
}
