//! Planning use-case service.
//!
//! # Responsibility
//! - Own the in-memory planning context loaded from a repository.
//! - Apply replace-in-collection edits and persist them on demand.
//! - Expose the analyses over the owned context.
//!
//! # Invariants
//! - Edits are validated before they reach the in-memory context.
//! - Links must reference existing projects/solutions; analyses still
//!   tolerate dangling references in loaded data.

use crate::analysis::allocation::{
    aggregate_allocations, iterations_for_cycle, team_utilization, work_split, PlanningProgress,
    TeamUtilization, WorkSplit,
};
use crate::analysis::feasibility::{
    analyze_feasibility, FeasibilityOptions, ProjectFeasibilityAnalysis,
};
use crate::analysis::scenario::{summarize_scenario, ScenarioSummary};
use crate::analysis::skills::derive_required_skills;
use crate::context::PlanningContext;
use crate::model::cycle::Allocation;
use crate::model::project::Project;
use crate::model::skill::{Importance, ProjectSkill, ProjectSolution, Skill, Solution};
use crate::model::team::{Person, Team};
use crate::model::{upsert_by_id, ModelValidationError, ProjectId, Validate};
use crate::repo::planning_repo::{PlanningRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for planning use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Edited record violates model invariants.
    Validation(ModelValidationError),
    /// Referenced record does not exist.
    NotFound { entity: &'static str, id: String },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ModelValidationError> for ServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Planning facade over a repository implementation.
pub struct PlanningService<R: PlanningRepository> {
    repo: R,
    context: PlanningContext,
}

impl<R: PlanningRepository> PlanningService<R> {
    /// Creates a service and loads the stored planning context.
    pub fn load(repo: R) -> ServiceResult<Self> {
        let context = repo.load_context()?;
        Ok(Self { repo, context })
    }

    /// Creates a service over an explicit context (imports, tests).
    pub fn with_context(repo: R, context: PlanningContext) -> Self {
        Self { repo, context }
    }

    pub fn context(&self) -> &PlanningContext {
        &self.context
    }

    /// Persists the whole in-memory context.
    pub fn save(&self) -> ServiceResult<()> {
        self.repo.save_context(&self.context)?;
        Ok(())
    }

    pub fn upsert_skill(&mut self, skill: Skill) -> ServiceResult<()> {
        skill.validate()?;
        upsert_by_id(&mut self.context.skills, skill);
        Ok(())
    }

    pub fn upsert_solution(&mut self, solution: Solution) -> ServiceResult<()> {
        solution.validate()?;
        upsert_by_id(&mut self.context.solutions, solution);
        Ok(())
    }

    pub fn upsert_project(&mut self, project: Project) -> ServiceResult<()> {
        project.validate()?;
        upsert_by_id(&mut self.context.projects, project);
        Ok(())
    }

    pub fn upsert_team(&mut self, team: Team) -> ServiceResult<()> {
        team.validate()?;
        upsert_by_id(&mut self.context.teams, team);
        Ok(())
    }

    pub fn upsert_person(&mut self, person: Person) -> ServiceResult<()> {
        person.validate()?;
        upsert_by_id(&mut self.context.people, person);
        Ok(())
    }

    pub fn upsert_allocation(&mut self, allocation: Allocation) -> ServiceResult<()> {
        allocation.validate()?;
        upsert_by_id(&mut self.context.allocations, allocation);
        Ok(())
    }

    /// Removes a team together with its allocations.
    ///
    /// Returns the number of allocations dropped.
    pub fn remove_team(&mut self, team_id: &str) -> ServiceResult<usize> {
        let before = self.context.teams.len();
        self.context.teams.retain(|team| team.id != team_id);
        if self.context.teams.len() == before {
            return Err(ServiceError::NotFound {
                entity: "team",
                id: team_id.to_string(),
            });
        }

        let allocations_before = self.context.allocations.len();
        self.context
            .allocations
            .retain(|allocation| allocation.team_id != team_id);
        Ok(allocations_before - self.context.allocations.len())
    }

    /// Links a solution template to a project.
    ///
    /// Re-linking the same pair updates the importance of the existing link.
    pub fn link_solution(
        &mut self,
        project_id: &str,
        solution_id: &str,
        importance: Importance,
    ) -> ServiceResult<ProjectSolution> {
        self.require_project(project_id)?;
        if self.context.solution(solution_id).is_none() {
            return Err(ServiceError::NotFound {
                entity: "solution",
                id: solution_id.to_string(),
            });
        }

        if let Some(existing) = self
            .context
            .project_solutions
            .iter_mut()
            .find(|link| link.project_id == project_id && link.solution_id == solution_id)
        {
            existing.importance = importance;
            return Ok(existing.clone());
        }

        let link = ProjectSolution::new(project_id, solution_id, importance);
        self.context.project_solutions.push(link.clone());
        Ok(link)
    }

    /// Records a manually entered skill requirement.
    pub fn add_manual_skill(
        &mut self,
        project_id: &str,
        skill_id: &str,
        importance: Importance,
    ) -> ServiceResult<ProjectSkill> {
        self.require_project(project_id)?;
        let link = ProjectSkill::manual(project_id, skill_id, importance);
        link.validate()?;
        self.context.project_skills.push(link.clone());
        Ok(link)
    }

    /// Derived skill requirements of one project.
    pub fn project_required_skills(&self, project_id: &str) -> ServiceResult<Vec<ProjectSkill>> {
        let project = self.require_project(project_id)?;
        let stored: Vec<ProjectSkill> = self.context.stored_skills_for(project_id).cloned().collect();
        Ok(derive_required_skills(
            project,
            &stored,
            &self.context.solutions,
            &self.context.skills,
            &self.context.project_solutions,
        ))
    }

    /// Runs feasibility analysis for the selected projects.
    pub fn analyze(
        &self,
        selected_project_ids: &[ProjectId],
        options: &FeasibilityOptions,
    ) -> Vec<ProjectFeasibilityAnalysis> {
        let analyses = analyze_feasibility(selected_project_ids, &self.context, options);
        info!(
            "event=feasibility_run module=service status=ok selected={} analysed={}",
            selected_project_ids.len(),
            analyses.len()
        );
        analyses
    }

    /// Analyses the selection and summarises it as one scenario.
    pub fn scenario(
        &self,
        selected_project_ids: &[ProjectId],
        options: &FeasibilityOptions,
    ) -> ScenarioSummary {
        summarize_scenario(&self.analyze(selected_project_ids, options))
    }

    /// Planning grid statistics for one cycle across all teams.
    pub fn planning_progress(&self, cycle_id: &str) -> ServiceResult<PlanningProgress> {
        self.require_cycle(cycle_id)?;
        let iterations = iterations_for_cycle(&self.context.cycles, cycle_id);
        Ok(aggregate_allocations(
            &self.context.teams,
            &iterations,
            &self.context.allocations,
            cycle_id,
        ))
    }

    /// Per-team utilisation for one cycle, in team order.
    pub fn team_utilizations(&self, cycle_id: &str) -> ServiceResult<Vec<TeamUtilization>> {
        self.require_cycle(cycle_id)?;
        let iterations = iterations_for_cycle(&self.context.cycles, cycle_id);
        Ok(self
            .context
            .teams
            .iter()
            .map(|team| team_utilization(&team.id, &iterations, &self.context.allocations, cycle_id))
            .collect())
    }

    pub fn work_split(&self, cycle_id: &str) -> ServiceResult<WorkSplit> {
        self.require_cycle(cycle_id)?;
        Ok(work_split(&self.context.allocations, cycle_id))
    }

    fn require_project(&self, project_id: &str) -> ServiceResult<&Project> {
        self.context
            .project(project_id)
            .ok_or_else(|| ServiceError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            })
    }

    fn require_cycle(&self, cycle_id: &str) -> ServiceResult<()> {
        if self.context.cycle(cycle_id).is_none() {
            return Err(ServiceError::NotFound {
                entity: "cycle",
                id: cycle_id.to_string(),
            });
        }
        Ok(())
    }
}
