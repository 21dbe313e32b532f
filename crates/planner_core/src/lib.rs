//! Core planning logic: skill matching, feasibility and allocation analysis.
//! This crate is the single source of truth for planning invariants.

pub mod analysis;
pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analysis::allocation::{
    aggregate_allocations, build_allocation_grid, iterations_for_cycle, team_utilization,
    work_split, AllocationGrid, CellStatus, CellSummary, Iteration, PlanningProgress,
    TeamUtilization, WorkSplit,
};
pub use analysis::compatibility::{
    effective_team_skills, rank_teams, score_compatibility, score_skill_set, CompatibilityScore,
};
pub use analysis::feasibility::{
    analyze_feasibility, analyze_project, BudgetRequirement, FeasibilityLevel,
    FeasibilityOptions, ProjectFeasibilityAnalysis, RiskFactor, RiskKind, RiskSeverity,
};
pub use analysis::scenario::{summarize_scenario, RankedProject, ScenarioSummary};
pub use analysis::skills::{derive_required_skills, infer_legacy_source, required_skill_ids};
pub use config::{AnalysisConfig, ConfigError, SignalWeights};
pub use context::PlanningContext;
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingConfig,
    LoggingError,
};
pub use model::cycle::{Allocation, Cycle, CycleKind, RunWorkCategory};
pub use model::project::{Epic, EpicStatus, Milestone, MilestoneStatus, Project, ProjectStatus};
pub use model::skill::{Importance, ProjectSkill, ProjectSolution, Skill, SkillSource, Solution};
pub use model::team::{
    Division, DivisionBudget, EmploymentType, FinancialConfig, Person, PersonSkill, Proficiency,
    Role, Team,
};
pub use model::{ModelValidationError, Validate};
pub use repo::planning_repo::{
    CollectionKey, PlanningRepository, RepoError, RepoResult, SqlitePlanningRepository,
};
pub use service::planning_service::{PlanningService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
