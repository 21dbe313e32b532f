//! Project feasibility analysis.
//!
//! # Responsibility
//! - Combine skill coverage, budget and capacity signals into one score.
//! - Enumerate severity-tagged risk factors per project.
//! - Estimate the budget required to staff a project with its best team.
//!
//! # Invariants
//! - Output order follows the selection order; unknown project ids are skipped.
//! - Identical inputs produce identical output. Schedule risks only use the
//!   explicit `FeasibilityOptions::as_of` date, never the system clock.

use crate::analysis::allocation::{iterations_for_cycle, team_utilization, TeamUtilization};
use crate::analysis::compatibility::{rank_teams, CompatibilityScore};
use crate::analysis::skills::{derive_required_skills, required_skill_ids};
use crate::config::AnalysisConfig;
use crate::context::PlanningContext;
use crate::model::project::{MilestoneStatus, Project};
use crate::model::skill::ProjectSkill;
use crate::model::team::{EmploymentType, FinancialConfig, Person, Team};
use crate::model::{CycleId, ProjectId, SkillId, TeamId};
use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Caller-supplied knobs for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeasibilityOptions {
    /// Cycle whose allocations feed the capacity signal.
    pub cycle_id: Option<CycleId>,
    /// Point-in-time date for schedule risks.
    pub as_of: Option<NaiveDate>,
    pub config: AnalysisConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    NoSkillRequirements,
    NoCompatibleTeam,
    SkillGap,
    OverBudget,
    MissingBudget,
    TeamWithoutMembers,
    TeamOverAllocated,
    DivisionBudgetExceeded,
    ScheduleOverdue,
    ScheduleTight,
    MilestoneOverdue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub severity: RiskSeverity,
    pub description: String,
}

impl RiskFactor {
    fn new(kind: RiskKind, severity: RiskSeverity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityLevel {
    Low,
    Medium,
    High,
}

/// Cost estimate for staffing a project with its best team.
///
/// Cost fields are `None` when no team is recommended or the best team has
/// no costed active members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRequirement {
    pub team_id: Option<TeamId>,
    pub daily_team_cost: Option<f64>,
    pub working_days: u32,
    pub estimated_cost: Option<f64>,
    pub allocated_budget: Option<f64>,
    /// `allocated_budget - estimated_cost`; negative means overrun.
    pub variance: Option<f64>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFeasibilityAnalysis {
    pub project_id: ProjectId,
    pub project_name: String,
    pub required_skills: Vec<ProjectSkill>,
    pub required_skill_ids: Vec<SkillId>,
    /// Every team, best match first.
    pub team_scores: Vec<CompatibilityScore>,
    pub recommended_team_ids: Vec<TeamId>,
    /// Percentage `0..=100` of required skills held by at least one team.
    pub skill_coverage: f64,
    pub uncovered_skill_ids: Vec<SkillId>,
    pub best_team_utilization: Option<TeamUtilization>,
    pub budget_requirement: BudgetRequirement,
    /// `0..=100`.
    pub feasibility_score: f64,
    pub feasibility_level: FeasibilityLevel,
    pub risk_factors: Vec<RiskFactor>,
}

impl ProjectFeasibilityAnalysis {
    pub fn has_critical_risk(&self) -> bool {
        self.risk_factors
            .iter()
            .any(|risk| risk.severity == RiskSeverity::Critical)
    }
}

/// Analyses each selected project against the whole planning context.
pub fn analyze_feasibility(
    selected_project_ids: &[ProjectId],
    context: &PlanningContext,
    options: &FeasibilityOptions,
) -> Vec<ProjectFeasibilityAnalysis> {
    let mut analyses = Vec::with_capacity(selected_project_ids.len());
    for project_id in selected_project_ids {
        let Some(project) = context.project(project_id) else {
            debug!(
                "event=feasibility_skip module=analysis status=skipped project_id={} reason=not_found",
                project_id
            );
            continue;
        };
        analyses.push(analyze_project(project, context, options));
    }
    analyses
}

/// Analyses one project.
pub fn analyze_project(
    project: &Project,
    context: &PlanningContext,
    options: &FeasibilityOptions,
) -> ProjectFeasibilityAnalysis {
    let config = &options.config;
    let stored: Vec<ProjectSkill> = context.stored_skills_for(&project.id).cloned().collect();
    let required_skills = derive_required_skills(
        project,
        &stored,
        &context.solutions,
        &context.skills,
        &context.project_solutions,
    );
    let required_ids = required_skill_ids(&required_skills);

    let team_scores = rank_teams(
        &context.teams,
        &context.people,
        &context.person_skills,
        &required_ids,
    );
    let recommended_team_ids: Vec<TeamId> = team_scores
        .iter()
        .filter(|score| score.skills_matched > 0)
        .take(config.max_recommended_teams)
        .map(|score| score.team_id.clone())
        .collect();

    let held: BTreeSet<&SkillId> = team_scores
        .iter()
        .flat_map(|score| score.matched_skill_ids.iter())
        .collect();
    let uncovered_skill_ids: Vec<SkillId> = required_ids
        .iter()
        .filter(|skill_id| !held.contains(skill_id))
        .cloned()
        .collect();
    let skill_coverage = if required_ids.is_empty() {
        0.0
    } else {
        (required_ids.len() - uncovered_skill_ids.len()) as f64 / required_ids.len() as f64 * 100.0
    };

    let best_team = recommended_team_ids
        .first()
        .and_then(|team_id| context.team(team_id));
    let budget_requirement = estimate_budget(project, best_team, context);

    let best_team_utilization = match (best_team, options.cycle_id.as_deref()) {
        (Some(team), Some(cycle_id)) => {
            let iterations = iterations_for_cycle(&context.cycles, cycle_id);
            if iterations.is_empty() {
                debug!(
                    "event=feasibility_capacity module=analysis status=skipped project_id={} cycle_id={} reason=no_iterations",
                    project.id, cycle_id
                );
                None
            } else {
                Some(team_utilization(
                    &team.id,
                    &iterations,
                    &context.allocations,
                    cycle_id,
                ))
            }
        }
        _ => None,
    };

    let skill_signal = if required_ids.is_empty() {
        None
    } else {
        Some(
            team_scores
                .first()
                .map_or(0.0, |score| score.compatibility_score),
        )
    };
    let budget_signal = match (project.budget, budget_requirement.estimated_cost) {
        (Some(_), Some(cost)) if cost <= 0.0 => Some(100.0),
        (Some(budget), Some(cost)) => Some((budget / cost).min(1.0) * 100.0),
        _ => None,
    };
    let capacity_signal = best_team_utilization
        .as_ref()
        .map(|utilization| (100.0 - utilization.average_percentage).clamp(0.0, 100.0));

    let feasibility_score = weighted_score(&[
        (config.weights.skill, skill_signal),
        (config.weights.budget, budget_signal),
        (config.weights.capacity, capacity_signal),
    ]);
    let feasibility_level = if feasibility_score >= config.high_threshold {
        FeasibilityLevel::High
    } else if feasibility_score >= config.medium_threshold {
        FeasibilityLevel::Medium
    } else {
        FeasibilityLevel::Low
    };

    let inputs = RiskInputs {
        project,
        context,
        options,
        required_ids: &required_ids,
        recommended_team_ids: &recommended_team_ids,
        uncovered_skill_ids: &uncovered_skill_ids,
        skill_coverage,
        best_team,
        best_team_utilization: best_team_utilization.as_ref(),
        budget_requirement: &budget_requirement,
    };
    let risk_factors = collect_risks(&inputs);

    debug!(
        "event=feasibility module=analysis status=ok project_id={} required_skills={} coverage={:.1} score={:.1} risks={}",
        project.id,
        required_ids.len(),
        skill_coverage,
        feasibility_score,
        risk_factors.len()
    );

    ProjectFeasibilityAnalysis {
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        required_skills,
        required_skill_ids: required_ids,
        team_scores,
        recommended_team_ids,
        skill_coverage,
        uncovered_skill_ids,
        best_team_utilization,
        budget_requirement,
        feasibility_score,
        feasibility_level,
        risk_factors,
    }
}

/// Weighted mean over the signals that are present; `0` when none are.
fn weighted_score(signals: &[(f64, Option<f64>)]) -> f64 {
    let (sum, weight) = signals
        .iter()
        .filter_map(|(weight, value)| value.map(|value| (*weight, value)))
        .fold((0.0, 0.0), |(sum, total), (weight, value)| {
            (sum + weight * value, total + weight)
        });
    if weight <= 0.0 {
        0.0
    } else {
        sum / weight
    }
}

/// Annual cost of one person, falling back to role defaults.
pub fn annual_person_cost(
    person: &Person,
    context: &PlanningContext,
    financial: &FinancialConfig,
) -> f64 {
    let role = person.role_id.as_deref().and_then(|id| context.role(id));
    let hourly_cost = |rate: f64| {
        rate * financial.working_hours_per_day * f64::from(financial.working_days_per_year)
    };

    match person.employment_type {
        EmploymentType::Permanent => person
            .annual_salary
            .or_else(|| role.and_then(|role| role.default_annual_salary))
            .or_else(|| person.hourly_rate.map(hourly_cost))
            .unwrap_or(0.0),
        EmploymentType::Contractor => person
            .hourly_rate
            .or_else(|| role.and_then(|role| role.default_hourly_rate))
            .map(hourly_cost)
            .or(person.annual_salary)
            .unwrap_or(0.0),
    }
}

/// Daily cost of a team's active members.
pub fn daily_team_cost(team: &Team, context: &PlanningContext) -> f64 {
    let financial = &context.financial_config;
    if financial.working_days_per_year == 0 {
        return 0.0;
    }
    let annual: f64 = context
        .active_members(&team.id)
        .map(|person| annual_person_cost(person, context, financial))
        .sum();
    annual / f64::from(financial.working_days_per_year)
}

/// Counts Monday..Friday days in `start..=end`; `0` for reversed windows.
pub fn working_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32
}

fn estimate_budget(
    project: &Project,
    best_team: Option<&Team>,
    context: &PlanningContext,
) -> BudgetRequirement {
    let working_days = working_days_between(project.start_date, project.end_date);
    let daily = best_team
        .map(|team| daily_team_cost(team, context))
        .filter(|daily| *daily > 0.0);
    let estimated_cost = daily.map(|daily| daily * f64::from(working_days));

    BudgetRequirement {
        team_id: best_team.map(|team| team.id.clone()),
        daily_team_cost: daily,
        working_days,
        estimated_cost,
        allocated_budget: project.budget,
        variance: project
            .budget
            .zip(estimated_cost)
            .map(|(budget, cost)| budget - cost),
        currency: context.financial_config.currency.clone(),
    }
}

struct RiskInputs<'a> {
    project: &'a Project,
    context: &'a PlanningContext,
    options: &'a FeasibilityOptions,
    required_ids: &'a [SkillId],
    recommended_team_ids: &'a [TeamId],
    uncovered_skill_ids: &'a [SkillId],
    skill_coverage: f64,
    best_team: Option<&'a Team>,
    best_team_utilization: Option<&'a TeamUtilization>,
    budget_requirement: &'a BudgetRequirement,
}

fn collect_risks(inputs: &RiskInputs<'_>) -> Vec<RiskFactor> {
    let mut risks = Vec::new();
    skill_risks(inputs, &mut risks);
    budget_risks(inputs, &mut risks);
    team_risks(inputs, &mut risks);
    schedule_risks(inputs, &mut risks);
    risks
}

fn skill_risks(inputs: &RiskInputs<'_>, risks: &mut Vec<RiskFactor>) {
    if inputs.required_ids.is_empty() {
        risks.push(RiskFactor::new(
            RiskKind::NoSkillRequirements,
            RiskSeverity::Warning,
            "project has no skill requirements; team matching is not possible",
        ));
        return;
    }

    if inputs.recommended_team_ids.is_empty() {
        risks.push(RiskFactor::new(
            RiskKind::NoCompatibleTeam,
            RiskSeverity::Critical,
            "no team holds any of the required skills",
        ));
    }

    if !inputs.uncovered_skill_ids.is_empty() {
        let severity = if inputs.skill_coverage < 50.0 {
            RiskSeverity::Critical
        } else {
            RiskSeverity::Warning
        };
        risks.push(RiskFactor::new(
            RiskKind::SkillGap,
            severity,
            format!(
                "{} of {} required skills are not covered by any team: {}",
                inputs.uncovered_skill_ids.len(),
                inputs.required_ids.len(),
                inputs.uncovered_skill_ids.join(", ")
            ),
        ));
    }
}

fn budget_risks(inputs: &RiskInputs<'_>, risks: &mut Vec<RiskFactor>) {
    let requirement = inputs.budget_requirement;
    let Some(budget) = inputs.project.budget else {
        risks.push(RiskFactor::new(
            RiskKind::MissingBudget,
            RiskSeverity::Info,
            "project has no budget set",
        ));
        return;
    };

    let Some(estimated_cost) = requirement.estimated_cost else {
        return;
    };
    if estimated_cost > budget {
        let overrun = estimated_cost - budget;
        let critical = budget <= 0.0
            || overrun / budget > inputs.options.config.over_budget_critical_ratio;
        risks.push(RiskFactor::new(
            RiskKind::OverBudget,
            if critical {
                RiskSeverity::Critical
            } else {
                RiskSeverity::Warning
            },
            format!(
                "estimated cost {:.2} {} exceeds budget {:.2} by {:.2}",
                estimated_cost, requirement.currency, budget, overrun
            ),
        ));
    }
}

fn team_risks(inputs: &RiskInputs<'_>, risks: &mut Vec<RiskFactor>) {
    let Some(team) = inputs.best_team else {
        return;
    };

    if inputs.context.active_members(&team.id).next().is_none() {
        risks.push(RiskFactor::new(
            RiskKind::TeamWithoutMembers,
            RiskSeverity::Warning,
            format!("recommended team `{}` has no active members", team.name),
        ));
    }

    if let Some(utilization) = inputs.best_team_utilization {
        if !utilization.over_allocated_iterations.is_empty() {
            let iterations: Vec<String> = utilization
                .over_allocated_iterations
                .iter()
                .map(u32::to_string)
                .collect();
            risks.push(RiskFactor::new(
                RiskKind::TeamOverAllocated,
                RiskSeverity::Warning,
                format!(
                    "recommended team `{}` is over-allocated in iterations {}",
                    team.name,
                    iterations.join(", ")
                ),
            ));
        }
    }

    let division_budget = team.division_id.as_deref().and_then(|division_id| {
        inputs
            .context
            .division_budget(division_id, inputs.project.start_date.year())
    });
    if let (Some(division_budget), Some(estimated_cost)) =
        (division_budget, inputs.budget_requirement.estimated_cost)
    {
        if estimated_cost > division_budget.amount {
            risks.push(RiskFactor::new(
                RiskKind::DivisionBudgetExceeded,
                RiskSeverity::Warning,
                format!(
                    "estimated cost {:.2} exceeds division budget {:.2} for {}",
                    estimated_cost,
                    division_budget.amount,
                    division_budget.year
                ),
            ));
        }
    }
}

fn schedule_risks(inputs: &RiskInputs<'_>, risks: &mut Vec<RiskFactor>) {
    let Some(as_of) = inputs.options.as_of else {
        return;
    };
    let project = inputs.project;
    if project.status.is_closed() {
        return;
    }

    let days_left = (project.end_date - as_of).num_days();
    if days_left < 0 {
        risks.push(RiskFactor::new(
            RiskKind::ScheduleOverdue,
            RiskSeverity::Critical,
            format!(
                "project end date {} passed {} days ago",
                project.end_date, -days_left
            ),
        ));
    } else if days_left < inputs.options.config.schedule_warning_days {
        risks.push(RiskFactor::new(
            RiskKind::ScheduleTight,
            RiskSeverity::Warning,
            format!("only {days_left} days left until {}", project.end_date),
        ));
    }

    let overdue = project
        .milestones
        .iter()
        .filter(|milestone| {
            milestone.status != MilestoneStatus::Completed && milestone.due_date < as_of
        })
        .count();
    if overdue > 0 {
        risks.push(RiskFactor::new(
            RiskKind::MilestoneOverdue,
            RiskSeverity::Warning,
            format!("{overdue} milestone(s) past due and not completed"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{weighted_score, working_days_between};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn working_days_skip_weekends() {
        // 2025-01-06 is a Monday.
        assert_eq!(working_days_between(date(2025, 1, 6), date(2025, 1, 12)), 5);
        assert_eq!(working_days_between(date(2025, 1, 6), date(2025, 1, 19)), 10);
        assert_eq!(working_days_between(date(2025, 1, 11), date(2025, 1, 12)), 0);
        assert_eq!(working_days_between(date(2025, 1, 12), date(2025, 1, 6)), 0);
    }

    #[test]
    fn weighted_score_ignores_missing_signals() {
        assert_eq!(weighted_score(&[(0.6, Some(50.0)), (0.2, None)]), 50.0);
        assert_eq!(weighted_score(&[(0.5, Some(100.0)), (0.5, Some(0.0))]), 50.0);
        assert_eq!(weighted_score(&[(0.6, None)]), 0.0);
    }
}
