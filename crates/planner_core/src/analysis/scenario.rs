//! Scenario summaries across a set of analysed projects.
//!
//! # Invariants
//! - Ranking is by feasibility score desc, ties broken by project id asc.
//! - A team is contested when more than one project recommends it.

use crate::analysis::feasibility::{ProjectFeasibilityAnalysis, RiskSeverity};
use crate::model::{ProjectId, TeamId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProject {
    /// 1-based.
    pub rank: usize,
    pub project_id: ProjectId,
    pub feasibility_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub project_count: usize,
    /// Sum of estimates of projects whose cost is known.
    pub total_estimated_cost: f64,
    /// Sum of budgets of projects that have one.
    pub total_allocated_budget: f64,
    pub average_feasibility: f64,
    pub critical_risk_count: usize,
    pub warning_risk_count: usize,
    pub ranking: Vec<RankedProject>,
    /// Number of projects recommending each team.
    pub team_demand: BTreeMap<TeamId, usize>,
    pub contested_team_ids: Vec<TeamId>,
}

/// Summarises a planning scenario made of the given analyses.
pub fn summarize_scenario(analyses: &[ProjectFeasibilityAnalysis]) -> ScenarioSummary {
    if analyses.is_empty() {
        return ScenarioSummary::default();
    }

    let mut summary = ScenarioSummary {
        project_count: analyses.len(),
        ..ScenarioSummary::default()
    };

    let mut score_total = 0.0;
    for analysis in analyses {
        score_total += analysis.feasibility_score;
        summary.total_estimated_cost += analysis.budget_requirement.estimated_cost.unwrap_or(0.0);
        summary.total_allocated_budget += analysis.budget_requirement.allocated_budget.unwrap_or(0.0);
        for risk in &analysis.risk_factors {
            match risk.severity {
                RiskSeverity::Critical => summary.critical_risk_count += 1,
                RiskSeverity::Warning => summary.warning_risk_count += 1,
                RiskSeverity::Info => {}
            }
        }
        for team_id in &analysis.recommended_team_ids {
            *summary.team_demand.entry(team_id.clone()).or_insert(0) += 1;
        }
    }
    summary.average_feasibility = score_total / analyses.len() as f64;

    let mut ordered: Vec<&ProjectFeasibilityAnalysis> = analyses.iter().collect();
    ordered.sort_by(|a, b| {
        b.feasibility_score
            .partial_cmp(&a.feasibility_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    summary.ranking = ordered
        .into_iter()
        .enumerate()
        .map(|(index, analysis)| RankedProject {
            rank: index + 1,
            project_id: analysis.project_id.clone(),
            feasibility_score: analysis.feasibility_score,
        })
        .collect();

    summary.contested_team_ids = summary
        .team_demand
        .iter()
        .filter(|(_, demand)| **demand > 1)
        .map(|(team_id, _)| team_id.clone())
        .collect();

    summary
}
