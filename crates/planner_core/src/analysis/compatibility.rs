//! Team/project skill compatibility scoring.
//!
//! # Responsibility
//! - Compare a team's skill set with a project's requirement list.
//! - Rank teams by compatibility.
//!
//! # Invariants
//! - `compatibility_score` is `skills_matched / skills_required * 100`, and
//!   `0` when nothing is required.
//! - Required ids are counted as given: duplicates are not collapsed, so a
//!   duplicated requirement the team holds counts twice. Callers pass the
//!   output of `required_skill_ids` to avoid that.

use crate::model::team::{Person, PersonSkill, Team};
use crate::model::{SkillId, TeamId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Upper bound of the compatibility score range.
pub const MAX_COMPATIBILITY_SCORE: f64 = 100.0;

/// Result of matching one team against one requirement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    pub team_id: TeamId,
    pub team_name: String,
    pub skills_matched: usize,
    pub skills_required: usize,
    /// `0..=100`.
    pub compatibility_score: f64,
    pub matched_skill_ids: Vec<SkillId>,
    pub missing_skill_ids: Vec<SkillId>,
}

/// Scores a team by its declared `target_skills`.
pub fn score_compatibility(team: &Team, required_skill_ids: &[SkillId]) -> CompatibilityScore {
    score_skill_set(team, &team.target_skills, required_skill_ids)
}

/// Scores a team using an explicit skill set (e.g. including member skills).
pub fn score_skill_set(
    team: &Team,
    team_skills: &BTreeSet<SkillId>,
    required_skill_ids: &[SkillId],
) -> CompatibilityScore {
    let (matched, missing): (Vec<&SkillId>, Vec<&SkillId>) = required_skill_ids
        .iter()
        .partition(|skill_id| team_skills.contains(*skill_id));

    let skills_required = required_skill_ids.len();
    let skills_matched = matched.len();
    let compatibility_score = if skills_required == 0 {
        0.0
    } else {
        skills_matched as f64 / skills_required as f64 * MAX_COMPATIBILITY_SCORE
    };

    CompatibilityScore {
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        skills_matched,
        skills_required,
        compatibility_score,
        matched_skill_ids: matched.into_iter().cloned().collect(),
        missing_skill_ids: missing.into_iter().cloned().collect(),
    }
}

/// Declared team skills plus the skills held by its active members.
pub fn effective_team_skills(
    team: &Team,
    people: &[Person],
    person_skills: &[PersonSkill],
) -> BTreeSet<SkillId> {
    let member_ids: BTreeSet<&str> = people
        .iter()
        .filter(|person| person.is_active && person.team_id.as_deref() == Some(team.id.as_str()))
        .map(|person| person.id.as_str())
        .collect();

    let mut skills = team.target_skills.clone();
    skills.extend(
        person_skills
            .iter()
            .filter(|link| member_ids.contains(link.person_id.as_str()))
            .map(|link| link.skill_id.clone()),
    );
    skills
}

/// Scores every team by effective skills and sorts best-first.
///
/// Ordering: score desc, matched desc, team name asc, team id asc.
pub fn rank_teams(
    teams: &[Team],
    people: &[Person],
    person_skills: &[PersonSkill],
    required_skill_ids: &[SkillId],
) -> Vec<CompatibilityScore> {
    let mut scores: Vec<CompatibilityScore> = teams
        .iter()
        .map(|team| {
            let skills = effective_team_skills(team, people, person_skills);
            score_skill_set(team, &skills, required_skill_ids)
        })
        .collect();
    scores.sort_by(compare_scores);
    scores
}

fn compare_scores(a: &CompatibilityScore, b: &CompatibilityScore) -> Ordering {
    b.compatibility_score
        .partial_cmp(&a.compatibility_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.skills_matched.cmp(&a.skills_matched))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then_with(|| a.team_id.cmp(&b.team_id))
}
