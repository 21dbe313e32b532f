//! Project skill derivation.
//!
//! # Responsibility
//! - Combine manual project skills with skills inherited from linked solutions.
//! - Produce the deduplicated requirement list consumed by the scorer.
//!
//! # Invariants
//! - A skill id appears at most once in the derived list; the first linked
//!   solution that declares it owns the provenance.
//! - Solution-derived entries come first (link order, then solution order),
//!   followed by manual entries that fill gaps, in their original order.
//! - Missing solutions and unknown skill ids never produce errors.

use crate::model::project::Project;
use crate::model::skill::{ProjectSkill, ProjectSolution, Skill, SkillSource, Solution};
use crate::model::SkillId;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static REQUIRED_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Required by\s+(.+?)\s*$").expect("valid provenance regex"));

/// Display text attached to solution-derived skills.
pub fn required_by_note(solution_name: &str) -> String {
    format!("Required by {solution_name}")
}

/// Derives the full skill requirement list of one project.
///
/// Links and manual skills belonging to other projects are ignored. Empty or
/// unregistered skill ids are passed through as-is; `skills` is only used to
/// report how many of them were seen.
///
/// Manual entries are deduplicated among themselves too: a repeated manual
/// skill id keeps only its first entry.
pub fn derive_required_skills(
    project: &Project,
    manual_skills: &[ProjectSkill],
    solutions: &[Solution],
    skills: &[Skill],
    project_solution_links: &[ProjectSolution],
) -> Vec<ProjectSkill> {
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut derived = Vec::new();
    let mut missing_solutions = 0usize;

    for link in project_solution_links
        .iter()
        .filter(|link| link.project_id == project.id)
    {
        let Some(solution) = solutions
            .iter()
            .find(|solution| solution.id == link.solution_id)
        else {
            missing_solutions += 1;
            continue;
        };

        for skill_id in &solution.skill_ids {
            if !emitted.insert(skill_id.as_str()) {
                continue;
            }
            derived.push(ProjectSkill {
                id: format!("{}:{}:{}", project.id, solution.id, skill_id),
                project_id: project.id.clone(),
                skill_id: skill_id.clone(),
                importance: link.importance,
                source: SkillSource::Solution {
                    solution_id: solution.id.clone(),
                },
                notes: Some(required_by_note(&solution.name)),
            });
        }
    }

    let from_solutions = derived.len();
    for manual in manual_skills
        .iter()
        .filter(|manual| manual.project_id == project.id)
    {
        if emitted.insert(manual.skill_id.as_str()) {
            derived.push(manual.clone());
        }
    }

    let unknown_skill_ids = derived
        .iter()
        .filter(|entry| !skills.iter().any(|skill| skill.id == entry.skill_id))
        .count();

    debug!(
        "event=derive_skills module=analysis status=ok project_id={} from_solutions={} manual={} missing_solutions={} unknown_skill_ids={}",
        project.id,
        from_solutions,
        derived.len() - from_solutions,
        missing_solutions,
        unknown_skill_ids
    );

    derived
}

/// Returns the deduplicated, non-empty skill ids of a derived list.
///
/// This is the canonical input for compatibility scoring.
pub fn required_skill_ids(derived: &[ProjectSkill]) -> Vec<SkillId> {
    let mut seen = HashSet::new();
    derived
        .iter()
        .map(|entry| entry.skill_id.trim())
        .filter(|skill_id| !skill_id.is_empty())
        .filter(|skill_id| seen.insert(*skill_id))
        .map(str::to_string)
        .collect()
}

/// Recovers structured provenance from legacy free-text notes.
///
/// Older records only carried `"Required by <solution name>"`. The name is
/// matched exactly against the catalog; anything else is treated as manual.
pub fn infer_legacy_source(notes: Option<&str>, solutions: &[Solution]) -> SkillSource {
    let Some(captures) = notes.and_then(|value| REQUIRED_BY_RE.captures(value)) else {
        return SkillSource::Manual;
    };
    let Some(name) = captures.get(1).map(|m| m.as_str()) else {
        return SkillSource::Manual;
    };

    solutions
        .iter()
        .find(|solution| solution.name == name)
        .map_or(SkillSource::Manual, |solution| SkillSource::Solution {
            solution_id: solution.id.clone(),
        })
}
