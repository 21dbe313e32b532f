//! Skill registry, solution catalog and project skill links.
//!
//! # Responsibility
//! - Define skills, reusable solution templates and their project links.
//! - Carry structured provenance for every project skill.
//!
//! # Invariants
//! - `ProjectSkill::source` is the source of truth for provenance; `notes`
//!   is display text only.
//! - `Solution::skill_ids` defaults to empty when absent in stored data.

use super::{
    new_id, require_id, require_name, Identified, ModelValidationError, ProjectId, SkillId,
    SolutionId, Validate,
};
use serde::{Deserialize, Serialize};

/// Registered skill (reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub category: String,
}

impl Skill {
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Reusable template of required skills attachable to projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: SolutionId,
    pub name: String,
    pub category: String,
    /// Ordered; derivation emits skills in this order.
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
}

impl Solution {
    pub fn new(
        id: impl Into<SolutionId>,
        name: impl Into<String>,
        category: impl Into<String>,
        skill_ids: Vec<SkillId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            skill_ids,
        }
    }
}

/// Priority of a required skill or solution for a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Where a project skill requirement came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkillSource {
    /// Entered directly on the project.
    #[default]
    Manual,
    /// Inherited from a linked solution template.
    Solution { solution_id: SolutionId },
}

impl SkillSource {
    /// Returns the originating solution id for solution-derived skills.
    pub fn solution_id(&self) -> Option<&str> {
        match self {
            Self::Manual => None,
            Self::Solution { solution_id } => Some(solution_id.as_str()),
        }
    }
}

/// Skill requirement attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSkill {
    pub id: String,
    pub project_id: ProjectId,
    pub skill_id: SkillId,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub source: SkillSource,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProjectSkill {
    /// Creates a manually entered skill requirement.
    pub fn manual(
        project_id: impl Into<ProjectId>,
        skill_id: impl Into<SkillId>,
        importance: Importance,
    ) -> Self {
        Self {
            id: new_id(),
            project_id: project_id.into(),
            skill_id: skill_id.into(),
            importance,
            source: SkillSource::Manual,
            notes: None,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.source != SkillSource::Manual
    }
}

/// Link between a project and a solution template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSolution {
    pub id: String,
    pub project_id: ProjectId,
    pub solution_id: SolutionId,
    #[serde(default)]
    pub importance: Importance,
}

impl ProjectSolution {
    pub fn new(
        project_id: impl Into<ProjectId>,
        solution_id: impl Into<SolutionId>,
        importance: Importance,
    ) -> Self {
        Self {
            id: new_id(),
            project_id: project_id.into(),
            solution_id: solution_id.into(),
            importance,
        }
    }
}

impl Identified for Skill {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Solution {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for ProjectSkill {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for ProjectSolution {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Skill {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("skill", &self.id)?;
        require_name("skill", &self.id, &self.name)
    }
}

impl Validate for Solution {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("solution", &self.id)?;
        require_name("solution", &self.id, &self.name)
    }
}

impl Validate for ProjectSkill {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("project_skill", &self.id)?;
        require_id("project", &self.project_id)
    }
}

impl Validate for ProjectSolution {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("project_solution", &self.id)?;
        require_id("project", &self.project_id)?;
        require_id("solution", &self.solution_id)
    }
}
