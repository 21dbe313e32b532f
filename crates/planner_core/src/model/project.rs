//! Project, milestone and epic records.
//!
//! # Invariants
//! - `end_date` should not be earlier than `start_date`.
//! - `budget`, when set, is a finite non-negative amount.

use super::{
    new_id, require_date_range, require_id, require_name, require_optional_amount, Identified,
    ModelValidationError, ProjectId, TeamId, Validate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// Returns whether the project no longer consumes schedule.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    AtRisk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: MilestoneStatus,
}

impl Milestone {
    pub fn new(name: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            due_date,
            status: MilestoneStatus::NotStarted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub budget: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Project {
    /// Creates a planning-state project with a generated id.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::with_id(new_id(), name, start_date, end_date)
    }

    /// Creates a project with a caller-provided id (import paths, fixtures).
    pub fn with_id(
        id: impl Into<ProjectId>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: ProjectStatus::Planning,
            budget: None,
            start_date,
            end_date,
            milestones: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpicStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Unit of project work that allocations can point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    pub id: String,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub status: EpicStatus,
    #[serde(default)]
    pub estimated_effort: Option<f64>,
    #[serde(default)]
    pub assigned_team_id: Option<TeamId>,
}

impl Identified for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Epic {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Project {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("project", &self.id)?;
        require_name("project", &self.id, &self.name)?;
        require_date_range("project", &self.id, self.start_date, self.end_date)?;
        require_optional_amount("project", &self.id, "budget", self.budget)?;
        for milestone in &self.milestones {
            require_id("milestone", &milestone.id)?;
            require_name("milestone", &milestone.id, &milestone.name)?;
        }
        Ok(())
    }
}

impl Validate for Epic {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("epic", &self.id)?;
        require_id("project", &self.project_id)?;
        require_name("epic", &self.id, &self.name)?;
        require_optional_amount("epic", &self.id, "estimated_effort", self.estimated_effort)
    }
}
