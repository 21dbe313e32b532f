//! Planning cycles and team allocations.
//!
//! # Responsibility
//! - Define quarter/iteration cycles and per-iteration team allocations.
//!
//! # Invariants
//! - Iterations are child cycles of a quarter; their number is derived from
//!   ordering, never stored.
//! - `Allocation::percentage` is not capped here; aggregation flags cells
//!   above 100 instead of rejecting them.

use super::{
    new_id, require_amount, require_date_range, require_id, require_name, CycleId, Identified,
    ModelValidationError, TeamId, Validate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    Quarter,
    Iteration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: CycleId,
    pub name: String,
    pub kind: CycleKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub parent_cycle_id: Option<CycleId>,
}

/// Percentage of one team's capacity assigned to one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub team_id: TeamId,
    pub cycle_id: CycleId,
    pub iteration_number: u32,
    pub percentage: f64,
    #[serde(default)]
    pub epic_id: Option<String>,
    #[serde(default)]
    pub run_work_category_id: Option<String>,
}

impl Allocation {
    /// Creates an allocation not yet attached to an epic or run-work category.
    pub fn new(
        team_id: impl Into<TeamId>,
        cycle_id: impl Into<CycleId>,
        iteration_number: u32,
        percentage: f64,
    ) -> Self {
        Self {
            id: new_id(),
            team_id: team_id.into(),
            cycle_id: cycle_id.into(),
            iteration_number,
            percentage,
            epic_id: None,
            run_work_category_id: None,
        }
    }
}

/// Keep-the-lights-on work bucket (support, maintenance, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWorkCategory {
    pub id: String,
    pub name: String,
}

impl Identified for Cycle {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Allocation {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for RunWorkCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Cycle {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("cycle", &self.id)?;
        require_name("cycle", &self.id, &self.name)?;
        require_date_range("cycle", &self.id, self.start_date, self.end_date)
    }
}

impl Validate for Allocation {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("allocation", &self.id)?;
        require_id("team", &self.team_id)?;
        require_id("cycle", &self.cycle_id)?;
        if self.iteration_number == 0 {
            return Err(ModelValidationError::InvalidIterationNumber {
                id: self.id.clone(),
            });
        }
        require_amount("allocation", &self.id, "percentage", self.percentage)
    }
}

impl Validate for RunWorkCategory {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("run_work_category", &self.id)?;
        require_name("run_work_category", &self.id, &self.name)
    }
}
