//! Teams, people, roles, divisions and financial settings.
//!
//! # Invariants
//! - `Team::target_skills` is a set; ordering carries no meaning.
//! - Money amounts are finite and non-negative when set.

use super::{
    require_amount, require_id, require_name, require_optional_amount, Identified,
    ModelValidationError, PersonId, SkillId, TeamId, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub division_id: Option<String>,
    /// Planned weekly capacity in hours.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub target_skills: BTreeSet<SkillId>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            division_id: None,
            capacity: 0,
            target_skills: BTreeSet::new(),
        }
    }

    /// Builder-style helper for declaring target skills.
    pub fn with_target_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillId>,
    {
        self.target_skills = skills.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    Permanent,
    Contractor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub annual_salary: Option<f64>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSkill {
    pub person_id: PersonId,
    pub skill_id: SkillId,
    #[serde(default)]
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_annual_salary: Option<f64>,
    #[serde(default)]
    pub default_hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
}

/// Yearly spending envelope for one division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionBudget {
    pub id: String,
    pub division_id: String,
    pub year: i32,
    pub amount: f64,
}

/// Organisation-wide cost conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialConfig {
    pub working_days_per_year: u32,
    pub working_hours_per_day: f64,
    pub currency: String,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            working_days_per_year: 260,
            working_hours_per_day: 8.0,
            currency: "USD".to_string(),
        }
    }
}

impl FinancialConfig {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.working_days_per_year == 0 {
            return Err(ModelValidationError::InvalidAmount {
                entity: "financial_config",
                id: "default".to_string(),
                field: "working_days_per_year",
                value: 0.0,
            });
        }
        require_amount(
            "financial_config",
            "default",
            "working_hours_per_day",
            self.working_hours_per_day,
        )?;
        if self.working_hours_per_day == 0.0 {
            return Err(ModelValidationError::InvalidAmount {
                entity: "financial_config",
                id: "default".to_string(),
                field: "working_hours_per_day",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Identified for Team {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Person {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Role {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Division {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for DivisionBudget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for Team {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("team", &self.id)?;
        require_name("team", &self.id, &self.name)
    }
}

impl Validate for Person {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("person", &self.id)?;
        require_name("person", &self.id, &self.name)?;
        require_optional_amount("person", &self.id, "annual_salary", self.annual_salary)?;
        require_optional_amount("person", &self.id, "hourly_rate", self.hourly_rate)
    }
}

impl Validate for PersonSkill {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("person", &self.person_id)?;
        require_id("skill", &self.skill_id)
    }
}

impl Validate for Role {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("role", &self.id)?;
        require_name("role", &self.id, &self.name)?;
        require_optional_amount(
            "role",
            &self.id,
            "default_annual_salary",
            self.default_annual_salary,
        )?;
        require_optional_amount(
            "role",
            &self.id,
            "default_hourly_rate",
            self.default_hourly_rate,
        )
    }
}

impl Validate for Division {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("division", &self.id)?;
        require_name("division", &self.id, &self.name)
    }
}

impl Validate for DivisionBudget {
    fn validate(&self) -> Result<(), ModelValidationError> {
        require_id("division_budget", &self.id)?;
        require_id("division", &self.division_id)?;
        require_amount("division_budget", &self.id, "amount", self.amount)
    }
}
