//! Planning domain model.
//!
//! # Responsibility
//! - Define the canonical records shared by analysis, storage and service code.
//! - Provide storage-time validation through [`Validate`].
//!
//! # Invariants
//! - Every record is identified by a stable string id.
//! - Analysis code never validates records; it tolerates dangling references.
//! - Repository writes call [`Validate::validate`] before persistence.

pub mod cycle;
pub mod project;
pub mod skill;
pub mod team;

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type SkillId = String;
pub type SolutionId = String;
pub type ProjectId = String;
pub type TeamId = String;
pub type PersonId = String;
pub type CycleId = String;

/// Generates a fresh stable id for newly created records.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Records addressable by a stable id inside a collection.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Storage-time invariant check.
pub trait Validate {
    fn validate(&self) -> Result<(), ModelValidationError>;
}

/// Replaces the record with the same id, or appends it when absent.
///
/// Returns `true` when an existing record was replaced.
pub fn upsert_by_id<T: Identified>(items: &mut Vec<T>, item: T) -> bool {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(index) => {
            items[index] = item;
            true
        }
        None => {
            items.push(item);
            false
        }
    }
}

/// Validation error for planning records.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    EmptyId {
        entity: &'static str,
    },
    EmptyName {
        entity: &'static str,
        id: String,
    },
    InvalidDateRange {
        entity: &'static str,
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    InvalidAmount {
        entity: &'static str,
        id: String,
        field: &'static str,
        value: f64,
    },
    InvalidIterationNumber {
        id: String,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId { entity } => write!(f, "{entity} id cannot be empty"),
            Self::EmptyName { entity, id } => write!(f, "{entity} `{id}` name cannot be empty"),
            Self::InvalidDateRange {
                entity,
                id,
                start,
                end,
            } => write!(
                f,
                "{entity} `{id}` end date ({end}) must be >= start date ({start})"
            ),
            Self::InvalidAmount {
                entity,
                id,
                field,
                value,
            } => write!(
                f,
                "{entity} `{id}` field `{field}` must be a finite non-negative number, got {value}"
            ),
            Self::InvalidIterationNumber { id } => {
                write!(f, "allocation `{id}` iteration number must be >= 1")
            }
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_id(entity: &'static str, id: &str) -> Result<(), ModelValidationError> {
    if id.trim().is_empty() {
        return Err(ModelValidationError::EmptyId { entity });
    }
    Ok(())
}

pub(crate) fn require_name(
    entity: &'static str,
    id: &str,
    name: &str,
) -> Result<(), ModelValidationError> {
    if name.trim().is_empty() {
        return Err(ModelValidationError::EmptyName {
            entity,
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_date_range(
    entity: &'static str,
    id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ModelValidationError> {
    if end < start {
        return Err(ModelValidationError::InvalidDateRange {
            entity,
            id: id.to_string(),
            start,
            end,
        });
    }
    Ok(())
}

pub(crate) fn require_amount(
    entity: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ModelValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelValidationError::InvalidAmount {
            entity,
            id: id.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

pub(crate) fn require_optional_amount(
    entity: &'static str,
    id: &str,
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ModelValidationError> {
    match value {
        Some(value) => require_amount(entity, id, field, value),
        None => Ok(()),
    }
}
