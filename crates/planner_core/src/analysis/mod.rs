//! Pure planning analyses.
//!
//! # Responsibility
//! - Derive project skill requirements and score team compatibility.
//! - Assess project feasibility and summarise scenarios.
//! - Aggregate allocations over the team x iteration grid.
//!
//! # Invariants
//! - Every function is synchronous and side-effect free apart from debug logs.
//! - Missing references degrade to empty/zero results, never errors.

pub mod allocation;
pub mod compatibility;
pub mod feasibility;
pub mod scenario;
pub mod skills;
