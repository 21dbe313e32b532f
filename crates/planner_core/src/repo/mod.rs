//! Repository layer for planning collections.
//!
//! # Responsibility
//! - Define the persistence contract used by the planning service.
//! - Isolate SQLite and JSON payload details from analysis code.
//!
//! # Invariants
//! - Repository writes enforce `Validate::validate()` before persistence.
//! - Repository APIs return semantic errors (`InvalidData`) in addition to
//!   DB transport errors.

pub mod planning_repo;
