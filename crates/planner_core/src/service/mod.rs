//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and analyses into use-case level APIs.
//! - Keep callers decoupled from storage details.

pub mod planning_service;
