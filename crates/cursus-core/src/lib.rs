//! # cursus-core
//!
//! Coverage-ordering and cancellation-impact engine for Cursus.
//!
//! Every operation here is a pure function over an immutable [`TermSnapshot`]
//! supplied by the caller. Nothing is persisted, cached or logged; findings
//! are returned as values so a plan with violations is still fully reportable.
//!
//! - Value types for sessions, skills, coverage events and GAIE entries
//! - Temporal ordering policy shared by every check
//! - Ordering validator and plan hygiene checks
//! - Coverage health summary
//! - Cancellation simulation, redistribution validation, scenario comparison
//! - Move impact analysis
//! - Term validation report and coverage matrix assembly
//!
//! [`TermSnapshot`]: entities::TermSnapshot

pub mod entities;
pub mod enums;
pub mod errors;
pub mod health;
pub mod ids;
pub mod issues;
pub mod matrix;
pub mod moves;
pub mod ordering;
pub mod report;
pub mod rules;
pub mod whatif;
