//! Dependency-graph queries over a project's tasks.
//!
//! ## Submodules
//!
//! - [`blocking`] — the materialized [`blocking::TaskGraph`]: blocked/ready
//!   computation, dependent closure, and the deletion guard.
//! - [`cycles`] — DFS-coloring cycle detection run before every dependency
//!   assignment.

pub mod blocking;
pub mod cycles;
