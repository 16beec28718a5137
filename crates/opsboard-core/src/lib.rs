//! Core business logic for the opsboard event-management dashboard.
//!
//! The crate models the one workflow-heavy corner of the dashboard — project
//! task dependencies plus the PIC handover and LPJ (accountability report)
//! status machine — as plain in-memory state behind an explicit store
//! interface. Rendering and the generative-text integration live elsewhere
//! and only consume the data and errors produced here.
//!
//! # Conventions
//!
//! - **Errors**: domain enums per module (`thiserror`) mapping to a stable
//!   [`error::ErrorCode`]; `anyhow::Result` at config/boot boundaries.
//!   Guards run before mutation — an `Err` always means nothing changed.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`) at mutation
//!   and guard-rejection points.
//! - **Time**: callers pass `chrono` timestamps in; the core never reads the
//!   wall clock.

pub mod config;
pub mod error;
pub mod graph;
pub mod handover;
pub mod model;
pub mod store;
pub mod workflow;
