//! Fault-scoring and prediction-fusion engine for automotive electrical
//! diagnostics.
//!
//! The [`diagnostics`] module carries the engine itself; [`config`],
//! [`telemetry`], and [`error`] carry the service scaffolding shared with
//! the API binary.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod telemetry;
