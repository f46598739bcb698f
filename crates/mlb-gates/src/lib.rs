//! MLB Gates - report readiness
//!
//! Pass/fail predicates over a workspace's domain state. Gates are derived
//! on demand and never stored, so they cannot drift from the action log.
//!
//! - Required gates decide whether a report may be generated
//! - Advisory gates feed suggestions but never block
//! - Per-activity-stage readiness for gated completion
//!
//! # Example
//!
//! ```rust,ignore
//! use mlb_gates::{validate, GateThresholds};
//!
//! let report = validate(workspace.state(), &catalog, &GateThresholds::default());
//! if !report.can_generate_report {
//!     for missing in &report.missing_requirements {
//!         println!("- {missing}");
//!     }
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod checks;
pub mod gate;
pub mod report;
pub mod thresholds;

pub use gate::{Gate, GateId, ValidationReport};
pub use report::{evaluate, stage_readiness, try_complete_activity_stage, validate, GateError};
pub use thresholds::{GateThresholds, ThresholdError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
