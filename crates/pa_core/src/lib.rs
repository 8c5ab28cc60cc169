//! pa_core — Canonical report model, domain enums, and display numerics.
//!
//! This crate is **I/O-free**. It defines the stable types/APIs used across
//! the engine (`pa_extract`, `pa_metrics`, `pa_report`, `pa_pipeline`,
//! `pa_cli`):
//!
//! - Closed domain enums: `Severity`, `DataQualityTier`, `ActionType`,
//!   `ScenarioKind`, `StructuralVerdict`
//! - The normalized `CanonicalReport` and its sub-models
//! - Percent normalization for fraction/points-ambiguous inputs
//! - Currency and signed-percent display formatting
//!
//! Everything here is total over its inputs: label parsers fall back to a
//! documented default instead of erroring, because a report with partial data
//! must still render a consistent document.
//!
//! Model types derive `Serialize`/`Deserialize` so callers can embed the
//! normalized report in their own artifacts.

#![deny(unsafe_code)]

pub mod format;
pub mod model;
pub mod percent;

pub use model::CanonicalReport;
pub use percent::normalize_percent;
