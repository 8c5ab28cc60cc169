//! pa_metrics — derived figures and section inclusion gates.
//!
//! Two concerns live here, both pure functions of already-resolved inputs:
//!
//! - `derive`    — aggregate figures the payload does not carry verbatim
//!   (total exposure, cumulative tax differential, succession-risk
//!   improvement, the probability-weighted scenario triple);
//! - `inclusion` — the presence/veto predicates that decide which optional
//!   document sections appear, and the via-negativa override.
//!
//! No randomness, no I/O, no external calls; every function is deterministic
//! and re-computable from the same inputs.

#![deny(unsafe_code)]

pub mod derive;
pub mod inclusion;

pub use inclusion::SectionSet;
