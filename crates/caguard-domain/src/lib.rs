//! Pure policy evaluation (no IO).
//!
//! Input: parsed policies and resolved rule sets, constructed elsewhere.
//! Output: naming errors, compliance violations, best-practice recommendations,
//! conflicts, and a blocking flag.

#![forbid(unsafe_code)]

pub mod compliance;
pub mod conflicts;
pub mod model;
pub mod naming;
pub mod plan;
pub mod policy;
pub mod practices;
pub mod rules;
pub mod scope;

mod engine;
mod fingerprint;

pub use engine::run_checks;
pub use fingerprint::fingerprint_for_policy;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod property_tests;
