//! Fuzz target for the coverage-gap system group denylist.
//!
//! Goal: Building the glob set and filtering groups should **never panic**.
//! Invalid patterns may return errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_system_groups
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct GroupInput {
    /// Denylist globs (e.g., "Service-*", "*BreakGlass*")
    patterns: Vec<String>,
    /// Directory group names
    groups: Vec<String>,
}

fuzz_target!(|input: GroupInput| {
    // Limit input size to avoid OOM and keep fuzzing fast
    if input.patterns.len() > 20 || input.groups.len() > 100 {
        return;
    }

    let patterns: Vec<String> = input
        .patterns
        .into_iter()
        .filter(|p| p.len() <= 256)
        .collect();
    let groups: Vec<String> = input.groups.into_iter().filter(|g| g.len() <= 512).collect();

    let _ = caguard_repo::fuzz::filter_system_groups(&patterns, &groups);
});
