//! Fuzz target for policy document parsing.
//!
//! Goal: The parser should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = caguard_repo::fuzz::parse_policy_yaml(text);
        let _ = caguard_repo::fuzz::parse_policy_json(text);
    }
});
