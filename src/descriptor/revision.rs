// src/descriptor/revision.rs

//! Revision constraint matching.
//!
//! A constraint such as `1.+` or `2.0.1` is a regular expression that must
//! match the whole target revision. Constraints are not translated from Ivy
//! range syntax, so `1.0.+` means "`1`, any char, `0`, then one or more of
//! any char" and not "prefix `1.0.`".
//!
//! A target whose own revision contains `latest` (e.g. `latest.integration`)
//! satisfies every constraint.
//!
//! Constraints use the `regex` crate syntax. Lookaround and backreferences
//! are not supported there, so such a constraint fails to compile and never
//! matches.

use regex::Regex;
use tracing::warn;

/// Marker that makes a target revision match unconditionally.
pub const LATEST_MARKER: &str = "latest";

/// Returns true if `actual_revision` satisfies `constraint`.
pub fn matches(actual_revision: &str, constraint: &str) -> bool {
    if actual_revision.contains(LATEST_MARKER) {
        return true;
    }

    match full_match_regex(constraint) {
        Ok(re) => re.is_match(actual_revision),
        Err(err) => {
            warn!(constraint = %constraint, error = %err, "invalid revision constraint, treating as no match");
            false
        }
    }
}

/// Compile `constraint` so that it only matches complete strings.
///
/// The bare pattern is compiled first so that input which only becomes
/// valid once wrapped (e.g. `a)(b`) is still rejected.
fn full_match_regex(constraint: &str) -> Result<Regex, regex::Error> {
    Regex::new(constraint)?;
    Regex::new(&format!("^(?:{constraint})$"))
}
