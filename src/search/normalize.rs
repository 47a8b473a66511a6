//! Text normalization for matching Korean disease names.
//!
//! Indexed names and queries share one pipeline: remove whitespace, strip one trailing
//! condition suffix `증`, lower-case. Queries additionally go through [QUERY_REWRITES]
//! first, so that the verbose clinical phrasing a user types still finds the short form
//! the master uses, e.g. `척추관협착증` finds `척추협착`.

/// Ordered `(pattern, replacement)` rules applied to queries only. Every occurrence
/// of a pattern is replaced before the next rule runs.
pub const QUERY_REWRITES: &[(&str, &str)] = &[("척추관", "척추"), ("관협착", "협착")];

/// Nominalizing suffix that ends many disease names ("-osis", "-itis").
const CONDITION_SUFFIX: char = '증';

/// Normalize a record's Korean name for substring matching.
pub fn normalize_indexed_name(name: &str) -> String {
    finish(remove_whitespace(name))
}

/// Normalize an incoming search string. Unlike [normalize_indexed_name] this applies
/// [QUERY_REWRITES].
pub fn normalize_query(query: &str) -> String {
    let rewritten = QUERY_REWRITES
        .iter()
        .fold(remove_whitespace(query), |s, &(pattern, replacement)| {
            s.replace(pattern, replacement)
        });

    finish(rewritten)
}

/// The form codes are matched in: no whitespace, upper case.
pub fn normalize_code(code: &str) -> String {
    remove_whitespace(code).to_uppercase()
}

pub(crate) fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn finish(mut s: String) -> String {
    if s.ends_with(CONDITION_SUFFIX) {
        s.pop();
    }
    s.to_lowercase()
}
