//! Regex matching for generated `(pattern)` checks.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;
use regex::Regex;

/// Compiled patterns keyed by their source. Sources come from generated code,
/// so the set is bounded by the number of pattern constraints in the program.
static CACHE: LazyLock<RwLock<HashMap<String, Option<Regex>>>> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// Check `value` against the regex `source`.
///
/// `source` already encodes full or partial matching and the modifier flags.
/// A source that fails to compile never matches.
pub fn matches(source: &str, value: &str) -> bool {
    if let Some(compiled) = CACHE.read().get(source) {
        return compiled.as_ref().is_some_and(|regex| regex.is_match(value));
    }
    let compiled = match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::error!(pattern = source, error = %err, "invalid pattern in generated validation code");
            None
        }
    };
    let is_match = compiled.as_ref().is_some_and(|regex| regex.is_match(value));
    CACHE.write().entry(source.to_string()).or_insert(compiled);
    is_match
}
