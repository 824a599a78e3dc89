//! Environment-specific key selection for materialized maps.
//!
//! A document may carry several variants of one key, tagged with an
//! environment suffix: `"url@dev"`, `"url@prod"`, plus an optional bare
//! `"url"` fallback. Given the configured environment list, the variant for
//! the highest-priority environment (earliest in the list) replaces the bare
//! key; variants for environments outside the list are dropped.

use std::collections::HashMap;

/// Rewrite environment-tagged keys in `map` against `environments`.
///
/// Priority is list order: `["dev", "staging"]` prefers `key@dev` over
/// `key@staging`, and either over the bare `key`.
pub fn rewrite_env_keys<T>(map: HashMap<String, T>, environments: &[String]) -> HashMap<String, T> {
    if environments.is_empty() {
        return map;
    }

    let mut rewritten: HashMap<String, T> = HashMap::new();
    // base key -> priority of the entry currently occupying it; bare keys
    // rank below every listed environment
    let mut priorities: HashMap<String, usize> = HashMap::new();
    let bare_priority = environments.len();

    for (key, value) in map {
        let (base, priority) = match key.rsplit_once('@') {
            Some((base, env)) => {
                match environments.iter().position(|e| e == env) {
                    Some(pos) => (base.to_string(), pos),
                    None => continue,
                }
            }
            None => (key, bare_priority),
        };

        match priorities.get(&base) {
            Some(&held) if held <= priority => {}
            _ => {
                priorities.insert(base.clone(), priority);
                rewritten.insert(base, value);
            }
        }
    }

    rewritten
}
