//! Variable substitution over `${name}` placeholders.
//!
//! Two granularities:
//! - whole-value substitution: a string node that is exactly one placeholder
//!   is replaced by the named local variable's tree value, which lets a path
//!   jump into a shared sub-tree;
//! - embedded substitution: every placeholder occurrence inside a string is
//!   replaced by the text form of its variable, local scope first, then
//!   global. Names matching neither scope stay literal.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::coerce;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern"))
}

fn whole_placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\$\{([^}]+)\}$").expect("placeholder pattern"))
}

/// If `value` is a string that is exactly one placeholder naming a local
/// variable, return that variable's tree value.
pub fn resolve_placeholder<'a>(
    value: &Value,
    locals: &'a HashMap<String, Value>,
) -> Option<&'a Value> {
    let text = value.as_str()?;
    let captures = whole_placeholder_re().captures(text)?;
    locals.get(&captures[1])
}

/// Replace every `${name}` occurrence in `text`, left to right, by the text
/// form of the named variable. Single pass: substituted values are not
/// rescanned.
pub fn substitute(
    text: &str,
    locals: &HashMap<String, Value>,
    globals: Option<&HashMap<String, Value>>,
) -> String {
    placeholder_re()
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let name = &captures[1];
            locals
                .get(name)
                .or_else(|| globals.and_then(|g| g.get(name)))
                .map(replacement_text)
                .unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

fn replacement_text(value: &Value) -> String {
    coerce::to_text(value).unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_resolve_placeholder_to_tree_value() {
        let locals = scope(&[("person", json!({"id": 15}))]);

        let resolved = resolve_placeholder(&json!("${person}"), &locals);
        assert_eq!(resolved, Some(&json!({"id": 15})));
    }

    #[test]
    fn test_resolve_placeholder_requires_exact_match() {
        let locals = scope(&[("person", json!({"id": 15}))]);

        assert_eq!(resolve_placeholder(&json!("x${person}"), &locals), None);
        assert_eq!(resolve_placeholder(&json!("${unknown}"), &locals), None);
        assert_eq!(resolve_placeholder(&json!(10), &locals), None);
    }

    #[test]
    fn test_substitute_multiple_placeholders() {
        let locals = scope(&[("v1", json!("v1")), ("v2", json!("v2")), ("v3", json!("v3"))]);

        let out = substitute(
            "first var is ${v1}, second is ${v2}, then third is ${v3}",
            &locals,
            None,
        );
        assert_eq!(out, "first var is v1, second is v2, then third is v3");
    }

    #[test]
    fn test_substitute_unknown_name_stays_literal() {
        let locals = scope(&[("known", json!("yes"))]);

        let out = substitute("I'm here${change-me}", &locals, None);
        assert_eq!(out, "I'm here${change-me}");
    }

    #[test]
    fn test_substitute_local_shadows_global() {
        let locals = scope(&[("x", json!("local"))]);
        let globals = scope(&[("x", json!("global")), ("y", json!("g-only"))]);

        let out = substitute("${x}/${y}", &locals, Some(&globals));
        assert_eq!(out, "local/g-only");
    }

    #[test]
    fn test_substitute_is_single_pass() {
        let locals = scope(&[("a", json!("${b}")), ("b", json!("deep"))]);

        let out = substitute("${a}", &locals, None);
        assert_eq!(out, "${b}");
    }

    #[test]
    fn test_substitute_non_string_variable() {
        let locals = scope(&[("port", json!(8080))]);

        let out = substitute("http://host:${port}", &locals, None);
        assert_eq!(out, "http://host:8080");
    }
}
