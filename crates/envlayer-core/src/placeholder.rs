//! `{key}` placeholder substitution
//!
//! Substitution is a single left-to-right scan of the original string.
//! Text inserted for a placeholder is never scanned again, so mutually
//! referencing values cannot loop.

use std::collections::BTreeMap;

/// Replace every `{key}` token in `value` whose key is in `table`.
///
/// Keys may themselves contain braces; when several keys match at the same
/// position the longest one wins. Keys whose table value is equal to
/// `value` itself are skipped, so a value never substitutes into itself.
/// Tokens naming unknown keys and unbalanced braces are copied through
/// literally.
pub fn substitute(value: &str, table: &BTreeMap<String, String>) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let replacement = table
            .iter()
            .filter(|(key, replacement)| {
                replacement.as_str() != value
                    && after_open
                        .strip_prefix(key.as_str())
                        .is_some_and(|tail| tail.starts_with('}'))
            })
            .max_by_key(|(key, _)| key.len());

        match replacement {
            Some((key, replacement)) => {
                result.push_str(replacement);
                rest = &after_open[key.len() + 1..];
            }
            None => {
                // Not a known placeholder; keep the brace and rescan after it
                result.push('{');
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}
