//! Error fingerprinting: xxh3 over the normalized message, the
//! category, and the salient context keys (`type`, `component`).
//!
//! Normalization lowercases the message and collapses digit runs so
//! "request 4012 failed" and "request 7 failed" group together.

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_64;

use vigil_core::models::{Category, Fingerprint};

/// Salient context keys that feed the fingerprint. Everything else in
/// the context is considered incidental detail.
const SALIENT_KEYS: [&str; 2] = ["type", "component"];

pub fn fingerprint(
    message: &str,
    category: Category,
    context: &FxHashMap<String, serde_json::Value>,
) -> Fingerprint {
    let mut input = normalize_message(message);
    input.push('|');
    input.push_str(category.as_str());
    for key in SALIENT_KEYS {
        input.push('|');
        if let Some(value) = context.get(key).and_then(|v| v.as_str()) {
            input.push_str(value);
        }
    }
    Fingerprint(xxh3_64(input.as_bytes()))
}

/// Lowercase, trim, and collapse every digit run to `#`.
fn normalize_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut in_digits = false;
    for ch in message.trim().chars() {
        if ch.is_ascii_digit() {
            if !in_digits {
                out.push('#');
                in_digits = true;
            }
        } else {
            in_digits = false;
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn ctx(pairs: &[(&str, &str)]) -> FxHashMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn identical_inputs_identical_fingerprints() {
        let c = ctx(&[("type", "resource_error")]);
        let a = fingerprint("fetch failed", Category::Network, &c);
        let b = fingerprint("fetch failed", Category::Network, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn category_separates_fingerprints() {
        let c = FxHashMap::default();
        let a = fingerprint("boom", Category::Network, &c);
        let b = fingerprint("boom", Category::Rendering, &c);
        assert_ne!(a, b);
    }

    #[test]
    fn digit_runs_collapse() {
        let c = FxHashMap::default();
        let a = fingerprint("request 4012 failed", Category::Network, &c);
        let b = fingerprint("request 7 failed", Category::Network, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        let c = FxHashMap::default();
        let a = fingerprint("  Canvas LOST  ", Category::Rendering, &c);
        let b = fingerprint("canvas lost", Category::Rendering, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn salient_context_separates_fingerprints() {
        let a = fingerprint("boom", Category::General, &ctx(&[("component", "hud")]));
        let b = fingerprint("boom", Category::General, &ctx(&[("component", "menu")]));
        assert_ne!(a, b);
    }

    #[test]
    fn incidental_context_ignored() {
        let a = fingerprint("boom", Category::General, &ctx(&[("url", "/a")]));
        let b = fingerprint("boom", Category::General, &ctx(&[("url", "/b")]));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn deterministic_for_any_message(msg in ".{0,200}") {
            let c = FxHashMap::default();
            let a = fingerprint(&msg, Category::General, &c);
            let b = fingerprint(&msg, Category::General, &c);
            prop_assert_eq!(a, b);
        }
    }
}
