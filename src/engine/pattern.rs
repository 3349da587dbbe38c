//! Pattern compilation.
//!
//! # Responsibilities
//! - Turn a human-authored rule pattern into an executable regex
//! - Normalize anchors, slashes and stray escapes before compiling
//!
//! # Design Decisions
//! - All escaping/anchoring rules live here so they can be unit-tested
//!   independently of matching
//! - A pattern that fails to compile silently disqualifies its rule;
//!   compilation problems must never abort catalog evaluation
//! - The compiled form is `^/<cleaned>[/]?$`, case-insensitive, so the
//!   same rule matches both `/page` and `/page/`

use regex::{Regex, RegexBuilder};

/// Compile a rule pattern against the locale the request resolved to.
///
/// Returns `None` when the normalized pattern is not valid regex syntax;
/// the caller treats such a rule as non-matching.
pub fn compile(raw_pattern: &str, request_locale: &str) -> Option<Regex> {
    let cleaned = normalize(raw_pattern, request_locale);

    RegexBuilder::new(&format!("^/{}[/]?$", cleaned))
        .case_insensitive(true)
        .build()
        .map_err(|err| {
            tracing::debug!(pattern = raw_pattern, error = %err, "Pattern failed to compile, rule skipped");
            err
        })
        .ok()
}

/// Normalization pipeline applied before the anchors are re-added.
/// Each step operates on the output of the previous one; the order is
/// load-bearing.
fn normalize(raw_pattern: &str, request_locale: &str) -> String {
    // 1. Rules authored with a locale prefix must match locale-stripped paths.
    let pattern = strip_locale_prefix(raw_pattern, request_locale);

    // 2. One leading and one trailing slash.
    let pattern = pattern.strip_prefix('/').unwrap_or(&pattern);
    let pattern = pattern.strip_suffix('/').unwrap_or(pattern);

    // 3. Anchors possibly baked into the authored pattern; the compiler
    //    re-adds its own.
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    let pattern = pattern.strip_suffix('$').unwrap_or(pattern);

    // 4. A literal `?` must not read as a zero-or-one quantifier.
    let pattern = escape_question_marks(pattern);

    // 5. Malformed authored patterns occasionally carry a serialized
    //    trailing flag block.
    let pattern = pattern.strip_suffix("$/gi").unwrap_or(&pattern);

    pattern.to_string()
}

/// Remove a leading `/{locale}/` segment, case-insensitively, keeping the
/// leading slash for the later slash-stripping step.
fn strip_locale_prefix(pattern: &str, locale: &str) -> String {
    if locale.is_empty() {
        return pattern.to_string();
    }
    let prefix = format!("/{}/", locale);
    if pattern.len() >= prefix.len() && pattern[..prefix.len()].eq_ignore_ascii_case(&prefix) {
        format!("/{}", &pattern[prefix.len()..])
    } else {
        pattern.to_string()
    }
}

/// Escape every `?` that is not already preceded by a backslash.
fn escape_question_marks(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut prev = '\0';
    for ch in pattern.chars() {
        if ch == '?' && prev != '\\' {
            out.push('\\');
        }
        out.push(ch);
        prev = ch;
    }
    out
}
