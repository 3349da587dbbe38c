//! Rule matching logic.
//!
//! # Responsibilities
//! - Evaluate every rule against a request in catalog order
//! - Build the candidate strings a pattern is tested against
//! - Enforce the per-rule locale filter
//!
//! # Design Decisions
//! - First match wins; catalog order is the tie-break policy
//! - Four candidates (path, path?query, locale-prefixed variants) so the
//!   routing layer does not have to pre-normalize locale prefixes or
//!   query strings
//! - Locale filter is case-insensitive, checked before compiling

use crate::engine::pattern;
use crate::engine::rule::{RedirectRule, ResolvedRequest};

/// Return the first rule whose pattern matches the request, if any.
pub fn find_match<'a>(
    rules: &'a [RedirectRule],
    req: &ResolvedRequest,
) -> Option<&'a RedirectRule> {
    rules.iter().find(|rule| rule_matches(rule, req))
}

fn rule_matches(rule: &RedirectRule, req: &ResolvedRequest) -> bool {
    if let Some(rule_locale) = &rule.locale {
        if !rule_locale.eq_ignore_ascii_case(&req.locale) {
            return false;
        }
    }

    let Some(re) = pattern::compile(&rule.pattern, &req.locale) else {
        return false;
    };

    candidates(req).iter().any(|candidate| re.is_match(candidate))
}

/// The forms of the request URL a pattern may be authored against.
///
/// Requests arrive with or without a locale prefix and with or without a
/// query string depending on how the routing layer normalized them.
fn candidates(req: &ResolvedRequest) -> [String; 4] {
    let path_query = req.path_with_query();
    [
        req.path.clone(),
        path_query.clone(),
        format!("/{}{}", req.locale, req.path),
        format!("/{}{}", req.locale, path_query),
    ]
}
