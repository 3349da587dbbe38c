//! Target rewriting for a matched rule.
//!
//! # Responsibilities
//! - Substitute the locale placeholder token in the target template
//! - Detect and strip an explicit region override in the target
//! - Apply the compiled pattern as a substitution regex (capture groups)
//! - Merge target query parameters with the preserved original ones
//!
//! # Design Decisions
//! - Absolute targets short-circuit all path algebra
//! - The original query rides inside the substitution source; its
//!   parameters and the template's coexist in the output, duplicates
//!   allowed
//! - The assembled URL is percent-decoded exactly once so encoded rule
//!   targets never come out double-encoded

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::form_urlencoded;

use crate::engine::pattern;
use crate::engine::rule::{RedirectRule, ResolvedRequest};

/// Optional scheme followed by `//`.
static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*:)?//").expect("absolute URL pattern is valid")
});

/// Site-level inputs the rewriter needs besides the rule and the request.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    /// Language the site resolved for this request, substituted for the
    /// locale placeholder token.
    pub language: &'a str,
    /// Region codes a target's first segment may legitimately override
    /// the locale with. Anything else stays a literal path segment.
    pub regions: &'a [String],
    /// Placeholder token as authored in targets, e.g. `{lang}`.
    pub locale_token: &'a str,
}

/// Result of rewriting a matched rule's target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenTarget {
    pub url: String,
    /// Locale the target explicitly switched to, when its first segment
    /// was a recognized region code.
    pub locale: Option<String>,
}

impl RewrittenTarget {
    pub fn locale_changed(&self) -> bool {
        self.locale.is_some()
    }
}

/// Rewrite `rule.target` for the given request.
///
/// Operates on clones throughout; the caller's rule catalog is never
/// touched.
pub fn rewrite(rule: &RedirectRule, req: &ResolvedRequest, ctx: &RewriteContext<'_>) -> RewrittenTarget {
    let mut target = rule.target.clone();

    // Locale placeholder, unless the target is an absolute URL that
    // already points at the host we are serving.
    if target.contains(ctx.locale_token)
        && !(ABSOLUTE_URL.is_match(&target) && target.contains(&req.hostname))
    {
        target = target.replace(ctx.locale_token, ctx.language);
    }

    // Absolute targets are taken verbatim; no path algebra.
    if ABSOLUTE_URL.is_match(&target) {
        return RewrittenTarget {
            url: decode_once(&target),
            locale: None,
        };
    }

    // Working source for the substitution; the query is dropped up front
    // when the rule does not preserve it.
    let source = if rule.preserve_query_string {
        req.path_with_query()
    } else {
        req.path.clone()
    };
    let preserved: Vec<(String, String)> = if rule.preserve_query_string {
        parse_query(&req.query)
    } else {
        Vec::new()
    };

    // An explicit region override in the target's first segment switches
    // the output locale and is removed before substitution.
    let mut locale_override = None;
    if let Some(first) = first_segment(&target) {
        if ctx.regions.iter().any(|r| r.eq_ignore_ascii_case(first)) {
            let first = first.to_string();
            target = target.replacen(&format!("/{}", first), "", 1);
            locale_override = Some(first);
        }
    }

    // Capture-group interpolation from matched pattern to target template.
    let substituted = match pattern::compile(&rule.pattern, &req.locale) {
        Some(re) => re.replace(&source, target.as_str()).into_owned(),
        None => source,
    };

    // An emptied first segment leaves a `//` artifact.
    let substituted = if substituted.starts_with("//") {
        substituted.replacen("//", "/", 1)
    } else {
        substituted
    };

    let (path_part, query_part) = match substituted.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (substituted, String::new()),
    };

    let mut params = preserved;
    params.extend(parse_query(&query_part));

    let url = if params.is_empty() {
        path_part
    } else {
        let encoded: String = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&params)
            .finish();
        format!("{}?{}", path_part, encoded)
    };

    RewrittenTarget {
        url: decode_once(&url),
        locale: locale_override,
    }
}

/// First path segment of a relative target, without its slashes.
fn first_segment(target: &str) -> Option<&str> {
    let rest = target.strip_prefix('/')?;
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    if end == 0 {
        None
    } else {
        Some(&rest[..end])
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    if query.is_empty() {
        return Vec::new();
    }
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Single decode pass over the assembled URL; rules may encode their
/// target paths and the output must not be double-encoded.
fn decode_once(url: &str) -> String {
    percent_decode_str(url).decode_utf8_lossy().into_owned()
}
