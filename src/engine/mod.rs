//! Redirect resolution engine.
//!
//! # Data Flow
//! ```text
//! (rule catalog, resolved request)
//!     → matcher.rs (compile patterns, test candidate strings)
//!     → rewrite.rs (locale token, region override, capture substitution,
//!                   query merge)
//!     → classify (rule kind → Redirect/Rewrite/Pass)
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no shared mutable state, safe to call
//!   concurrently against the same catalog snapshot
//! - Every failure mode (bad pattern, unknown kind, empty catalog)
//!   resolves to Pass; the engine never errors past its boundary
//! - The matched rule is cloned before any rewriting so the caller's
//!   catalog survives reuse across requests

pub mod matcher;
pub mod pattern;
pub mod rewrite;
pub mod rule;

use axum::http::StatusCode;

pub use self::rule::{RedirectKind, RedirectRule, ResolutionOutcome, ResolvedRequest};

use crate::config::RedirectsConfig;
use self::rewrite::RewriteContext;

/// Stateless resolution engine, parameterized only by redirect settings
/// (region codes, the locale placeholder token).
#[derive(Debug, Clone)]
pub struct RedirectEngine {
    regions: Vec<String>,
    locale_token: String,
}

impl RedirectEngine {
    pub fn new(config: &RedirectsConfig) -> Self {
        Self {
            regions: config.regions.clone(),
            locale_token: config.locale_token.clone(),
        }
    }

    /// Resolve one request against a rule catalog.
    ///
    /// `language` is the site's resolved language for this request, used
    /// for locale-token substitution in targets.
    pub fn resolve(
        &self,
        rules: &[RedirectRule],
        req: &ResolvedRequest,
        language: &str,
    ) -> ResolutionOutcome {
        let Some(matched) = matcher::find_match(rules, req) else {
            return ResolutionOutcome::Pass;
        };

        // Rewriting transforms pattern/target strings; work on a copy so
        // the shared catalog snapshot stays pristine.
        let matched = matched.clone();

        let ctx = RewriteContext {
            language,
            regions: &self.regions,
            locale_token: &self.locale_token,
        };
        let rewritten = rewrite::rewrite(&matched, req, &ctx);

        if rewritten.locale_changed() {
            tracing::debug!(
                locale = ?rewritten.locale,
                url = %rewritten.url,
                "Rule target switched locale"
            );
        }

        classify(matched.redirect_kind, rewritten.url)
    }
}

/// Map a rule's declared kind plus the rewritten target to the final
/// outcome. Exhaustive over the closed kind enum; `None` (which also
/// absorbs unrecognized kinds at deserialization) fails open.
fn classify(kind: RedirectKind, url: String) -> ResolutionOutcome {
    match kind {
        RedirectKind::Permanent => ResolutionOutcome::Redirect {
            url,
            status: StatusCode::MOVED_PERMANENTLY,
        },
        RedirectKind::Temporary => ResolutionOutcome::Redirect {
            url,
            status: StatusCode::FOUND,
        },
        RedirectKind::ServerTransfer => ResolutionOutcome::Rewrite { url },
        RedirectKind::None => ResolutionOutcome::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RedirectEngine {
        RedirectEngine::new(&RedirectsConfig::default())
    }

    fn request(path: &str) -> ResolvedRequest {
        ResolvedRequest {
            path: path.into(),
            query: String::new(),
            locale: "en".into(),
            hostname: "example.com".into(),
        }
    }

    fn rule(pattern: &str, target: &str, kind: RedirectKind) -> RedirectRule {
        RedirectRule {
            pattern: pattern.into(),
            target: target.into(),
            redirect_kind: kind,
            locale: None,
            preserve_query_string: false,
        }
    }

    #[test]
    fn test_permanent_redirect() {
        let rules = vec![rule("/old-page/", "/new-page/", RedirectKind::Permanent)];
        let outcome = engine().resolve(&rules, &request("/old-page/"), "en");
        assert_eq!(
            outcome,
            ResolutionOutcome::Redirect {
                url: "/new-page/".into(),
                status: StatusCode::MOVED_PERMANENTLY,
            }
        );
    }

    #[test]
    fn test_temporary_redirect_with_capture() {
        let rules = vec![rule("/foo/(.*)", "/bar/$1", RedirectKind::Temporary)];
        let outcome = engine().resolve(&rules, &request("/foo/abc"), "en");
        assert_eq!(
            outcome,
            ResolutionOutcome::Redirect {
                url: "/bar/abc".into(),
                status: StatusCode::FOUND,
            }
        );
    }

    #[test]
    fn test_server_transfer_is_rewrite() {
        let rules = vec![rule("/x", "/y", RedirectKind::ServerTransfer)];
        let outcome = engine().resolve(&rules, &request("/x"), "en");
        assert_eq!(outcome, ResolutionOutcome::Rewrite { url: "/y".into() });
    }

    #[test]
    fn test_none_kind_passes_even_on_match() {
        let rules = vec![rule("/x", "/y", RedirectKind::None)];
        let outcome = engine().resolve(&rules, &request("/x"), "en");
        assert_eq!(outcome, ResolutionOutcome::Pass);
    }

    #[test]
    fn test_empty_catalog_passes() {
        let outcome = engine().resolve(&[], &request("/anything"), "en");
        assert_eq!(outcome, ResolutionOutcome::Pass);
    }

    #[test]
    fn test_catalog_is_not_mutated() {
        let rules = vec![rule("/fr/old/", "/fr/new/", RedirectKind::Permanent)];
        let before = rules.clone();
        let mut req = request("/old");
        req.locale = "fr".into();
        let _ = engine().resolve(&rules, &req, "fr");
        assert_eq!(rules[0].pattern, before[0].pattern);
        assert_eq!(rules[0].target, before[0].target);
    }
}
