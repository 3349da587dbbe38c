//! Resolution engine integration tests: the documented scenarios and the
//! engine's fail-open and precedence guarantees, exercised through the
//! public API.

use axum::http::StatusCode;
use redirect_proxy::config::RedirectsConfig;
use redirect_proxy::engine::{
    RedirectEngine, RedirectKind, RedirectRule, ResolutionOutcome, ResolvedRequest,
};

fn engine() -> RedirectEngine {
    RedirectEngine::new(&RedirectsConfig::default())
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

fn request(path: &str, query: &str, locale: &str) -> ResolvedRequest {
    ResolvedRequest {
        path: path.into(),
        query: query.into(),
        locale: locale.into(),
        hostname: "example.com".into(),
    }
}

#[test]
fn permanent_rule_redirects_with_301() {
    let rules = vec![rule("/old-page/", "/new-page/", RedirectKind::Permanent)];
    let outcome = engine().resolve(&rules, &request("/old-page/", "", "en"), "en");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "/new-page/".into(),
            status: StatusCode::MOVED_PERMANENTLY,
        }
    );
}

#[test]
fn temporary_rule_interpolates_captures_with_302() {
    let rules = vec![rule("/foo/(.*)", "/bar/$1", RedirectKind::Temporary)];
    let outcome = engine().resolve(&rules, &request("/foo/abc", "", "en"), "en");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "/bar/abc".into(),
            status: StatusCode::FOUND,
        }
    );
}

#[test]
fn locale_filtered_rule_passes_for_other_locales() {
    let mut fr_rule = rule("/about", "/a-propos", RedirectKind::Permanent);
    fr_rule.locale = Some("fr".into());
    let rules = vec![fr_rule];

    let outcome = engine().resolve(&rules, &request("/about", "", "en"), "en");
    assert_eq!(outcome, ResolutionOutcome::Pass);

    let outcome = engine().resolve(&rules, &request("/about", "", "fr"), "fr");
    assert!(matches!(outcome, ResolutionOutcome::Redirect { .. }));
}

#[test]
fn server_transfer_rule_rewrites() {
    let rules = vec![rule("/x", "/y", RedirectKind::ServerTransfer)];
    let outcome = engine().resolve(&rules, &request("/x", "", "en"), "en");
    assert_eq!(outcome, ResolutionOutcome::Rewrite { url: "/y".into() });
}

#[test]
fn none_kind_always_passes() {
    let rules = vec![rule("/x", "/y", RedirectKind::None)];
    let outcome = engine().resolve(&rules, &request("/x", "", "en"), "en");
    assert_eq!(outcome, ResolutionOutcome::Pass);
}

#[test]
fn unrecognized_kind_deserializes_to_pass() {
    let rules: Vec<RedirectRule> = serde_json::from_str(
        r#"[{"pattern": "/x", "target": "/y", "redirectKind": "clientPull"}]"#,
    )
    .unwrap();
    let outcome = engine().resolve(&rules, &request("/x", "", "en"), "en");
    assert_eq!(outcome, ResolutionOutcome::Pass);
}

#[test]
fn no_matching_rule_passes() {
    let rules = vec![rule("/old-page/", "/new-page/", RedirectKind::Permanent)];
    let outcome = engine().resolve(&rules, &request("/somewhere-else", "", "en"), "en");
    assert_eq!(outcome, ResolutionOutcome::Pass);
}

#[test]
fn earlier_rule_takes_precedence() {
    let rules = vec![
        rule("/dup", "/first", RedirectKind::Temporary),
        rule("/dup", "/second", RedirectKind::Permanent),
    ];
    let outcome = engine().resolve(&rules, &request("/dup", "", "en"), "en");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "/first".into(),
            status: StatusCode::FOUND,
        }
    );
}

#[test]
fn absolute_target_is_used_verbatim() {
    let rules = vec![rule(
        "/moved",
        "https://example.org/new",
        RedirectKind::Permanent,
    )];
    let outcome = engine().resolve(&rules, &request("/moved", "drop=me", "en"), "en");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "https://example.org/new".into(),
            status: StatusCode::MOVED_PERMANENTLY,
        }
    );
}

#[test]
fn query_is_dropped_unless_preserved() {
    let rules = vec![rule("/old", "/new", RedirectKind::Permanent)];
    let outcome = engine().resolve(&rules, &request("/old", "a=1&b=2", "en"), "en");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "/new".into(),
            status: StatusCode::MOVED_PERMANENTLY,
        }
    );
}

#[test]
fn preserved_query_parameters_all_appear() {
    let mut preserving = rule("/old", "/new", RedirectKind::Permanent);
    preserving.preserve_query_string = true;
    let rules = vec![preserving];

    let outcome = engine().resolve(&rules, &request("/old", "a=1&b=2", "en"), "en");
    let ResolutionOutcome::Redirect { url, .. } = outcome else {
        panic!("expected redirect");
    };
    assert!(url.contains("a=1"));
    assert!(url.contains("b=2"));
}

#[test]
fn uncompilable_rule_never_aborts_evaluation() {
    let rules = vec![
        rule("/broken[", "/nowhere", RedirectKind::Permanent),
        rule("/works", "/fixed", RedirectKind::Permanent),
    ];
    let outcome = engine().resolve(&rules, &request("/works", "", "en"), "en");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "/fixed".into(),
            status: StatusCode::MOVED_PERMANENTLY,
        }
    );
}

#[test]
fn locale_prefixed_pattern_matches_stripped_path() {
    let rules = vec![rule("/en/old-page/", "/new-page/", RedirectKind::Permanent)];
    let outcome = engine().resolve(&rules, &request("/old-page", "", "en"), "en");
    assert!(matches!(outcome, ResolutionOutcome::Redirect { .. }));
}

#[test]
fn target_locale_override_is_stripped_from_url() {
    let rules = vec![rule("/ancien", "/fr/nouveau", RedirectKind::Permanent)];
    let outcome = engine().resolve(&rules, &request("/ancien", "", "fr"), "fr");
    assert_eq!(
        outcome,
        ResolutionOutcome::Redirect {
            url: "/nouveau".into(),
            status: StatusCode::MOVED_PERMANENTLY,
        }
    );
}

#[test]
fn catalog_snapshot_is_never_mutated() {
    let rules = vec![rule("/en/old/", "/{lang}/new/", RedirectKind::Permanent)];
    let before = serde_json::to_string(&rules).unwrap();

    let _ = engine().resolve(&rules, &request("/old", "", "en"), "en");
    let _ = engine().resolve(&rules, &request("/old/", "", "en"), "en");

    assert_eq!(serde_json::to_string(&rules).unwrap(), before);
}
