//! Redirect rule and request data model.
//!
//! # Responsibilities
//! - Deserialize rules from the JSON array stored in the key-value store
//! - Model the resolved request the engine matches against
//! - Model the final resolution outcome
//!
//! # Design Decisions
//! - `RedirectKind` is a closed enum; unknown kinds deserialize to `None`
//!   so a malformed rule can never block a request
//! - Rules are read-only to the engine; any string rewriting happens on
//!   clones, never on the caller's catalog

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// The HTTP semantics a rule requests for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedirectKind {
    /// 301 Moved Permanently.
    Permanent,
    /// 302 Found.
    Temporary,
    /// Internal rewrite; the client keeps the original URL.
    ServerTransfer,
    /// Rule is disabled; any unrecognized kind also lands here.
    #[default]
    #[serde(other)]
    None,
}

/// A single redirect rule as authored and stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRule {
    /// Source pattern, optionally carrying its own regex anchors/escapes.
    pub pattern: String,

    /// Destination template. May contain the locale placeholder token,
    /// `$n` capture references, or be an absolute URL.
    pub target: String,

    #[serde(default)]
    pub redirect_kind: RedirectKind,

    /// When set, the rule only applies to requests resolved to this locale.
    #[serde(default)]
    pub locale: Option<String>,

    /// Carry the original query string into the rewritten URL.
    #[serde(default)]
    pub preserve_query_string: bool,
}

/// The normalized request the caller hands to the engine.
///
/// All fields are pre-computed by the HTTP layer; the engine never parses
/// raw protocol frames.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    /// Request path, always starting with `/`, without the locale prefix.
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
    /// Locale the request resolved to (path prefix or site default).
    pub locale: String,
    /// Host the request arrived on.
    pub hostname: String,
}

impl ResolvedRequest {
    /// Path joined with the query string, the form rules may match against.
    pub fn path_with_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Final decision for one request. Constructed fresh per request and
/// immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Client-visible redirect (301 or 302).
    Redirect { url: String, status: StatusCode },
    /// Serve different content at the same externally visible URL.
    Rewrite { url: String },
    /// No rule applies; the request continues unmodified.
    Pass,
}

impl ResolutionOutcome {
    /// Label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionOutcome::Redirect { .. } => "redirect",
            ResolutionOutcome::Rewrite { .. } => "rewrite",
            ResolutionOutcome::Pass => "pass",
        }
    }
}
