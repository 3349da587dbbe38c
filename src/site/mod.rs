//! Site and locale resolution.
//!
//! # Responsibilities
//! - Map a request hostname to a site identity and default language
//! - Resolve the request locale from the path's first segment
//! - Strip a recognized locale prefix before the engine sees the path
//!
//! # Design Decisions
//! - Hostname lookup is exact and case-insensitive; unknown hosts fall
//!   back to the first configured site so traffic is never dropped
//! - Only segments in the configured region list count as locales;
//!   anything else is content and stays in the path

use std::collections::HashMap;

use crate::config::SiteConfig;

/// Identity and defaults of one configured site.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Key the site's rule catalog is stored under.
    pub key: String,
    /// Hostname the site is served on.
    pub hostname: String,
    /// Default language when the request path carries no locale prefix.
    pub language: String,
}

/// Hostname → site lookup built once from config.
#[derive(Debug)]
pub struct SiteRegistry {
    by_hostname: HashMap<String, SiteContext>,
    fallback: SiteContext,
}

impl SiteRegistry {
    /// Build the registry. An empty site list yields a single default
    /// site so resolution always succeeds.
    pub fn from_config(sites: &[SiteConfig]) -> Self {
        let contexts: Vec<SiteContext> = sites
            .iter()
            .map(|s| SiteContext {
                key: s.key.clone(),
                hostname: s.hostname.clone(),
                language: s.language.clone(),
            })
            .collect();

        let fallback = contexts.first().cloned().unwrap_or_else(|| SiteContext {
            key: "default".to_string(),
            hostname: String::new(),
            language: "en".to_string(),
        });

        let by_hostname = contexts
            .into_iter()
            .map(|c| (c.hostname.to_lowercase(), c))
            .collect();

        Self {
            by_hostname,
            fallback,
        }
    }

    /// Resolve a hostname to its site, falling back to the first
    /// configured site for unknown hosts.
    pub fn resolve(&self, hostname: &str) -> &SiteContext {
        self.by_hostname
            .get(&hostname.to_lowercase())
            .unwrap_or(&self.fallback)
    }
}

/// Split a recognized locale prefix off a request path.
///
/// Returns the locale and the remaining path. Paths without a recognized
/// prefix come back unchanged with no locale.
pub fn split_locale<'a>(path: &'a str, regions: &[String]) -> (Option<&'a str>, &'a str) {
    let Some(rest) = path.strip_prefix('/') else {
        return (None, path);
    };
    let end = rest.find('/').unwrap_or(rest.len());
    let first = &rest[..end];

    if !first.is_empty() && regions.iter().any(|r| r.eq_ignore_ascii_case(first)) {
        let remainder = &path[1 + end..];
        let remainder = if remainder.is_empty() { "/" } else { remainder };
        (Some(first), remainder)
    } else {
        (None, path)
    }
}
