//! Route table and navigation guard.
//!
//! # Decision Flow
//!
//! ```text
//! path
//!  │
//!  ├─ asset or public route ──────────────► Allow
//!  ├─ session Unresolved ─────────────────► Pending
//!  ├─ nobody signed in ───────────────────► RedirectToLogin { return_to: path }
//!  ├─ no requirement for path ────────────► Allow
//!  ├─ any required permission granted ────► Allow
//!  └─ otherwise ──────────────────────────► Forbidden { fallback: "/dashboard" }
//! ```
//!
//! Patterns use `[param]` for a single dynamic segment. A path with no
//! exact pattern inherits the requirement of its longest matching pattern
//! prefix, so `/dashboard/inventory/42` requires `inventory.view`.

use crate::checker::has_any_permission;
use crate::{AuthStatus, Permission};

/// Where signed-out visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where a signed-in principal lacking permission is sent.
pub const FORBIDDEN_FALLBACK: &str = "/dashboard";

/// Routes that never require a session. Matched exactly.
pub const PUBLIC_ROUTES: &[&str] = &["/", LOGIN_PATH, "/health"];

const ASSET_PREFIXES: &[&str] = &["/_next", "/api", "/favicon"];

struct RouteRule {
    pattern: &'static str,
    permissions: &'static [Permission],
}

const fn rule(pattern: &'static str, permissions: &'static [Permission]) -> RouteRule {
    RouteRule {
        pattern,
        permissions,
    }
}

const ROUTES: &[RouteRule] = &[
    rule("/dashboard", &[Permission::DashboardView]),
    rule("/dashboard/inventory", &[Permission::InventoryView]),
    rule("/dashboard/inventory/new", &[Permission::InventoryCreate]),
    rule("/dashboard/inventory/[id]/edit", &[Permission::InventoryEdit]),
    rule("/dashboard/users", &[Permission::UsersView]),
    rule("/dashboard/users/new", &[Permission::UsersCreate]),
    rule("/dashboard/users/[id]/edit", &[Permission::UsersEdit]),
    rule("/dashboard/merchants", &[Permission::MerchantsView]),
    rule("/dashboard/merchants/new", &[Permission::MerchantsCreate]),
    rule("/dashboard/merchants/[id]/edit", &[Permission::MerchantsEdit]),
    rule("/dashboard/reports", &[Permission::ReportsView]),
    rule("/dashboard/reports/send", &[Permission::ReportsSend]),
    rule("/dashboard/reports/logs", &[Permission::ReportsHistory]),
    rule("/dashboard/reports/logs/[id]", &[Permission::ReportsHistory]),
    rule("/dashboard/profile", &[Permission::ProfileView]),
];

/// Strips the query/fragment and a trailing slash.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_param(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']')
}

/// Number of segments of `pattern` if it matches a leading run of `path`.
fn prefix_len(pattern: &[&str], path: &[&str]) -> Option<usize> {
    if pattern.len() > path.len() {
        return None;
    }
    pattern
        .iter()
        .zip(path)
        .all(|(p, s)| is_param(p) || p == s)
        .then_some(pattern.len())
}

/// Static files and API proxies, never guarded.
///
/// Only the path part counts: a dot in the query string does not make a
/// page an asset.
#[must_use]
pub fn is_asset_path(path: &str) -> bool {
    let path = normalize(path);
    ASSET_PREFIXES.iter().any(|p| path.starts_with(p)) || path.contains('.')
}

/// Percent-encodes a query value, leaving unreserved characters and `/`.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Exact match against [`PUBLIC_ROUTES`].
#[must_use]
pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.contains(&normalize(path))
}

/// Permissions of which any one grants access to `path`.
///
/// Empty when nothing in the table covers the path.
///
/// ```
/// use stockroom_auth::{required_permissions, Permission};
///
/// assert_eq!(required_permissions("/dashboard/users/7/edit"), &[Permission::UsersEdit]);
/// assert_eq!(required_permissions("/dashboard/inventory/42"), &[Permission::InventoryView]);
/// assert!(required_permissions("/about").is_empty());
/// ```
#[must_use]
pub fn required_permissions(path: &str) -> &'static [Permission] {
    let path = segments(normalize(path));

    ROUTES
        .iter()
        .filter_map(|r| {
            let pattern = segments(r.pattern);
            prefix_len(&pattern, &path).map(|n| (n, r))
        })
        .max_by_key(|(n, _)| *n)
        .map(|(_, r)| r.permissions)
        .unwrap_or(&[])
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the route.
    Allow,
    /// Session still resolving; show a placeholder, decide later.
    Pending,
    /// Nobody signed in; go to the login page and come back afterwards.
    RedirectToLogin { return_to: String },
    /// Signed in but not permitted; go to `fallback`.
    Forbidden { fallback: String },
}

impl RouteDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Target of a redirect, if this decision is one. `return_to` is
    /// percent-encoded into the `redirect` query parameter.
    #[must_use]
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            Self::RedirectToLogin { return_to } => Some(format!(
                "{LOGIN_PATH}?redirect={}",
                encode_query_value(return_to)
            )),
            Self::Forbidden { fallback } => Some(fallback.clone()),
            Self::Allow | Self::Pending => None,
        }
    }
}

/// Client-side navigation guard.
///
/// Advisory only: it hides routes the principal cannot use, the server
/// still validates every request.
///
/// ```
/// use stockroom_auth::{AuthStatus, Principal, RouteDecision, RouteGuard};
/// use stockroom_types::Role;
///
/// let guard = RouteGuard::new();
/// let viewer = AuthStatus::signed_in(Principal::new(1, "amy", Role::Viewer));
///
/// assert_eq!(guard.check("/dashboard/inventory", &viewer), RouteDecision::Allow);
/// assert!(matches!(
///     guard.check("/dashboard/users", &viewer),
///     RouteDecision::Forbidden { .. }
/// ));
/// assert_eq!(guard.check("/dashboard", &AuthStatus::Unresolved), RouteDecision::Pending);
/// ```
#[derive(Debug, Clone)]
pub struct RouteGuard {
    fallback: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallback: FORBIDDEN_FALLBACK.to_string(),
        }
    }

    /// Overrides the forbidden fallback.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Decides whether `path` may be shown for `status`.
    #[must_use]
    pub fn check(&self, path: &str, status: &AuthStatus) -> RouteDecision {
        if is_asset_path(path) || is_public_route(path) {
            return RouteDecision::Allow;
        }

        let principal = match status {
            AuthStatus::Unresolved => return RouteDecision::Pending,
            AuthStatus::Resolved(None) => {
                tracing::debug!(path, "route requires sign-in");
                return RouteDecision::RedirectToLogin {
                    return_to: normalize(path).to_string(),
                };
            }
            AuthStatus::Resolved(Some(p)) => p,
        };

        let required = required_permissions(path);
        if required.is_empty() || has_any_permission(Some(principal.role), required) {
            return RouteDecision::Allow;
        }

        tracing::warn!(
            principal = %principal.username,
            role = %principal.role,
            path,
            fallback = %self.fallback,
            "route forbidden"
        );
        RouteDecision::Forbidden {
            fallback: self.fallback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Principal;
    use stockroom_types::Role;

    fn signed_in(role: Role) -> AuthStatus {
        AuthStatus::signed_in(Principal::new(1, "tester", role))
    }

    fn forbidden() -> RouteDecision {
        RouteDecision::Forbidden {
            fallback: FORBIDDEN_FALLBACK.to_string(),
        }
    }

    #[test]
    fn every_pattern_resolves_to_its_own_entry() {
        for r in ROUTES {
            let concrete = r.pattern.replace("[id]", "17");
            assert_eq!(required_permissions(&concrete), r.permissions, "{}", r.pattern);
        }
    }

    #[test]
    fn dynamic_segments() {
        assert_eq!(
            required_permissions("/dashboard/inventory/abc-123/edit"),
            &[Permission::InventoryEdit]
        );
        assert_eq!(
            required_permissions("/dashboard/reports/logs/99"),
            &[Permission::ReportsHistory]
        );
    }

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(
            required_permissions("/dashboard/merchants/5"),
            &[Permission::MerchantsView]
        );
        assert_eq!(
            required_permissions("/dashboard/users/5/audit"),
            &[Permission::UsersView]
        );
        assert_eq!(
            required_permissions("/dashboard/unknown"),
            &[Permission::DashboardView]
        );
    }

    #[test]
    fn normalization() {
        assert_eq!(
            required_permissions("/dashboard/users/"),
            &[Permission::UsersView]
        );
        assert_eq!(
            required_permissions("/dashboard/users?page=2"),
            &[Permission::UsersView]
        );
        assert!(is_public_route("/login/"));
        assert!(is_public_route("/login?redirect=/dashboard"));
    }

    #[test]
    fn public_routes_are_exact() {
        assert!(is_public_route("/"));
        assert!(is_public_route("/health"));
        assert!(!is_public_route("/dashboard"));
        assert!(!is_public_route("/login/extra"));
    }

    #[test]
    fn assets_bypass() {
        assert!(is_asset_path("/_next/static/chunk.js"));
        assert!(is_asset_path("/api/v1/inventory"));
        assert!(is_asset_path("/favicon.ico"));
        assert!(is_asset_path("/logo.png"));
        assert!(!is_asset_path("/dashboard/inventory"));

        let guard = RouteGuard::new();
        assert_eq!(guard.check("/robots.txt", &AuthStatus::signed_out()), RouteDecision::Allow);
    }

    #[test]
    fn dot_in_query_is_not_an_asset() {
        assert!(!is_asset_path("/dashboard/users?search=a@b.com"));
        assert!(!is_asset_path("/dashboard/users#v1.2"));
        assert!(is_asset_path("/logo.png?v=3"));

        let guard = RouteGuard::new();
        assert_eq!(
            guard.check("/dashboard/users?search=a@b.com", &signed_in(Role::Viewer)),
            forbidden()
        );
        assert_eq!(
            guard.check("/dashboard/users?v=1.2", &AuthStatus::signed_out()),
            RouteDecision::RedirectToLogin {
                return_to: "/dashboard/users".into()
            }
        );
    }

    #[test]
    fn public_routes_allowed_in_every_state() {
        let guard = RouteGuard::new();
        for status in [AuthStatus::Unresolved, AuthStatus::signed_out(), signed_in(Role::Viewer)] {
            assert_eq!(guard.check("/login", &status), RouteDecision::Allow);
            assert_eq!(guard.check("/", &status), RouteDecision::Allow);
        }
    }

    #[test]
    fn unresolved_is_pending_not_redirect() {
        let guard = RouteGuard::new();
        assert_eq!(
            guard.check("/dashboard/users", &AuthStatus::Unresolved),
            RouteDecision::Pending
        );
    }

    #[test]
    fn signed_out_redirects_with_return_path() {
        let decision = RouteGuard::new().check("/dashboard/reports/", &AuthStatus::signed_out());
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                return_to: "/dashboard/reports".into()
            }
        );
        assert_eq!(
            decision.redirect_target().as_deref(),
            Some("/login?redirect=/dashboard/reports")
        );
    }

    #[test]
    fn redirect_target_is_encoded() {
        let decision = RouteDecision::RedirectToLogin {
            return_to: "/dashboard/inventory/a b&c=d".into(),
        };
        assert_eq!(
            decision.redirect_target().as_deref(),
            Some("/login?redirect=/dashboard/inventory/a%20b%26c%3Dd")
        );
        assert_eq!(encode_query_value("/ü"), "/%C3%BC");
    }

    #[test]
    fn role_matrix() {
        let guard = RouteGuard::new();
        let viewer = signed_in(Role::Viewer);
        let manager = signed_in(Role::Manager);
        let admin = signed_in(Role::Admin);

        assert_eq!(guard.check("/dashboard", &viewer), RouteDecision::Allow);
        assert_eq!(guard.check("/dashboard/inventory/new", &viewer), forbidden());
        assert_eq!(guard.check("/dashboard/merchants", &viewer), forbidden());

        assert_eq!(guard.check("/dashboard/inventory/3/edit", &manager), RouteDecision::Allow);
        assert_eq!(guard.check("/dashboard/reports/logs/8", &manager), RouteDecision::Allow);
        assert_eq!(guard.check("/dashboard/users/new", &manager), forbidden());

        assert_eq!(guard.check("/dashboard/users/2/edit", &admin), RouteDecision::Allow);
    }

    #[test]
    fn uncovered_path_is_allowed_when_signed_in() {
        let guard = RouteGuard::new();
        assert_eq!(guard.check("/settings", &signed_in(Role::Viewer)), RouteDecision::Allow);
        assert!(matches!(
            guard.check("/settings", &AuthStatus::signed_out()),
            RouteDecision::RedirectToLogin { .. }
        ));
    }

    #[test]
    fn custom_fallback() {
        let guard = RouteGuard::new().with_fallback("/dashboard/profile");
        assert_eq!(
            guard.check("/dashboard/users", &signed_in(Role::Viewer)).redirect_target(),
            Some("/dashboard/profile".to_string())
        );
    }
}
