//! Shared in-memory session state.
//!
//! One [`SessionState`] is shared (`Arc`) by the [`SessionManager`](super::SessionManager)
//! and the [`ApiClient`](crate::ApiClient): the manager writes it, the
//! client reads the token from it and invalidates it on 401.
//!
//! # Generations
//!
//! Every write that changes who is signed in bumps a generation counter.
//! A bootstrap captures the generation when it starts and applies its
//! result only if the counter has not moved; a login or logout that
//! happened meanwhile wins.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use stockroom_auth::{AuthStatus, Principal, RoleSource};

#[derive(Debug, Default)]
struct Inner {
    status: AuthStatus,
    token: Option<String>,
}

/// Status, token and generation of the current session.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Inner>,
    generation: AtomicU64,
}

impl SessionState {
    /// Unresolved, no token, generation 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.inner.read().status.clone()
    }

    /// Bearer token of the signed-in principal.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Token and the generation it belongs to, read together.
    #[must_use]
    pub fn token_with_generation(&self) -> (Option<String>, u64) {
        let inner = self.inner.read();
        (inner.token.clone(), self.generation())
    }

    /// `true` while no sign-in or sign-out happened since `generation`.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Signs `principal` in, superseding any in-flight bootstrap.
    pub fn sign_in(&self, principal: Principal, token: String) {
        self.replace(AuthStatus::signed_in(principal), Some(token));
    }

    /// Signs out locally, superseding any in-flight bootstrap.
    pub fn sign_out(&self) {
        self.replace(AuthStatus::signed_out(), None);
    }

    /// Reaction to a 401: same as [`SessionState::sign_out`], logged.
    pub fn invalidate(&self) {
        let was = self.inner.read().status.principal().map(|p| p.username.clone());
        tracing::warn!(principal = ?was, "session rejected by server, signing out");
        self.sign_out();
    }

    /// Invalidates only the session that was current at `generation`.
    ///
    /// A 401 for a request sent under an earlier session leaves the
    /// present one alone. Returns whether the session was signed out.
    pub fn invalidate_if_current(&self, generation: u64) -> bool {
        let mut inner = self.inner.write();
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(generation, "late 401 for a superseded session ignored");
            return false;
        }
        let was = inner.status.principal().map(|p| p.username.clone());
        tracing::warn!(principal = ?was, "session rejected by server, signing out");
        self.generation.fetch_add(1, Ordering::AcqRel);
        inner.status = AuthStatus::signed_out();
        inner.token = None;
        true
    }

    /// Replaces the principal keeping the token and generation.
    ///
    /// No-op unless someone is signed in.
    pub fn refresh_principal(&self, principal: Principal) {
        let mut inner = self.inner.write();
        if inner.status.is_authenticated() {
            inner.status = AuthStatus::signed_in(principal);
        }
    }

    fn replace(&self, status: AuthStatus, token: Option<String>) {
        let mut inner = self.inner.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        inner.status = status;
        inner.token = token;
    }

    /// Applies a bootstrap result if `generation` is still current.
    ///
    /// Returns `false` (and changes nothing) when the result is stale.
    pub(crate) fn resolve_if_current(
        &self,
        generation: u64,
        status: AuthStatus,
        token: Option<String>,
    ) -> bool {
        let mut inner = self.inner.write();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        inner.status = status;
        inner.token = token;
        true
    }
}

impl RoleSource for SessionState {
    fn auth_status(&self) -> AuthStatus {
        self.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_auth::Permission;
    use stockroom_types::Role;

    fn alice(role: Role) -> Principal {
        Principal::new(1, "alice", role)
    }

    #[test]
    fn starts_unresolved() {
        let state = SessionState::new();
        assert_eq!(state.status(), AuthStatus::Unresolved);
        assert!(state.token().is_none());
        assert_eq!(state.generation(), 0);
        assert!(state.decide(Permission::DashboardView).is_pending());
    }

    #[test]
    fn sign_in_and_out_bump_generation() {
        let state = SessionState::new();
        state.sign_in(alice(Role::Manager), "t".into());
        assert_eq!(state.generation(), 1);
        assert_eq!(state.current_role(), Some(Role::Manager));
        assert_eq!(state.token().as_deref(), Some("t"));

        state.sign_out();
        assert_eq!(state.generation(), 2);
        assert_eq!(state.status(), AuthStatus::signed_out());
        assert!(state.token().is_none());
    }

    #[test]
    fn stale_result_is_discarded() {
        let state = SessionState::new();
        let captured = state.generation();

        state.sign_in(alice(Role::Admin), "fresh".into());

        let applied = state.resolve_if_current(captured, AuthStatus::signed_out(), None);
        assert!(!applied);
        assert_eq!(state.current_role(), Some(Role::Admin));
        assert_eq!(state.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn current_result_is_applied_without_bump() {
        let state = SessionState::new();
        let captured = state.generation();

        assert!(state.resolve_if_current(
            captured,
            AuthStatus::signed_in(alice(Role::Viewer)),
            Some("boot".into()),
        ));
        assert_eq!(state.generation(), captured);
        assert_eq!(state.current_role(), Some(Role::Viewer));
    }

    #[test]
    fn invalidate_signs_out() {
        let state = SessionState::new();
        state.sign_in(alice(Role::Viewer), "t".into());
        state.invalidate();
        assert!(!state.status().is_authenticated());
        assert!(state.status().is_resolved());
    }

    #[test]
    fn late_unauthorized_keeps_newer_session() {
        let state = SessionState::new();
        state.sign_in(alice(Role::Viewer), "old".into());
        let (token, sent_under) = state.token_with_generation();
        assert_eq!(token.as_deref(), Some("old"));

        state.sign_in(alice(Role::Admin), "new".into());
        assert!(!state.invalidate_if_current(sent_under));
        assert_eq!(state.current_role(), Some(Role::Admin));
        assert_eq!(state.token().as_deref(), Some("new"));

        let current = state.generation();
        assert!(state.invalidate_if_current(current));
        assert_eq!(state.status(), AuthStatus::signed_out());
        assert!(state.token().is_none());
        assert!(!state.is_current(current));
    }

    #[test]
    fn refresh_principal_requires_sign_in() {
        let state = SessionState::new();
        state.refresh_principal(alice(Role::Admin));
        assert_eq!(state.status(), AuthStatus::Unresolved);

        state.sign_in(alice(Role::Viewer), "t".into());
        let before = state.generation();
        state.refresh_principal(alice(Role::Manager));
        assert_eq!(state.current_role(), Some(Role::Manager));
        assert_eq!(state.generation(), before);
    }
}
