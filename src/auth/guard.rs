//! Route-level authentication gate.
//!
//! Mirrors the page guard of the original web client: a visitor without a
//! token is sent to the login screen before any protected view renders, and
//! an authenticated visitor landing on the login or register screen is sent
//! straight to chat. The check is presence-only; the token is never verified
//! against the server here.

use crate::auth::TokenStore;

/// The navigable screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Chat,
    Documents,
    Settings,
    AdminUsers,
}

impl Route {
    /// Login and register are reachable without a token; everything else is
    /// behind the gate.
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// Outcome of evaluating the gate for one route.
///
/// `Checking` is the initial state before the store has been consulted;
/// `Redirecting` is terminal for that navigation. The gate is re-evaluated
/// on every route change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authorized,
    Redirecting(Route),
}

/// Evaluates the gate against the current token state.
pub struct AuthGuard;

impl AuthGuard {
    /// Decides whether `route` may render given token presence.
    pub fn evaluate(route: Route, authenticated: bool) -> GuardState {
        if !authenticated && !route.is_auth_page() {
            GuardState::Redirecting(Route::Login)
        } else if authenticated && route.is_auth_page() {
            GuardState::Redirecting(Route::Chat)
        } else {
            GuardState::Authorized
        }
    }

    /// Convenience form reading token presence from a store.
    pub fn check(route: Route, store: &TokenStore) -> GuardState {
        Self::evaluate(route, store.is_authenticated())
    }
}
