// ============================================================================
// ROUTE GUARDS - Un guard por dominio (público / admin)
// ============================================================================
// Se evalúa en cada render: si la sesión caduca, el siguiente render redirige.
// ============================================================================

use crate::router::route::Route;
use crate::state::{AdminSessionStore, TokenStore};

/// Lo mínimo que un guard necesita saber de un store de sesión
pub trait AuthGate {
    /// false mientras la comprobación inicial está pendiente
    fn is_ready(&self) -> bool;
    fn is_authenticated(&self) -> bool;
}

impl AuthGate for TokenStore {
    fn is_ready(&self) -> bool {
        self.is_initialized()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated()
    }
}

impl AuthGate for AdminSessionStore {
    /// Se restaura de forma síncrona desde storage
    fn is_ready(&self) -> bool {
        true
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Indicador de carga, ni contenido ni redirección
    Pending,
    Render,
    Redirect { to: Route, return_to: Option<String> },
}

pub struct RouteGuard<G: AuthGate> {
    gate: G,
    login_route: Route,
}

impl RouteGuard<TokenStore> {
    pub fn public(tokens: TokenStore) -> Self {
        Self::new(tokens, Route::Login)
    }
}

impl RouteGuard<AdminSessionStore> {
    pub fn admin(session: AdminSessionStore) -> Self {
        Self::new(session, Route::AdminLogin)
    }
}

impl<G: AuthGate> RouteGuard<G> {
    pub fn new(gate: G, login_route: Route) -> Self {
        Self { gate, login_route }
    }

    pub fn state(&self) -> GuardState {
        if !self.gate.is_ready() {
            GuardState::Checking
        } else if self.gate.is_authenticated() {
            GuardState::Authenticated
        } else {
            GuardState::Unauthenticated
        }
    }

    pub fn evaluate(&self, requested: &Route) -> GuardOutcome {
        match self.state() {
            GuardState::Checking => GuardOutcome::Pending,
            GuardState::Authenticated => GuardOutcome::Render,
            GuardState::Unauthenticated => {
                log::info!("🚧 [GUARD] {} sin sesión → {}", requested.path(), self.login_route.path());
                GuardOutcome::Redirect {
                    to: self.login_route.clone(),
                    return_to: Some(requested.path()),
                }
            }
        }
    }
}
