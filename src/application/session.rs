// src/application/session.rs
use crate::domain::DomainError;
use tracing::{debug, info, instrument};

/// Persistent home of the session token.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>, DomainError>;
    fn save(&mut self, token: &str) -> Result<(), DomainError>;
    fn clear(&mut self) -> Result<(), DomainError>;
}

/// Views reachable from the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Notes,
    Archived,
    Unknown,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/notes" => Route::Notes,
            "/archived" => Route::Archived,
            _ => Route::Unknown,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Notes => "/notes",
            Route::Archived => "/archived",
            Route::Unknown => "*",
        }
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Route::Notes | Route::Archived)
    }
}

type Listener = Box<dyn FnMut(bool)>;

/// Authentication state derived from the token store.
///
/// Authenticated iff a non-empty token is stored. Listeners registered with
/// [`SessionGate::subscribe`] are called with the new state on every
/// transition, including transitions picked up by [`SessionGate::refresh`]
/// when another process rewrote the store.
pub struct SessionGate<S: TokenStore> {
    store: S,
    token: Option<String>,
    listeners: Vec<Listener>,
}

impl<S: TokenStore> SessionGate<S> {
    /// Seeds the gate from whatever token the store holds.
    pub fn new(store: S) -> Result<Self, DomainError> {
        let token = normalize(store.load()?);
        debug!(authenticated = token.is_some(), "Session gate initialized");
        Ok(Self {
            store,
            token,
            listeners: Vec::new(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token of an authenticated session, or [`DomainError::NotAuthenticated`].
    pub fn require_token(&self) -> Result<&str, DomainError> {
        self.token().ok_or(DomainError::NotAuthenticated)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[instrument(level = "debug", skip_all)]
    pub fn login(&mut self, token: &str) -> Result<(), DomainError> {
        self.store.save(token)?;
        info!("Logged in");
        self.set_token(normalize(Some(token.to_string())));
        Ok(())
    }

    #[instrument(level = "debug", skip_all)]
    pub fn logout(&mut self) -> Result<(), DomainError> {
        self.store.clear()?;
        info!("Logged out");
        self.set_token(None);
        Ok(())
    }

    /// Re-reads the store; returns whether the authentication state changed.
    pub fn refresh(&mut self) -> Result<bool, DomainError> {
        let was = self.is_authenticated();
        let token = normalize(self.store.load()?);
        self.set_token(token);
        let changed = was != self.is_authenticated();
        if changed {
            debug!(authenticated = self.is_authenticated(), "Session changed externally");
        }
        Ok(changed)
    }

    /// Applies the redirect rules for `route`.
    pub fn resolve(&self, route: Route) -> Route {
        match (route, self.is_authenticated()) {
            (Route::Login, true) => Route::Notes,
            (Route::Login, false) => Route::Login,
            (Route::Notes | Route::Archived, true) => route,
            (Route::Notes | Route::Archived, false) => Route::Login,
            (Route::Unknown, true) => Route::Notes,
            (Route::Unknown, false) => Route::Login,
        }
    }

    fn set_token(&mut self, token: Option<String>) {
        let was = self.is_authenticated();
        self.token = token;
        let now = self.is_authenticated();
        if was != now {
            for listener in self.listeners.iter_mut() {
                listener(now);
            }
        }
    }
}

fn normalize(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::MemoryTokenStore;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn given_empty_store_when_creating_gate_then_unauthenticated() {
        let gate = SessionGate::new(MemoryTokenStore::new()).unwrap();

        assert!(!gate.is_authenticated());
        assert!(matches!(
            gate.require_token(),
            Err(DomainError::NotAuthenticated)
        ));
    }

    #[test]
    fn given_stored_token_when_creating_gate_then_authenticated() {
        let gate = SessionGate::new(MemoryTokenStore::with_token("abc")).unwrap();

        assert!(gate.is_authenticated());
        assert_eq!(gate.token(), Some("abc"));
    }

    #[test]
    fn given_blank_stored_token_when_creating_gate_then_unauthenticated() {
        let gate = SessionGate::new(MemoryTokenStore::with_token("")).unwrap();

        assert!(!gate.is_authenticated());
    }

    #[test]
    fn given_subscriber_when_logging_in_and_out_then_notified_of_each_transition() {
        // Arrange
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut gate = SessionGate::new(MemoryTokenStore::new()).unwrap();
        let sink = Rc::clone(&seen);
        gate.subscribe(move |state| sink.borrow_mut().push(state));

        // Act
        gate.login("abc").unwrap();
        gate.login("def").unwrap();
        gate.logout().unwrap();

        // Assert
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert_eq!(gate.store().load().unwrap(), None);
    }

    #[test]
    fn given_login_when_checking_store_then_token_persisted() {
        let mut gate = SessionGate::new(MemoryTokenStore::new()).unwrap();

        gate.login("abc").unwrap();

        assert_eq!(gate.store().load().unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn given_external_change_when_refreshing_then_state_follows_store() {
        // Arrange
        let store = MemoryTokenStore::new();
        let shared = store.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut gate = SessionGate::new(store).unwrap();
        let sink = Rc::clone(&seen);
        gate.subscribe(move |state| sink.borrow_mut().push(state));

        // Act
        shared.set_external(Some("from-other-window"));
        let changed = gate.refresh().unwrap();
        let unchanged = gate.refresh().unwrap();

        // Assert
        assert!(changed);
        assert!(!unchanged);
        assert!(gate.is_authenticated());
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[rstest]
    #[case(Route::Login, false, Route::Login)]
    #[case(Route::Login, true, Route::Notes)]
    #[case(Route::Notes, false, Route::Login)]
    #[case(Route::Notes, true, Route::Notes)]
    #[case(Route::Archived, false, Route::Login)]
    #[case(Route::Archived, true, Route::Archived)]
    #[case(Route::Unknown, false, Route::Login)]
    #[case(Route::Unknown, true, Route::Notes)]
    fn test_route_resolution(
        #[case] requested: Route,
        #[case] authenticated: bool,
        #[case] expected: Route,
    ) {
        let store = if authenticated {
            MemoryTokenStore::with_token("abc")
        } else {
            MemoryTokenStore::new()
        };
        let gate = SessionGate::new(store).unwrap();

        assert_eq!(gate.resolve(requested), expected);
    }

    #[rstest]
    #[case("/login", Route::Login)]
    #[case("/notes/", Route::Notes)]
    #[case("/archived", Route::Archived)]
    #[case("/settings", Route::Unknown)]
    fn test_route_from_path(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::from_path(path), expected);
    }
}
