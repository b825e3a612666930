// src/application/login.rs
use crate::application::{Banners, NotesApi, Outcome, SessionGate, TokenStore};
use crate::constants::messages;
use crate::domain::{ApiError, Credentials, DomainError};
use tracing::{error, instrument};

/// Username/password form of the login route.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    banners: Banners,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            banners: Banners::new(),
        }
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    /// Exchanges the credentials for a token and stores it through `gate`.
    ///
    /// Blank fields are a no-op. A rejected login shows the server's message
    /// or "Invalid credentials".
    #[instrument(level = "debug", skip_all, fields(username = %self.username))]
    pub fn submit<A, S>(
        &mut self,
        api: &mut A,
        gate: &mut SessionGate<S>,
    ) -> Result<Outcome, DomainError>
    where
        A: NotesApi,
        S: TokenStore,
    {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Ok(Outcome::Skipped);
        }
        self.banners.clear();
        let credentials = Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        match api.login(&credentials) {
            Ok(token) if !token.trim().is_empty() => {
                gate.login(&token)?;
                Ok(Outcome::Applied)
            }
            Ok(_) => {
                let e = ApiError::Decode("login response without token".to_string());
                Err(self.reject(e).into())
            }
            Err(e) => Err(self.reject(e).into()),
        }
    }

    fn reject(&mut self, e: ApiError) -> ApiError {
        error!(error = %e, "Login failed");
        let message = e
            .server_message()
            .map(str::to_owned)
            .unwrap_or_else(|| messages::INVALID_CREDENTIALS.to_string());
        self.banners.set_error(message);
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{ApiCall, Endpoint, MemoryTokenStore, MockNotesApi};

    #[test]
    fn given_valid_credentials_when_submitting_then_token_stored_and_authenticated() {
        // Arrange
        let mut api = MockNotesApi::builder().with_login_token("jwt-123").build();
        let mut gate = SessionGate::new(MemoryTokenStore::new()).unwrap();
        let mut form = LoginForm::new("alice", "secret");

        // Act
        let outcome = form.submit(&mut api, &mut gate).unwrap();

        // Assert
        assert_eq!(outcome, Outcome::Applied);
        assert!(gate.is_authenticated());
        assert_eq!(gate.token(), Some("jwt-123"));
        assert_eq!(api.calls(), &[ApiCall::Login("alice".to_string())]);
    }

    #[test]
    fn given_rejection_with_message_when_submitting_then_server_message_shown() {
        let mut api = MockNotesApi::builder()
            .with_failure(
                Endpoint::Login,
                ApiError::Status {
                    status: 401,
                    message: Some("Invalid username or password".to_string()),
                    code: None,
                },
            )
            .build();
        let mut gate = SessionGate::new(MemoryTokenStore::new()).unwrap();
        let mut form = LoginForm::new("alice", "wrong");

        let result = form.submit(&mut api, &mut gate);

        assert!(result.is_err());
        assert!(!gate.is_authenticated());
        assert_eq!(form.banners().error(), Some("Invalid username or password"));
    }

    #[test]
    fn given_transport_failure_when_submitting_then_generic_message_shown() {
        let mut api = MockNotesApi::builder()
            .with_failure(Endpoint::Login, ApiError::transport("connection refused"))
            .build();
        let mut gate = SessionGate::new(MemoryTokenStore::new()).unwrap();
        let mut form = LoginForm::new("alice", "secret");

        let _ = form.submit(&mut api, &mut gate);

        assert_eq!(form.banners().error(), Some("Invalid credentials"));
    }

    #[test]
    fn given_blank_username_when_submitting_then_no_request() {
        let mut api = MockNotesApi::builder().with_login_token("jwt").build();
        let mut gate = SessionGate::new(MemoryTokenStore::new()).unwrap();
        let mut form = LoginForm::new("  ", "secret");

        let outcome = form.submit(&mut api, &mut gate).unwrap();

        assert_eq!(outcome, Outcome::Skipped);
        assert!(api.calls().is_empty());
    }
}
