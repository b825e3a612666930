// src/infrastructure/http.rs
use crate::application::NotesApi;
use crate::domain::{ApiError, Credentials, Note, NoteId, NotePayload, Tag, TagId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

/// [`NotesApi`] over HTTP.
///
/// Non-success statuses are read as responses, not transport errors, so the
/// server's error body reaches [`ApiError::Status`].
pub struct HttpNotesApi {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    code: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewTag<'a> {
    name: &'a str,
}

impl HttpNotesApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let config = Agent::config_builder().http_status_as_error(false).build();
        Self {
            agent: config.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&mut self, token: Option<&str>) {
        self.token = token.map(str::to_owned);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request.header("Accept", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let request = self.authorize(self.agent.get(self.url(path)));
        decode(finish(request.call())?)
    }

    fn post<T: DeserializeOwned, P: Serialize>(&self, path: &str, body: &P) -> Result<T, ApiError> {
        debug!(path, "POST");
        let request = self.authorize(self.agent.post(self.url(path)));
        decode(finish(request.send_json(body))?)
    }

    fn put<T: DeserializeOwned, P: Serialize>(&self, path: &str, body: &P) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let request = self.authorize(self.agent.put(self.url(path)));
        decode(finish(request.send_json(body))?)
    }

    fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let request = self.authorize(self.agent.put(self.url(path)));
        decode(finish(request.send_empty())?)
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        let request = self.authorize(self.agent.delete(self.url(path)));
        finish(request.call()).map(|_| ())
    }
}

/// Reads the body and splits success from server errors.
fn finish(result: Result<Response<Body>, ureq::Error>) -> Result<String, ApiError> {
    let response = result.map_err(|e| ApiError::transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| ApiError::transport(e.to_string()))?;
    trace!(status = status.as_u16(), body = %body, "Response");
    if status.is_success() {
        Ok(body)
    } else {
        Err(error_from_body(status.as_u16(), &body))
    }
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, ApiError> {
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Server error bodies are `{"error": ..}` or `{"message": ..}`, optionally
/// with a `code`. Anything unparseable leaves both unset.
fn error_from_body(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.map(|c| match c {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    ApiError::Status {
        status,
        message: parsed.error.or(parsed.message),
        code,
    }
}

impl NotesApi for HttpNotesApi {
    #[instrument(level = "debug", skip_all, fields(username = %credentials.username))]
    fn login(&mut self, credentials: &Credentials) -> Result<String, ApiError> {
        let response: AuthResponse = self.post("/auth/login", credentials)?;
        response
            .token
            .ok_or_else(|| ApiError::Decode("login response without token".to_string()))
    }

    fn active_notes(&mut self) -> Result<Vec<Note>, ApiError> {
        self.get("/notes/active")
    }

    fn archived_notes(&mut self) -> Result<Vec<Note>, ApiError> {
        self.get("/notes/archived")
    }

    fn create_note(&mut self, payload: &NotePayload) -> Result<Note, ApiError> {
        self.post("/notes/create", payload)
    }

    fn update_note(&mut self, id: NoteId, payload: &NotePayload) -> Result<Note, ApiError> {
        self.put(&format!("/notes/{id}"), payload)
    }

    fn toggle_archive(&mut self, id: NoteId) -> Result<Note, ApiError> {
        self.put_empty(&format!("/notes/{id}/archive"))
    }

    fn delete_note(&mut self, id: NoteId) -> Result<(), ApiError> {
        self.delete(&format!("/notes/{id}"))
    }

    fn tags(&mut self) -> Result<Vec<Tag>, ApiError> {
        self.get("/tags")
    }

    fn create_tag(&mut self, name: &str) -> Result<Tag, ApiError> {
        self.post("/tags", &NewTag { name })
    }

    fn delete_tag(&mut self, id: TagId) -> Result<(), ApiError> {
        self.delete(&format!("/tags/{id}"))
    }
}
