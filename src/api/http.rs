use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use super::{CajaApi, CloseRequest, Movement, MovementRequest, OpenSessionRequest};
use crate::caja::{CashSession, ClosureRecord, HistoryFilter, Page};
use crate::config::ApiSettings;
use crate::error::{CajaError, Result};

/// Blocking JSON client for the cash register backend.
pub struct HttpApi {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

/// Status code and raw body of a finished request.
struct Reply {
    status: u16,
    reason: &'static str,
    body: String,
}

impl HttpApi {
    pub fn new(settings: &ApiSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Reply> {
        let url = self.url(path);
        debug!(%url, "GET");

        let mut request = self.authorize(self.agent.get(&url));
        for (key, value) in query {
            request = request.query(*key, value.as_str());
        }
        read(request.call()?)
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Reply> {
        let url = self.url(path);
        let payload = serde_json::to_string(body).map_err(|source| CajaError::Decode {
            endpoint: path.to_string(),
            source,
        })?;
        debug!(%url, %payload, "POST");

        let request = self
            .authorize(self.agent.post(&url))
            .header("Content-Type", "application/json");
        read(request.send(payload)?)
    }
}

fn read(mut response: Response<Body>) -> Result<Reply> {
    let status = response.status();
    let body = response.body_mut().read_to_string()?;
    Ok(Reply {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or(""),
        body,
    })
}

fn parse<T: DeserializeOwned>(endpoint: &str, reply: Reply) -> Result<T> {
    if !(200..300).contains(&reply.status) {
        let message = error_message(&reply.body, reply.reason);
        warn!(endpoint, status = reply.status, %message, "API request failed");
        return Err(CajaError::Api {
            status: reply.status,
            message,
        });
    }
    serde_json::from_str(&reply.body).map_err(|source| CajaError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Pull a human message out of an error body: `message`, then `error`, then
/// the raw text.
fn error_message(body: &str, reason: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
        for key in ["message", "error", "mensaje"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                return text.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.to_string()
    } else {
        trimmed.to_string()
    }
}

impl CajaApi for HttpApi {
    fn open_sessions(&self) -> Result<Vec<CashSession>> {
        let endpoint = "/cajas/abiertas";
        parse(endpoint, self.get(endpoint, &[])?)
    }

    fn session(&self, id: &str) -> Result<CashSession> {
        let endpoint = format!("/cajas/{id}");
        let reply = self.get(&endpoint, &[])?;
        if reply.status == 404 {
            return Err(CajaError::SessionNotFound(id.to_string()));
        }
        parse(&endpoint, reply)
    }

    fn current_session(&self, user_id: &str) -> Result<Option<CashSession>> {
        let endpoint = "/cajas/actual";
        let reply = self.get(endpoint, &[("usuario", user_id.to_string())])?;
        if reply.status == 204 || reply.status == 404 || reply.body.trim().is_empty() {
            return Ok(None);
        }
        parse(endpoint, reply)
    }

    fn closure_history(&self, filter: &HistoryFilter) -> Result<Page<ClosureRecord>> {
        let endpoint = "/cajas/historial";
        parse(endpoint, self.get(endpoint, &filter.query_pairs())?)
    }

    fn open_session(&self, request: &OpenSessionRequest) -> Result<CashSession> {
        let endpoint = "/cajas";
        parse(endpoint, self.post(endpoint, request)?)
    }

    fn register_movement(&self, session_id: &str, request: &MovementRequest) -> Result<Movement> {
        let endpoint = format!("/cajas/{session_id}/movimientos");
        parse(&endpoint, self.post(&endpoint, request)?)
    }

    fn close_session(&self, session_id: &str, request: &CloseRequest) -> Result<ClosureRecord> {
        let endpoint = format!("/cajas/{session_id}/cierre");
        parse(&endpoint, self.post(&endpoint, request)?)
    }
}
