//! Authenticated request pipeline.
//!
//! # Design
//! Every call goes through three steps that are also exposed on their own:
//! `build_request` turns an endpoint and payload into an `HttpRequest` with
//! the bearer credential attached, the `Transport` performs the round-trip,
//! and `parse_response` collapses the reply into `Ok(data)` or an `ApiError`.
//!
//! The envelope is decoded in two steps: first with an untyped `data`, and the
//! `data` field is only decoded into `T` once `success` is known to be true.
//! A failed envelope therefore never exposes its `data`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::session::Session;

/// Shared entry point for all outbound API calls.
///
/// Cheap to clone; clones share the session and transport.
#[derive(Clone)]
pub struct ApiPipeline {
    base_url: String,
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
}

impl ApiPipeline {
    pub fn new(base_url: &str, session: Arc<Session>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Build the outbound request, attaching the current credential if any.
    pub fn build_request<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: Option<&P>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = Vec::new();
        let body = match payload {
            Some(payload) => {
                let body = serde_json::to_string(payload)
                    .map_err(|e| TransportError::Encode(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(body)
            }
            None => None,
        };
        if let Some(credential) = self.session.credential() {
            headers.push(("authorization".to_string(), credential.bearer()));
        }
        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            body,
        })
    }

    /// Normalize a reply into the envelope's `data` or an error.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let envelope = match serde_json::from_str::<RawEnvelope>(&response.body) {
            Ok(envelope) => envelope,
            Err(e) if response.is_success() => {
                return Err(TransportError::Decode(e.to_string()).into());
            }
            Err(_) => {
                return Err(TransportError::Status {
                    status: response.status,
                    body: response.body,
                }
                .into());
            }
        };

        if !envelope.success {
            return Err(ApiError::domain(envelope.message.unwrap_or_default()));
        }
        serde_json::from_value(envelope.data)
            .map_err(|e| TransportError::Decode(e.to_string()).into())
    }

    /// Build, execute and parse one call.
    pub fn request<T, P>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: Option<&P>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let request = self.build_request(method, endpoint, payload)?;
        tracing::debug!(%method, url = %request.url, "dispatching request");

        let outcome = self
            .transport
            .execute(request)
            .map_err(ApiError::from)
            .and_then(|response| {
                tracing::debug!(%method, endpoint, status = response.status, "response received");
                self.parse_response(response)
            });

        if let Err(e) = &outcome {
            tracing::warn!(%method, endpoint, kind = ?e.kind(), error = %e, "request failed");
        }
        outcome
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, Value>(HttpMethod::Get, endpoint, None)
    }

    pub fn post<T, P>(&self, endpoint: &str, payload: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, endpoint, Some(payload))
    }

    pub fn put<T, P>(&self, endpoint: &str, payload: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, endpoint, Some(payload))
    }

    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, Value>(HttpMethod::Delete, endpoint, None)
    }
}

impl std::fmt::Debug for ApiPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiPipeline")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Envelope as it arrives on the wire, before `data` is trusted.
#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}
