//! HTTP adapter for entcache.
//!
//! Maps the verb set onto HTTP methods against a REST-style base URL:
//! the entity key becomes the path segment (`{base}/{key}`), `get`
//! queries come from a flat JSON object, and the mutating verbs send
//! their payload as a JSON body. Non-2xx responses surface as
//! [`AdapterError::Api`] carrying the response body; connection
//! failures as [`AdapterError::Transport`].

use async_trait::async_trait;
use entcache_client::{Adapter, AdapterError, AdapterResult};
use entcache_types::{EntityKey, Verb};
use reqwest::{Client, Method};
use serde_json::Value;

/// Adapter speaking JSON-over-HTTP to one base URL.
pub struct HttpAdapter {
    base_url: String,
    client: Client,
}

impl HttpAdapter {
    /// Creates an adapter for the base URL with a default client.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates an adapter reusing an existing client (shared pools,
    /// custom timeouts, default headers).
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// The URL a key's requests go to.
    #[must_use]
    pub fn endpoint(&self, key: &EntityKey) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn send(
        &self,
        method: Method,
        key: &EntityKey,
        body: Option<&Value>,
        query: Option<&Value>,
    ) -> AdapterResult {
        let mut request = self.client.request(method, self.endpoint(key));

        if let Some(Value::Object(params)) = query {
            let pairs: Vec<(&str, String)> = params
                .iter()
                .map(|(name, value)| (name.as_str(), query_param(value)))
                .collect();
            request = request.query(&pairs);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AdapterError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(AdapterError::from)
    }

    fn payload_required(payload: Option<Value>, verb: Verb) -> Result<Value, AdapterError> {
        payload.ok_or(AdapterError::MissingPayload(verb))
    }
}

/// Flattens a JSON value into a query-string parameter. Strings go bare;
/// everything else keeps its JSON rendering.
fn query_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Adapter for HttpAdapter {
    async fn get(&self, key: &EntityKey, query: Option<Value>) -> AdapterResult {
        self.send(Method::GET, key, None, query.as_ref()).await
    }

    async fn post(&self, key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let body = Self::payload_required(payload, Verb::Post)?;
        self.send(Method::POST, key, Some(&body), None).await
    }

    async fn put(&self, key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let body = Self::payload_required(payload, Verb::Put)?;
        self.send(Method::PUT, key, Some(&body), None).await
    }

    async fn patch(&self, key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        let body = Self::payload_required(payload, Verb::Patch)?;
        self.send(Method::PATCH, key, Some(&body), None).await
    }

    async fn delete(&self, key: &EntityKey, payload: Option<Value>) -> AdapterResult {
        self.send(Method::DELETE, key, payload.as_ref(), None).await
    }
}
