//! Thin wrapper over the gateway admin API (`/apisix/admin/*`).
//!
//! Every collection supports list / get / upsert (PUT keyed by id) / delete.
//! Responses are returned as JSON; non-2xx responses become [`ConsoleError`]s
//! carrying the gateway's own error message.

use async_trait::async_trait;
use console_core::id::generate_id;
use console_core::owner::resource_body;
use console_core::resource::Resource;
use console_core::{ConsoleError, ConsoleResult, ConsoleSettings, ResourceKind};
use console_plugin::PluginConfigSource;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const ADMIN_PREFIX: &str = "/apisix/admin";
/// Sent as `X-API-KEY`; header names are case-insensitive.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Optional pagination for list calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Page {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size.filter(|s| *s > 0) {
            query.push(("page_size", size.to_string()));
        }
        query
    }
}

/// One page of a collection, with the admin API envelopes removed.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub total: usize,
    pub items: Vec<Value>,
}

impl ListPage {
    /// Parse a list response. Accepts `{"list": [...]}` and the older
    /// `{"node": {"nodes": [...]}}` layout.
    pub fn from_response(body: &Value) -> Self {
        let raw = body
            .get("list")
            .or_else(|| body.get("node").and_then(|n| n.get("nodes")))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let items: Vec<Value> = raw.iter().map(|item| resource_body(item).clone()).collect();
        let total = body
            .get("total")
            .and_then(Value::as_u64)
            .map_or(items.len(), |t| t as usize);
        Self { total, items }
    }

    /// Decode the items into a typed resource, skipping ones that do not fit.
    pub fn typed<T: Resource>(&self) -> Vec<T> {
        let kind = T::KIND;
        self.items
            .iter()
            .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
                Ok(resource) => Some(resource),
                Err(e) => {
                    tracing::warn!(%kind, error = %e, "skipping malformed list item");
                    None
                }
            })
            .collect()
    }
}

/// Admin API client. Built from [`ConsoleSettings`]; rebuild it after the
/// settings change.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    pub fn new(settings: &ConsoleSettings) -> ConsoleResult<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&settings.admin_key)
            .map_err(|e| ConsoleError::Config(format!("invalid admin key: {e}")))?;
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .map_err(|e| ConsoleError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle for one collection.
    pub fn resource(&self, kind: ResourceKind) -> ResourceApi<'_> {
        ResourceApi { client: self, kind }
    }

    fn url(&self, kind: ResourceKind, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}{ADMIN_PREFIX}/{}/{}", self.base_url, kind.as_str(), id),
            None => format!("{}{ADMIN_PREFIX}/{}", self.base_url, kind.as_str()),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ConsoleResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| ConsoleError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ConsoleError::Transport(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(body)
        } else {
            let err = ConsoleError::from_response(status.as_u16(), &body);
            debug!(status = status.as_u16(), error = %err, "admin API request failed");
            Err(err)
        }
    }
}

/// CRUD operations on one admin API collection.
#[derive(Debug, Clone, Copy)]
pub struct ResourceApi<'a> {
    client: &'a AdminClient,
    kind: ResourceKind,
}

impl ResourceApi<'_> {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub async fn list(&self, page: Page) -> ConsoleResult<ListPage> {
        let url = self.client.url(self.kind, None);
        debug!(kind = %self.kind, ?page, "list");
        let body = self
            .client
            .send(self.client.http.get(url).query(&page.query()))
            .await?;
        Ok(ListPage::from_response(&body))
    }

    /// Raw response for one resource (still wrapped in the admin API envelope).
    pub async fn get(&self, id: &str) -> ConsoleResult<Value> {
        debug!(kind = %self.kind, id, "get");
        self.client
            .send(self.client.http.get(self.client.url(self.kind, Some(id))))
            .await
    }

    /// Create a resource; an id is generated when none is given.
    pub async fn create(&self, id: Option<&str>, body: &Value) -> ConsoleResult<Value> {
        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => generate_id(self.kind.id_prefix()),
        };
        self.update(&id, body).await
    }

    /// Upsert by id.
    pub async fn update(&self, id: &str, body: &Value) -> ConsoleResult<Value> {
        debug!(kind = %self.kind, id, "put");
        self.client
            .send(self.client.http.put(self.client.url(self.kind, Some(id))).json(body))
            .await
    }

    pub async fn delete(&self, id: &str) -> ConsoleResult<Value> {
        debug!(kind = %self.kind, id, "delete");
        self.client
            .send(self.client.http.delete(self.client.url(self.kind, Some(id))))
            .await
    }
}

#[async_trait]
impl PluginConfigSource for AdminClient {
    async fn fetch_plugin_config(&self, id: &str) -> ConsoleResult<Value> {
        self.resource(ResourceKind::PluginConfigs).get(id).await
    }
}
