//! Client tests against an in-process fake of the admin API.
//!
//! Each test binds an axum server on `127.0.0.1:0` with fresh in-memory state.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use console_client::{AdminClient, Page, RemoteOwner};
use console_core::{ConsoleError, ConsoleSettings, OwnerDocument, ResourceKind};
use console_plugin::{OwnerChange, PluginConfigSource, PluginSetBinding};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

const KEY: &str = "edd1c9f034335f136f87ad84b625c8f1";

// ── Fake gateway ──────────────────────────────────────────────

#[derive(Clone, Default)]
struct Gateway {
    docs: Arc<Mutex<HashMap<(String, String), Value>>>,
    last_query: Arc<Mutex<HashMap<String, String>>>,
}

impl Gateway {
    fn seed(&self, kind: &str, id: &str, doc: Value) {
        self.docs.lock().unwrap().insert((kind.into(), id.into()), doc);
    }

    fn doc(&self, kind: &str, id: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(&(kind.to_string(), id.to_string())).cloned()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some(KEY)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "failed to check token"})))
}

async fn list(
    State(gw): State<Gateway>,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    *gw.last_query.lock().unwrap() = query;
    let docs = gw.docs.lock().unwrap();
    let list: Vec<Value> = docs
        .iter()
        .filter(|((k, _), _)| *k == kind)
        .map(|((k, id), v)| json!({"key": format!("/apisix/{k}/{id}"), "value": v}))
        .collect();
    (StatusCode::OK, Json(json!({"total": list.len(), "list": list})))
}

async fn get_one(
    State(gw): State<Gateway>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    match gw.doc(&kind, &id) {
        Some(v) => (StatusCode::OK, Json(json!({"key": format!("/apisix/{kind}/{id}"), "value": v}))),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Key not found"}))),
    }
}

async fn put_one(
    State(gw): State<Gateway>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, String)>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body.get("create_time").is_some() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error_msg": "create_time is read-only"})));
    }
    if kind != "consumers" {
        body["id"] = json!(id);
    }
    body["update_time"] = json!(1_700_000_000);
    gw.seed(&kind, &id, body.clone());
    (StatusCode::OK, Json(json!({"key": format!("/apisix/{kind}/{id}"), "value": body})))
}

async fn delete_one(
    State(gw): State<Gateway>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    gw.docs.lock().unwrap().remove(&(kind, id));
    (StatusCode::OK, Json(json!({"deleted": "1"})))
}

async fn start(gw: Gateway) -> String {
    let app = Router::new()
        .route("/apisix/admin/{kind}", get(list))
        .route("/apisix/admin/{kind}/{id}", get(get_one).put(put_one).delete(delete_one))
        .with_state(gw);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str, key: &str) -> AdminClient {
    AdminClient::new(&ConsoleSettings {
        base_url: base_url.into(),
        admin_key: key.into(),
        timeout_secs: 5,
    })
    .unwrap()
}

// ── CRUD ──────────────────────────────────────────────────────

#[tokio::test]
async fn put_get_delete_roundtrip() {
    let gw = Gateway::default();
    let client = client(&start(gw.clone()).await, KEY);
    let routes = client.resource(ResourceKind::Routes);

    routes.update("r1", &json!({"uri": "/hello"})).await.unwrap();
    let got = routes.get("r1").await.unwrap();
    assert_eq!(got["value"]["uri"], "/hello");

    routes.delete("r1").await.unwrap();
    let err = routes.get("r1").await.unwrap_err();
    assert!(matches!(err, ConsoleError::NotFound(ref m) if m == "Key not found"));
}

#[tokio::test]
async fn create_generates_prefixed_id() {
    let gw = Gateway::default();
    let client = client(&start(gw.clone()).await, KEY);
    let resp = client
        .resource(ResourceKind::Ssls)
        .create(None, &json!({"snis": ["a.com"]}))
        .await
        .unwrap();
    let id = resp["value"]["id"].as_str().unwrap();
    assert!(id.starts_with("ssl_"), "{id}");
    assert!(gw.doc("ssls", id).is_some());
}

#[tokio::test]
async fn list_sends_pagination_and_unwraps_items() {
    let gw = Gateway::default();
    gw.seed("upstreams", "u1", json!({"id": "u1", "nodes": {"127.0.0.1:80": 1}}));
    let client = client(&start(gw.clone()).await, KEY);

    let page = client
        .resource(ResourceKind::Upstreams)
        .list(Page { page: Some(2), page_size: Some(10) })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0]["id"], "u1");

    let query = gw.last_query.lock().unwrap().clone();
    assert_eq!(query.get("page").map(String::as_str), Some("2"));
    assert_eq!(query.get("page_size").map(String::as_str), Some("10"));
}

#[tokio::test]
async fn list_without_pagination_sends_no_query() {
    let gw = Gateway::default();
    let client = client(&start(gw.clone()).await, KEY);
    client.resource(ResourceKind::Routes).list(Page::default()).await.unwrap();
    assert!(gw.last_query.lock().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_key_is_unauthorized() {
    let gw = Gateway::default();
    let client = client(&start(gw).await, "wrong");
    let err = client.resource(ResourceKind::Routes).list(Page::default()).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Unauthorized));
}

#[tokio::test]
async fn gateway_error_message_is_surfaced() {
    let gw = Gateway::default();
    let client = client(&start(gw).await, KEY);
    let err = client
        .resource(ResourceKind::Routes)
        .update("r1", &json!({"uri": "/a", "create_time": 5}))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.user_message(), "create_time is read-only");
}

#[tokio::test]
async fn unreachable_gateway_is_transport_error() {
    let client = client("http://127.0.0.1:1", KEY);
    let err = client.resource(ResourceKind::Routes).get("r1").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Transport(_)));
}

// ── Plugin-config source ──────────────────────────────────────

#[tokio::test]
async fn fetch_plugin_config_returns_enveloped_document() {
    let gw = Gateway::default();
    gw.seed("plugin_configs", "pc1", json!({"id": "pc1", "plugins": {"gzip": {}}}));
    let client = client(&start(gw).await, KEY);
    let body = client.fetch_plugin_config("pc1").await.unwrap();
    assert_eq!(console_core::owner::plugins_of(&body)["gzip"], json!({}));
}

// ── Binding against the gateway ───────────────────────────────

#[tokio::test]
async fn toggle_inline_route_plugin_end_to_end() {
    let gw = Gateway::default();
    gw.seed("routes", "r1", json!({
        "id": "r1", "uri": "/a", "create_time": 1,
        "plugins": {"limit-count": {"count": 2, "time_window": 60}}
    }));
    let client = Arc::new(client(&start(gw.clone()).await, KEY));
    let owner = RemoteOwner::new(&client, ResourceKind::Routes, "r1").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let binding = PluginSetBinding::bind(owner.document().await.unwrap(), client.clone(), tx).await;
    assert!(binding.is_enabled("limit-count"));

    binding.set_plugin_enabled("limit-count", false);
    let patch = rx.recv().await.unwrap();
    let doc = owner.apply(&patch).await.unwrap();
    assert!(!binding.owner_changed(doc, OwnerChange::Echo(patch.seq)).await);

    let stored = gw.doc("routes", "r1").unwrap();
    assert_eq!(stored["plugins"]["limit-count"]["_meta"]["disable"], true);
    assert_eq!(stored["uri"], "/a");
    assert!(!binding.is_enabled("limit-count"));
}

#[tokio::test]
async fn toggle_referenced_plugin_config_end_to_end() {
    let gw = Gateway::default();
    gw.seed("routes", "r1", json!({"id": "r1", "uri": "/a", "plugin_config_id": "pc1"}));
    gw.seed("plugin_configs", "pc1", json!({"id": "pc1", "desc": "shared", "plugins": {"cors": {}}}));
    let client = Arc::new(client(&start(gw.clone()).await, KEY));
    let owner = RemoteOwner::new(&client, ResourceKind::Routes, "r1").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let binding = PluginSetBinding::bind(owner.document().await.unwrap(), client.clone(), tx).await;
    assert!(!binding.is_enabled("cors"), "an empty blob is not configured");

    binding.set_plugin_enabled("cors", true);
    let patch = rx.recv().await.unwrap();
    let doc = owner.apply(&patch).await.unwrap();
    assert_eq!(doc, OwnerDocument::referencing("pc1"));
    binding.owner_changed(doc, OwnerChange::Echo(patch.seq)).await;

    let pc = gw.doc("plugin_configs", "pc1").unwrap();
    assert_eq!(pc["desc"], "shared");
    assert_eq!(pc["plugins"]["cors"], json!({"_meta": {"disable": false}}));
    assert!(gw.doc("routes", "r1").unwrap().get("plugins").is_none());
    assert!(binding.is_enabled("cors"));
}

#[tokio::test]
async fn missing_plugin_config_loads_empty_and_is_created_on_write() {
    let gw = Gateway::default();
    gw.seed("consumer_groups", "g1", json!({"id": "g1", "plugin_config_id": "gone"}));
    let client = Arc::new(client(&start(gw.clone()).await, KEY));
    let owner = RemoteOwner::new(&client, ResourceKind::ConsumerGroups, "g1").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let binding = PluginSetBinding::bind(owner.document().await.unwrap(), client.clone(), tx).await;
    assert!(binding.plugins().is_empty());

    binding.update_plugin("limit-count", json!({"count": 10}));
    owner.apply(&rx.recv().await.unwrap()).await.unwrap();
    assert_eq!(gw.doc("plugin_configs", "gone").unwrap()["plugins"]["limit-count"]["count"], 10);
}
