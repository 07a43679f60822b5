//! In-process stand-in for the point-of-sale backend.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use parking_lot::Mutex;
use pos_console::navigation::History;
use pos_console::{
    ApiClient, ApiConfig, Local, LocalCreateDto, LocalId, LocalUpdateDto, MemorySessionStore,
};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct Backend {
    pub locales: Mutex<Vec<Local>>,
    pub seen: Mutex<Vec<Seen>>,
    /// Answer `GET /locales` with an envelope that has no `data`.
    pub omit_list_data: AtomicBool,
    /// Bearer token that `GET /locales` answers with 401.
    pub revoked_token: Mutex<Option<String>>,
}

impl Backend {
    pub fn with_locales(locales: Vec<Local>) -> Self {
        Self {
            locales: Mutex::new(locales),
            ..Self::default()
        }
    }

    pub fn last(&self) -> Seen {
        self.seen.lock().last().cloned().expect("no request recorded")
    }

    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        let text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        self.seen.lock().push(Seen {
            method,
            path: uri.path().to_owned(),
            authorization: text(header::AUTHORIZATION),
            content_type: text(header::CONTENT_TYPE),
            body,
        });
    }
}

pub fn local(id: i64, name: &str, address: &str, active: bool) -> Local {
    serde_json::from_value(json!({
        "localId": id,
        "localName": name,
        "address": address,
        "isActive": active,
        "createdAt": "2024-01-01T00:00:00Z",
    }))
    .expect("valid local")
}

fn ok<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Sucursal no encontrada" })),
    )
        .into_response()
}

async fn list(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record(method, &uri, &headers, None);
    let revoked = backend
        .revoked_token
        .lock()
        .as_ref()
        .map(|token| format!("Bearer {token}"));
    if revoked.is_some() && backend.last().authorization == revoked {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if backend.omit_list_data.load(Ordering::SeqCst) {
        return Json(json!({ "success": true })).into_response();
    }
    ok(StatusCode::OK, backend.locales.lock().clone())
}

async fn create(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record(method, &uri, &headers, Some(body.clone()));
    let Ok(dto) = serde_json::from_value::<LocalCreateDto>(body) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut locales = backend.locales.lock();
    let id = locales.iter().map(|l| l.local_id.0).max().unwrap_or(0) + 1;
    let mut created = local(id, &dto.local_name, &dto.address, true);
    created.phone = dto.phone;
    locales.push(created.clone());
    ok(StatusCode::CREATED, created)
}

async fn find(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record(method, &uri, &headers, None);
    let found = backend
        .locales
        .lock()
        .iter()
        .find(|l| l.local_id == LocalId(id))
        .cloned();
    found.map_or_else(not_found, |l| ok(StatusCode::OK, l))
}

async fn update(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record(method, &uri, &headers, Some(body.clone()));
    let Ok(dto) = serde_json::from_value::<LocalUpdateDto>(body) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut locales = backend.locales.lock();
    let Some(existing) = locales.iter_mut().find(|l| l.local_id == LocalId(id)) else {
        return not_found();
    };
    existing.local_name = dto.local_name;
    existing.address = dto.address;
    existing.phone = dto.phone;
    existing.is_active = dto.is_active;
    ok(StatusCode::OK, existing.clone())
}

async fn remove(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record(method, &uri, &headers, None);
    let mut locales = backend.locales.lock();
    match locales.iter_mut().find(|l| l.local_id == LocalId(id)) {
        Some(existing) => {
            existing.is_active = false;
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}

async fn toggle(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record(method, &uri, &headers, None);
    let mut locales = backend.locales.lock();
    match locales.iter_mut().find(|l| l.local_id == LocalId(id)) {
        Some(existing) => {
            existing.is_active = !existing.is_active;
            ok(StatusCode::OK, existing.clone())
        }
        None => not_found(),
    }
}

/// Replies with the requested status, e.g. `GET /api/status/403`.
async fn status(
    State(backend): State<Arc<Backend>>,
    Path(code): Path<u16>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    backend.record(method, &uri, &headers, None);
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {code}")).into_response()
}

/// Start the backend; returns its API base URL.
pub async fn serve(backend: Arc<Backend>) -> String {
    let app = Router::new()
        .route("/api/locales", get(list).post(create))
        .route("/api/locales/{id}", get(find).put(update).delete(remove))
        .route("/api/locales/{id}/toggle-active", patch(toggle))
        .route("/api/status/{code}", get(status))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });
    format!("http://{addr}/api")
}

pub struct Harness {
    pub backend: Arc<Backend>,
    pub store: Arc<MemorySessionStore>,
    pub history: Arc<History>,
    pub client: Arc<ApiClient>,
}

pub async fn harness(backend: Backend) -> Harness {
    let backend = Arc::new(backend);
    let base_url = serve(backend.clone()).await;
    let store = Arc::new(MemorySessionStore::new());
    let history = Arc::new(History::new("/sucursales"));
    let client = ApiClient::new(&ApiConfig::new(base_url), store.clone(), history.clone())
        .expect("client builds");
    Harness {
        backend,
        store,
        history,
        client: Arc::new(client),
    }
}
