#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use booking_admin::api::ApiClient;
use booking_admin::dashboard::Confirm;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "secret-token";
pub const BASE_PATH: &str = "/api/bookings";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct BackendState {
    pub bookings: Vec<Value>,
    pub requests: Vec<Recorded>,
    /// Canned status and raw body for the next create, update or delete.
    pub reply: Option<(StatusCode, String)>,
    pub list_fails: bool,
    next_id: u64,
}

type Shared = Arc<Mutex<BackendState>>;

/// An in-process stand-in for the bookings backend, listening on a random
/// local port for as long as it lives.
pub struct FakeBackend {
    pub state: Shared,
    pub base_url: String,
    server: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start(bookings: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            bookings,
            ..BackendState::default()
        }));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{addr}{BASE_PATH}"),
            server,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url, None).unwrap()
    }

    pub fn reply_next(&self, status: u16, body: &str) {
        self.state.lock().unwrap().reply = Some((StatusCode::from_u16(status).unwrap(), body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter_map(|b| b["_id"].as_str().map(str::to_string))
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn booking_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "service": "Haircut",
        "date": "2024-05-01T00:00:00.000Z",
        "time": "10:00",
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "__v": 0
    })
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn canned(reply: (StatusCode, String)) -> Response {
    let (status, body) = reply;
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header_value(header::AUTHORIZATION);
    let body: Option<Value> = serde_json::from_slice(&body).ok();

    let mut state = state.lock().unwrap();
    state.requests.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: authorization.clone(),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.clone(),
    });

    let Some(rest) = uri.path().strip_prefix(BASE_PATH) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let authorized = authorization.as_deref() == Some(&format!("Bearer {TOKEN}"));

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["login"]) => {
            let body = body.unwrap_or_default();
            match (body["username"].as_str(), body["password"].as_str()) {
                (Some("broken"), _) => Json(json!({ "ok": true })).into_response(),
                (Some(USERNAME), Some(PASSWORD)) => Json(json!({ "token": TOKEN })).into_response(),
                _ => message(StatusCode::UNAUTHORIZED, "Invalid credentials supplied"),
            }
        }
        ("GET", []) => {
            let public: Vec<Value> = state
                .bookings
                .iter()
                .map(|b| {
                    let mut b = b.clone();
                    if let Some(obj) = b.as_object_mut() {
                        obj.remove("_id");
                    }
                    b
                })
                .collect();
            Json(public).into_response()
        }
        ("POST", []) => create(&mut state, body),
        _ if !authorized => message(StatusCode::UNAUTHORIZED, "Unauthorized"),
        ("GET", ["admin"]) => match state.list_fails {
            true => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            false => Json(state.bookings.clone()).into_response(),
        },
        ("POST", ["manual"]) => match state.reply.take() {
            Some(reply) => canned(reply),
            None => create(&mut state, body),
        },
        ("GET", [id]) => match state.bookings.iter().find(|b| b["_id"] == *id) {
            Some(booking) => Json(booking.clone()).into_response(),
            None => message(StatusCode::NOT_FOUND, "Booking not found"),
        },
        ("PUT", [id]) => {
            if let Some(reply) = state.reply.take() {
                return canned(reply);
            }
            let id = id.to_string();
            match state.bookings.iter_mut().find(|b| b["_id"] == id.as_str()) {
                Some(booking) => {
                    if let (Some(target), Some(Value::Object(fields))) = (booking.as_object_mut(), body) {
                        target.extend(fields);
                    }
                    Json(booking.clone()).into_response()
                }
                None => message(StatusCode::NOT_FOUND, "Booking not found"),
            }
        }
        ("DELETE", [id]) => {
            if let Some(reply) = state.reply.take() {
                return canned(reply);
            }
            let before = state.bookings.len();
            state.bookings.retain(|b| b["_id"] != *id);
            match state.bookings.len() < before {
                true => message(StatusCode::OK, "Booking deleted"),
                false => StatusCode::NOT_FOUND.into_response(),
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn create(state: &mut BackendState, body: Option<Value>) -> Response {
    let Some(Value::Object(mut fields)) = body else {
        return message(StatusCode::BAD_REQUEST, "Invalid body");
    };
    state.next_id += 1;
    fields.insert("_id".into(), json!(format!("new-{}", state.next_id)));
    let booking = Value::Object(fields);
    state.bookings.push(booking.clone());
    (StatusCode::CREATED, Json(booking)).into_response()
}

/// Answers every delete prompt the same way.
#[derive(Clone, Default)]
pub struct FixedConfirm {
    pub answer: bool,
    pub prompts: Arc<AtomicU64>,
}

impl FixedConfirm {
    pub fn yes() -> Self {
        Self {
            answer: true,
            prompts: Arc::default(),
        }
    }

    pub fn prompts(&self) -> u64 {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirm for FixedConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
