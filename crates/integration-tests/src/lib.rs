//! Integration tests for the Ammonader storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ammonader-integration-tests
//! ```
//!
//! No store is needed: [`FakeCartServer`] serves the AJAX cart endpoints
//! with `axum` on an ephemeral port, and the real [`AjaxCartClient`] talks
//! to it over HTTP.
//!
//! # Test Categories
//!
//! - `cart_client` - Wire format, cookies and error mapping of the client
//! - `cart_sync` - Debounced quantity synchronization end to end
//! - `add_to_cart` - Product-page add-to-cart flow
//!
//! [`AjaxCartClient`]: ammonader_storefront::shopify::AjaxCartClient

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use ammonader_storefront::cart::{CartSurface, LineView, Notice, SubmitButton};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

// =============================================================================
// Fake Cart Server
// =============================================================================

/// Session cookie value the fake server hands out.
pub const CART_TOKEN: &str = "c1-test-session";

#[derive(Debug, Clone)]
struct ServerLine {
    key: String,
    variant: i64,
    title: String,
    quantity: u32,
    unit_price: i64,
}

#[derive(Debug, Default)]
struct ServerState {
    lines: Vec<ServerLine>,
    changes: Vec<(String, u32)>,
    change_requests: Vec<ReceivedRequest>,
    adds: Vec<(i64, u32)>,
    cookies: Vec<Option<String>>,
    failure: Option<(u16, Option<String>)>,
    rate_limit_next: Option<u64>,
}

type Shared = Arc<Mutex<ServerState>>;

/// A request as it reached the fake server.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: Option<String>,
    pub body: Value,
}

/// An in-process stand-in for the store's AJAX cart endpoints.
#[derive(Debug, Clone)]
pub struct FakeCartServer {
    base_url: Url,
    state: Shared,
}

impl FakeCartServer {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new()
            .route("/cart.js", get(get_cart))
            .route("/cart/change.js", post(change_line))
            .route("/cart/add.js", post(add_line))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    /// Store origin to configure the client with.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Put a line in the cart.
    pub fn seed_line(&self, key: &str, variant: i64, quantity: u32, unit_price: i64) {
        self.lock().lines.push(ServerLine {
            key: key.to_string(),
            variant,
            title: format!("Variant {variant}"),
            quantity,
            unit_price,
        });
    }

    /// Answer every following mutation with `status`.
    pub fn fail_with(&self, status: u16, description: Option<&str>) {
        self.lock().failure = Some((status, description.map(str::to_string)));
    }

    /// Answer the next request with 429 and `Retry-After: seconds`.
    pub fn rate_limit_next(&self, seconds: u64) {
        self.lock().rate_limit_next = Some(seconds);
    }

    /// Every `/cart/change.js` body received.
    pub fn change_calls(&self) -> Vec<(String, u32)> {
        self.lock().changes.clone()
    }

    /// Raw body and `Content-Type` of every `/cart/change.js` request.
    pub fn change_requests(&self) -> Vec<ReceivedRequest> {
        self.lock().change_requests.clone()
    }

    /// Every `/cart/add.js` body received.
    pub fn add_calls(&self) -> Vec<(i64, u32)> {
        self.lock().adds.clone()
    }

    /// `cart` cookie of every request, in order.
    pub fn cookies_seen(&self) -> Vec<Option<String>> {
        self.lock().cookies.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap()
    }
}

#[derive(Deserialize)]
struct ChangeBody {
    id: String,
    quantity: u32,
}

#[derive(Deserialize)]
struct AddBody {
    id: i64,
    quantity: u32,
}

fn line_json(line: &ServerLine) -> Value {
    json!({
        "key": line.key,
        "id": line.variant,
        "variant_id": line.variant,
        "quantity": line.quantity,
        "title": line.title,
        "final_price": line.unit_price,
        "final_line_price": line.unit_price * i64::from(line.quantity),
    })
}

fn cart_json(state: &ServerState) -> Value {
    let total: i64 = state
        .lines
        .iter()
        .map(|l| l.unit_price * i64::from(l.quantity))
        .sum();
    json!({
        "token": CART_TOKEN,
        "item_count": state.lines.iter().map(|l| l.quantity).sum::<u32>(),
        "items": state.lines.iter().map(line_json).collect::<Vec<_>>(),
        "total_price": total,
        "currency": "EGP",
    })
}

/// Record the request's cookie and return an early response if one is due.
fn preflight(state: &mut ServerState, headers: &HeaderMap) -> Option<Response> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.split(';')
                .filter_map(|pair| pair.trim().strip_prefix("cart="))
                .next()
                .map(str::to_string)
        });
    state.cookies.push(cookie);

    if let Some(seconds) = state.rate_limit_next.take() {
        return Some(
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, seconds.to_string())],
                "Too Many Requests",
            )
                .into_response(),
        );
    }
    None
}

fn failure(state: &ServerState) -> Option<Response> {
    let (status, description) = state.failure.clone()?;
    let status = StatusCode::from_u16(status).unwrap();
    let mut body = json!({ "status": status.as_u16(), "message": "Cart Error" });
    if let Some(description) = description {
        body["description"] = Value::String(description);
    }
    Some((status, Json(body)).into_response())
}

fn with_session(body: Value) -> Response {
    (
        [(header::SET_COOKIE, format!("cart={CART_TOKEN}; Path=/"))],
        Json(body),
    )
        .into_response()
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = preflight(&mut state, &headers) {
        return response;
    }
    with_session(cart_json(&state))
}

async fn change_line(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(raw): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = preflight(&mut state, &headers) {
        return response;
    }
    state.change_requests.push(ReceivedRequest {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: raw.clone(),
    });
    let Ok(body) = serde_json::from_value::<ChangeBody>(raw) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "bad_request", "message": "Parameter Missing or Invalid" })),
        )
            .into_response();
    };
    state.changes.push((body.id.clone(), body.quantity));
    if let Some(response) = failure(&state) {
        return response;
    }

    if !state.lines.iter().any(|l| l.key == body.id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "bad_request",
                "message": "no valid id or line parameter",
                "description": "no valid id or line parameter",
            })),
        )
            .into_response();
    }
    for line in &mut state.lines {
        if line.key == body.id {
            line.quantity = body.quantity;
        }
    }
    state.lines.retain(|l| l.quantity > 0);
    with_session(cart_json(&state))
}

async fn add_line(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<AddBody>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = preflight(&mut state, &headers) {
        return response;
    }
    state.adds.push((body.id, body.quantity));
    if let Some(response) = failure(&state) {
        return response;
    }

    let index = match state.lines.iter().position(|l| l.variant == body.id) {
        Some(index) => index,
        None => {
            state.lines.push(ServerLine {
                key: format!("{}:added", body.id),
                variant: body.id,
                title: format!("Variant {}", body.id),
                quantity: 0,
                unit_price: 10_000,
            });
            state.lines.len() - 1
        }
    };
    let line = &mut state.lines[index];
    line.quantity += body.quantity;
    with_session(line_json(line))
}

// =============================================================================
// Recording View
// =============================================================================

/// Everything a [`RecordingView`] has been told.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub displayed: String,
    pub message: Option<String>,
    pub locked: bool,
    pub line_total: Option<String>,
    pub attached: bool,
    pub focus_calls: usize,
    pub cart_total: Option<String>,
    pub item_count: Option<u32>,
    pub empty_message: Option<String>,
    pub notices: Vec<Notice>,
    pub button_labels: Vec<Option<String>>,
}

/// A cart row, page and button that records what it was told to show.
#[derive(Debug, Default)]
pub struct RecordingView {
    state: Mutex<ViewState>,
}

impl RecordingView {
    /// An attached row showing `quantity`.
    pub fn showing(quantity: u32) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ViewState {
                displayed: quantity.to_string(),
                attached: true,
                ..ViewState::default()
            }),
        })
    }

    pub fn state(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap()
    }
}

impl LineView for RecordingView {
    fn render_quantity(&self, value: &str) {
        self.lock().displayed = value.to_string();
    }

    fn show_message(&self, message: &str) {
        self.lock().message = Some(message.to_string());
    }

    fn clear_message(&self) {
        self.lock().message = None;
    }

    fn set_locked(&self, locked: bool) {
        self.lock().locked = locked;
    }

    fn set_line_total(&self, formatted: &str) {
        self.lock().line_total = Some(formatted.to_string());
    }

    fn remove(&self) {
        self.lock().attached = false;
    }

    fn is_attached(&self) -> bool {
        self.lock().attached
    }

    fn has_focus(&self) -> bool {
        false
    }

    fn focus(&self) {
        self.lock().focus_calls += 1;
    }
}

impl CartSurface for RecordingView {
    fn set_cart_total(&self, formatted: &str) {
        self.lock().cart_total = Some(formatted.to_string());
    }

    fn set_item_count(&self, count: u32) {
        self.lock().item_count = Some(count);
    }

    fn show_empty_cart(&self, message: &str) {
        self.lock().empty_message = Some(message.to_string());
    }

    fn notify(&self, notice: &Notice) {
        self.lock().notices.push(notice.clone());
    }
}

impl SubmitButton for RecordingView {
    fn set_busy(&self, label: &str) {
        self.lock().button_labels.push(Some(label.to_string()));
    }

    fn restore(&self) {
        self.lock().button_labels.push(None);
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Poll `condition` every 5ms until it holds or two seconds pass.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
