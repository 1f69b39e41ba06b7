//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`MockProductApi`] serves the product
//! and stock endpoints from an in-process `axum` server on an ephemeral
//! port.

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// How the mock API answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// Serve products and stock normally.
    Healthy,
    /// Answer every request with this status code.
    Failing(u16),
    /// Answer with a body that is not JSON.
    Malformed,
    /// Answer with 429 and this `Retry-After` value.
    RateLimited(u64),
}

#[derive(Debug)]
struct MockState {
    products: HashMap<i32, Value>,
    stock: HashMap<i32, u32>,
    mode: ApiMode,
    product_requests: usize,
    stock_requests: usize,
    last_authorization: Option<String>,
}

type SharedState = Arc<Mutex<MockState>>;

/// An in-process stand-in for the product and stock API.
///
/// The server task is aborted when the mock is dropped.
pub struct MockProductApi {
    addr: SocketAddr,
    state: SharedState,
    server: JoinHandle<()>,
}

impl MockProductApi {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(MockState {
            products: HashMap::new(),
            stock: HashMap::new(),
            mode: ApiMode::Healthy,
            product_requests: 0,
            stock_requests: 0,
            last_authorization: None,
        }));

        let app = Router::new()
            .route("/products/{id}", get(product_handler))
            .route("/stock/{id}", get(stock_handler))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock product API");
        let addr = listener.local_addr().expect("Failed to read local address");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock product API stopped");
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL to configure the cart's catalog with.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Mock address is a valid URL")
    }

    /// Register a product with the given stock ceiling.
    pub fn add_product(&self, id: i32, title: &str, price: f64, stock: u32) {
        self.add_product_json(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat.example/tenis{id}.jpg"),
            }),
            stock,
        );
    }

    /// Register a product with an arbitrary descriptor body.
    pub fn add_product_json(&self, id: i32, descriptor: Value, stock: u32) {
        let mut state = self.lock();
        state.products.insert(id, descriptor);
        state.stock.insert(id, stock);
    }

    /// Change a product's stock ceiling.
    pub fn set_stock(&self, id: i32, amount: u32) {
        self.lock().stock.insert(id, amount);
    }

    /// Change how the API answers.
    pub fn set_mode(&self, mode: ApiMode) {
        self.lock().mode = mode;
    }

    /// Number of `GET /products/{id}` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.lock().product_requests
    }

    /// Number of `GET /stock/{id}` requests served.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.lock().stock_requests
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.lock().last_authorization.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("Mock state poisoned")
    }
}

impl Drop for MockProductApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rocketshoes_cart=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

async fn product_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    respond(&state, &headers, |state| {
        state.product_requests += 1;
        state.products.get(&id).cloned()
    })
}

async fn stock_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    respond(&state, &headers, |state| {
        state.stock_requests += 1;
        state
            .stock
            .get(&id)
            .map(|amount| json!({ "id": id, "amount": amount }))
    })
}

fn respond(
    state: &SharedState,
    headers: &HeaderMap,
    lookup: impl FnOnce(&mut MockState) -> Option<Value>,
) -> Response {
    let Ok(mut state) = state.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    state.last_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let body = lookup(&mut state);

    match state.mode {
        ApiMode::Healthy => match body {
            Some(body) => axum::Json(body).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        ApiMode::Failing(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream exploded",
        )
            .into_response(),
        ApiMode::Malformed => (
            [(header::CONTENT_TYPE, "application/json")],
            "{\"amount\": ",
        )
            .into_response(),
        ApiMode::RateLimited(retry_after) => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
        )
            .into_response(),
    }
}
