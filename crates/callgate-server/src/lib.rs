//! HTTP surface of the callgate voice-call gateway.
//!
//! Three webhook routes sit on top of the provider clients:
//! - `POST /incoming` bridges an inbound call into a freshly scripted voice
//!   session.
//! - `POST /outbound` dials the next contact in the roster.
//! - `/twiml` bridges a connected outbound call into the session named in
//!   its query string.

pub mod api_bridge;
pub mod api_outbound;
pub mod config;
pub mod error;

pub use error::CallError;

use axum::{
    routing::{any, get, post},
    Extension, Json, Router,
};
use callgate_directory::ContactDirectory;
use callgate_dispatch::Dispatcher;
use callgate_types::SessionConfig;
use callgate_voice::SessionCreator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Contact roster used to personalise inbound scripts.
    pub directory: Arc<dyn ContactDirectory>,
    /// Voice provider used for inbound sessions.
    pub voice: Arc<dyn SessionCreator>,
    /// Outbound dispatcher, holding the roster cursor.
    pub dispatcher: Arc<Dispatcher>,
    /// Voice settings applied to every inbound session.
    pub session_template: SessionConfig,
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/incoming", post(api_bridge::incoming_call_handler))
        .route("/outbound", post(api_outbound::outbound_call_handler))
        .route("/twiml", any(api_bridge::twiml_handler))
        .layer(Extension(Arc::new(state)))
        .layer(TraceLayer::new_for_http())
}
