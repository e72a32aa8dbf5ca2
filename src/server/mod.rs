use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::PluginSettings;
use crate::error::SyncError;
use crate::graph::memory::MemoryGraph;
use crate::plugin::PluginSession;
use crate::plugin::messages::{PluginMessage, PluginRequest};

/// Session shared by every HTTP request. The lock keeps operations strictly
/// one at a time.
pub type SharedSession = Arc<Mutex<PluginSession<MemoryGraph>>>;

#[derive(Clone)]
struct AppState {
    session: SharedSession,
}

#[derive(Debug, Serialize)]
struct MessagesBody {
    messages: Vec<PluginMessage>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

pub fn shared_session(settings: &PluginSettings) -> SharedSession {
    Arc::new(Mutex::new(PluginSession::new(MemoryGraph::new(
        settings.document_name.clone(),
    ))))
}

pub fn router(session: SharedSession) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/message", post(handle_message))
        .with_state(AppState { session })
}

pub async fn run_http_server(settings: &PluginSettings, bind: &str) -> Result<()> {
    let app = router(shared_session(settings));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind HTTP server to `{bind}`"))?;
    let local_addr = listener.local_addr().ok();

    info!(
        document = %settings.document_name,
        requested_bind = %bind,
        bound_addr = local_addr.map(|addr| addr.to_string()),
        "starting HTTP server"
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server exited with an error")
}

async fn handle_health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn handle_message(State(state): State<AppState>, Json(raw): Json<Value>) -> Response {
    let request = match PluginRequest::from_value(raw) {
        Ok(request) => request,
        Err(error) => return error_response(&error),
    };

    let mut session = state.session.lock().await;
    match session.handle(request).await {
        Ok(messages) => (StatusCode::OK, Json(MessagesBody { messages })).into_response(),
        Err(error) => error_response(&error),
    }
}

fn error_response(error: &SyncError) -> Response {
    let status = status_code_for_error(error);
    warn!(
        status = status.as_u16(),
        error = %error,
        "plugin request failed"
    );
    let body = ErrorBody {
        error: error.to_string(),
    };
    (status, Json(body)).into_response()
}

fn status_code_for_error(error: &SyncError) -> StatusCode {
    match error {
        SyncError::MalformedDocument(_) | SyncError::InvalidRequest { .. } => {
            StatusCode::BAD_REQUEST
        }
        SyncError::SessionClosed => StatusCode::GONE,
        SyncError::Graph(_) => StatusCode::CONFLICT,
        SyncError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
