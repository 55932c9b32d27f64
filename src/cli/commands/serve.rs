//! HTTP API server for the study assistant.
//!
//! Exposes the chat agent plus direct endpoints for timers and the
//! Pomodoro session.

use crate::agent::{tool_catalog, Agent};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::context::StudyContext;
use crate::error::StudyError;
use crate::suggest::followup_suggestions;
use crate::timer::TimerId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
pub struct AppState {
    study: StudyContext,
    agent: Agent,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            study: agent.tools().study.clone(),
            agent,
        }
    }
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let mut settings = settings;
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    preflight::check(Operation::Serve, &settings)?;
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::warning(&format!("{} Chat requests will fail until it is set.", e));
    }

    let state = Arc::new(AppState::new(Agent::from_settings(&settings)?));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let addr = settings.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("Studymate API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET    /health");
    Output::kv("Tools", "GET    /api/tools");
    Output::kv("Chat", "POST   /api/chat");
    Output::kv("Timers", "GET    /api/timers");
    Output::kv("Set Timer", "POST   /api/timers");
    Output::kv("Cancel Timer", "DELETE /api/timers/{id}");
    Output::kv("Pomodoro", "GET    /api/pomodoro");
    Output::kv("Start Pomodoro", "POST   /api/pomodoro");
    Output::kv("Stop Pomodoro", "DELETE /api/pomodoro");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/chat", post(chat))
        .route("/api/timers", get(list_timers).post(create_timer))
        .route("/api/timers/{id}", delete(cancel_timer))
        .route(
            "/api/pomodoro",
            get(pomodoro_status).post(start_pomodoro).delete(stop_pomodoro),
        )
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    suggestions: Vec<String>,
}

#[derive(Serialize)]
struct TimerListResponse {
    timers: Vec<TimerInfo>,
}

#[derive(Serialize)]
struct TimerInfo {
    id: TimerId,
    name: String,
    subject: String,
    duration: u32,
    minutes_left: u64,
    seconds_left: u64,
    end_time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CreateTimerRequest {
    duration_minutes: u32,
    subject: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize)]
struct CreateTimerResponse {
    id: TimerId,
    message: String,
}

#[derive(Deserialize)]
struct StartPomodoroRequest {
    subject: String,
    #[serde(default)]
    sessions: Option<u32>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn study_error_response(e: &StudyError) -> Response {
    let status = match e {
        StudyError::TimerNotFound(_) | StudyError::NoActiveSession => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, e.to_string())
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_tools() -> impl IntoResponse {
    Json(tool_catalog())
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    let query = req.query.trim();
    if query.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No query provided");
    }

    match state.agent.run(query).await {
        Ok(response) => Json(ChatResponse {
            response: response.content,
            suggestions: followup_suggestions(query),
        })
        .into_response(),
        Err(e) => {
            warn!("Chat request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn list_timers(State(state): State<Arc<AppState>>) -> Response {
    let timers = state
        .study
        .timers
        .list_active()
        .into_iter()
        .map(|t| TimerInfo {
            minutes_left: t.minutes_remaining(),
            seconds_left: t.seconds_remaining(),
            id: t.id,
            name: t.name,
            subject: t.subject,
            duration: t.duration_minutes,
            end_time: t.end_time,
        })
        .collect();

    Json(TimerListResponse { timers }).into_response()
}

async fn create_timer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTimerRequest>,
) -> Response {
    match state
        .study
        .timers
        .set_timer(req.duration_minutes, &req.subject, req.name.as_deref())
    {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreateTimerResponse {
                id,
                message: format!(
                    "Timer set for {} minutes for {}. Timer ID: {}",
                    req.duration_minutes,
                    req.subject.trim(),
                    id
                ),
            }),
        )
            .into_response(),
        Err(e) => study_error_response(&e),
    }
}

async fn cancel_timer(State(state): State<Arc<AppState>>, Path(id): Path<TimerId>) -> Response {
    match state.study.timers.cancel(id) {
        Ok(()) => Json(MessageResponse {
            message: format!("Timer {} has been cancelled.", id),
        })
        .into_response(),
        Err(e) => study_error_response(&e),
    }
}

async fn pomodoro_status(State(state): State<Arc<AppState>>) -> Response {
    match state.study.pomodoro.get_status() {
        Some(session) if session.is_active() => Json(session).into_response(),
        _ => Json(serde_json::json!({ "status": "no_active_session" })).into_response(),
    }
}

async fn start_pomodoro(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartPomodoroRequest>,
) -> Response {
    let sessions = req
        .sessions
        .unwrap_or_else(|| state.study.default_sessions());

    match state.study.pomodoro.start(&req.subject, sessions) {
        Ok(session) => Json(session).into_response(),
        Err(e) => study_error_response(&e),
    }
}

async fn stop_pomodoro(State(state): State<Arc<AppState>>) -> Response {
    match state.study.pomodoro.stop() {
        Ok(session) => Json(MessageResponse {
            message: format!("Stopped the Pomodoro session for {}.", session.subject),
        })
        .into_response(),
        Err(e) => study_error_response(&e),
    }
}
