//! HTTP surface
//!
//! HTML pages for the five desks plus a small JSON API.
//! Each request is one render pass; nothing is kept between requests.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::advisor::{AdvisoryRequest, Advisor};
use crate::desks::{run_desk, DeskInput, DeskRegistry, DeskView};
use crate::error::AdvisorError;
use crate::navigation::Desk;
use crate::page::DeskPage;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<DeskRegistry>,
    pub advisor: Advisor,
}

impl ApiState {
    fn view(&self, desk: Desk) -> Result<Arc<dyn DeskView>, AdvisorError> {
        self.registry.require(desk)
    }
}

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    pub desk: Option<String>,
}

fn status_for(e: &AdvisorError) -> StatusCode {
    match e {
        AdvisorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AdvisorError::UnknownDesk(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn render(status: StatusCode, page: DeskPage) -> Response {
    match page.to_html() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Page rendering failed").into_response()
        }
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "model": state.advisor.model(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// HTML Pages
/// =============================

async fn index(State(state): State<ApiState>, Query(query): Query<NavQuery>) -> Response {
    show_desk(&state, Desk::select(query.desk.as_deref()))
}

async fn desk_page(State(state): State<ApiState>, Path(slug): Path<String>) -> Response {
    show_desk(&state, Desk::select(Some(&slug)))
}

fn show_desk(state: &ApiState, desk: Desk) -> Response {
    match state.view(desk) {
        Ok(view) => render(StatusCode::OK, DeskPage::new(view.as_ref(), &DeskInput::default())),
        Err(e) => (status_for(&e), e.to_string()).into_response(),
    }
}

async fn submit_desk(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let desk = Desk::select(Some(&slug));
    let view = match state.view(desk) {
        Ok(view) => view,
        Err(e) => return (status_for(&e), e.to_string()).into_response(),
    };

    let input = DeskInput::new(fields);
    let page = DeskPage::new(view.as_ref(), &input);

    match run_desk(view.as_ref(), &input, &state.advisor).await {
        Ok(report) => render(
            StatusCode::OK,
            page.with_metrics(report.metrics)
                .with_advice(report.advice.map(|a| a.into_text())),
        ),
        Err(e) => {
            info!(desk = desk.slug(), "Desk input rejected: {}", e);
            render(status_for(&e), page.with_error(e.to_string()))
        }
    }
}

/// =============================
/// JSON Endpoints
/// =============================

async fn advice_handler(
    State(state): State<ApiState>,
    Json(req): Json<AdvisoryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!(role = %req.role, "Received advisory request");

    let response = state.advisor.ask_request(&req).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "answer": response.text(),
            "error_kind": response.error_kind(),
        }))),
    )
}

async fn desk_api_handler(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
    Json(input): Json<DeskInput>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(desk) = Desk::from_slug(&slug) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Unknown desk: {}", slug))),
        );
    };

    let view = match state.view(desk) {
        Ok(view) => view,
        Err(e) => return (status_for(&e), Json(ApiResponse::error(e.to_string()))),
    };

    match run_desk(view.as_ref(), &input, &state.advisor).await {
        Ok(report) => (StatusCode::OK, Json(ApiResponse::success(report))),
        Err(e) => (status_for(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/desk/:slug", get(desk_page).post(submit_desk))
        .route("/health", get(health))
        .route("/api/advice", post(advice_handler))
        .route("/api/desks/:slug", post(desk_api_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Desk server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
