// REST API with Axum
// Every route opens a Ledger over the single shared store

use crate::cards::ScrapedCard;
use crate::db::BadgeStore;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::points::points_table;
use crate::tools::{call_tool, tool_definitions};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<BadgeStore>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message),
    };
    (status, Json(body)).into_response()
}

fn ledger_error_response(err: LedgerError) -> Response {
    match err {
        LedgerError::InvalidInput(_) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        LedgerError::StorageUnavailable(_) => {
            error!("storage error: {}", err);
            error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        LedgerError::Internal(_) => {
            error!("internal error: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Lock the store, run `f` over a ledger, wrap the outcome.
fn with_ledger<T, F>(state: &AppState, f: F) -> Response
where
    T: Serialize,
    F: FnOnce(&Ledger<'_>) -> LedgerResult<T>,
{
    let store = match state.store.lock() {
        Ok(store) => store,
        Err(_) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "badge store lock poisoned".to_string(),
            )
        }
    };

    match f(&Ledger::new(&store)) {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => ledger_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct NameQuery {
    name: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/badges - All badges, points desc then name
async fn list_badges(State(state): State<AppState>) -> Response {
    with_ledger(&state, |ledger| ledger.certifications())
}

/// POST /api/badges - Record one scraped card
async fn record_badge(State(state): State<AppState>, Json(card): Json<ScrapedCard>) -> Response {
    with_ledger(&state, |ledger| {
        let inserted = ledger.record_badge(&card.name, &card.raw_text)?;
        Ok(json!({ "inserted": inserted }))
    })
}

/// GET /api/total - Total points of valid badges
async fn total_points(State(state): State<AppState>) -> Response {
    with_ledger(&state, |ledger| {
        Ok(json!({ "total_points": ledger.total_points()? }))
    })
}

/// GET /api/breakdown - Per-tier counts and valid points
async fn category_breakdown(State(state): State<AppState>) -> Response {
    with_ledger(&state, |ledger| ledger.category_breakdown())
}

/// GET /api/classify?name=
async fn classify(State(state): State<AppState>, Query(query): Query<NameQuery>) -> Response {
    with_ledger(&state, |ledger| ledger.classify_and_score(&query.name))
}

/// GET /api/preview?name=
async fn preview(State(state): State<AppState>, Query(query): Query<NameQuery>) -> Response {
    with_ledger(&state, |ledger| ledger.preview_certification(&query.name))
}

/// GET /api/points-table
async fn get_points_table() -> impl IntoResponse {
    Json(ApiResponse::ok(points_table()))
}

/// GET /api/tools - Tool definitions
async fn list_tools() -> impl IntoResponse {
    Json(ApiResponse::ok(tool_definitions()))
}

/// POST /api/tools/:name - Dispatch a tool call
async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Response {
    with_ledger(&state, |ledger| call_tool(ledger, &name, &args))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(store: BadgeStore) -> Router {
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/badges", get(list_badges).post(record_badge))
        .route("/total", get(total_points))
        .route("/breakdown", get(category_breakdown))
        .route("/classify", get(classify))
        .route("/preview", get(preview))
        .route("/points-table", get(get_points_table))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(invoke_tool))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
