//! HTTP API routes
//!
//! Defines all REST API endpoints for the server. Each page view creates a
//! session and then dispatches its actions against that session's id.

use crate::config::MapConfig;
use crate::error::Error;
use crate::format::{available_formats, get_formatter, url::UrlFormatter, FormatInfo};
use crate::server::state::AppState;
use crate::session::planning::PlanningUpdate;
use crate::session::{Controller, SessionSnapshot};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{debug, error};

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    // ./static if present, otherwise static/ next to the binary
    let static_path = if std::path::Path::new("static").exists() {
        "static".to_string()
    } else {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
            .filter(|path| path.exists())
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_else(|| "static".to_string())
    };

    Router::new()
        .route("/api/sessions", post(create_session_handler))
        .route(
            "/api/sessions/:id",
            get(session_handler).delete(delete_session_handler),
        )
        .route("/api/sessions/:id/points", post(add_point_handler))
        .route("/api/sessions/:id/points/manual", post(manual_point_handler))
        .route("/api/sessions/:id/optimize", post(optimize_handler))
        .route("/api/sessions/:id/clear", post(clear_handler))
        .route("/api/sessions/:id/planning", patch(planning_handler))
        .route("/api/sessions/:id/export", get(export_handler))
        .route("/api/map", get(map_handler))
        .route("/api/formats", get(formats_handler))
        .route("/api/status", get(status_handler))
        .fallback_service(ServeDir::new(&static_path).append_index_html_on_directories(true))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::CalculationInProgress => "CALCULATION_IN_PROGRESS",
            Error::SessionNotFound(_) => "NOT_FOUND",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Map a domain error to a status code and JSON body
fn reject(err: Error) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        Error::InsufficientPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::InvalidInput(_) | Error::InvalidCoordinates(_) | Error::Config(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::CalculationInProgress => StatusCode::CONFLICT,
        Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError::from(err)))
}

/// Session id plus its current state
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

async fn respond(id: String, controller: &Controller) -> Json<SessionResponse> {
    Json(SessionResponse {
        id,
        session: controller.snapshot().await,
    })
}

/// Start a session
///
/// POST /api/sessions
async fn create_session_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionResponse>) {
    let (id, controller) = state.create_session().await;
    debug!("Created session {}", id);
    (StatusCode::CREATED, respond(id.to_string(), &controller).await)
}

/// Get session state
///
/// GET /api/sessions/:id
async fn session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let controller = state.session(&id).await.map_err(reject)?;
    Ok(respond(id, &controller).await)
}

/// End a session
///
/// DELETE /api/sessions/:id
async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.remove_session(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(reject(Error::SessionNotFound(id)))
    }
}

/// Map click request body
#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Add a clicked point
///
/// POST /api/sessions/:id/points
async fn add_point_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<PointRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let controller = state.session(&id).await.map_err(reject)?;
    controller.add_point(req.lat, req.lng).await.map_err(reject)?;
    Ok(respond(id, &controller).await)
}

/// Manual entry request body; fields are raw text from the input boxes
#[derive(Debug, Deserialize)]
pub struct ManualPointRequest {
    pub lat: String,
    pub lng: String,
}

/// Add a manually typed point
///
/// POST /api/sessions/:id/points/manual
async fn manual_point_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ManualPointRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let controller = state.session(&id).await.map_err(reject)?;
    controller
        .add_point_from_text(&req.lat, &req.lng)
        .await
        .map_err(reject)?;
    Ok(respond(id, &controller).await)
}

/// Optimize query parameters
#[derive(Debug, Deserialize)]
pub struct OptimizeQuery {
    /// Wait for the result instead of returning while it computes
    #[serde(default)]
    pub wait: bool,
}

/// Run the placement
///
/// POST /api/sessions/:id/optimize
///
/// Returns 202 with `is_calculating` set; the result is published after the
/// configured latency. With `?wait=true` the response carries the result.
async fn optimize_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<OptimizeQuery>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let controller = state.session(&id).await.map_err(reject)?;

    if query.wait {
        controller.optimize().await.map_err(reject)?;
        return Ok((StatusCode::OK, respond(id, &controller).await));
    }

    let pending = controller.begin_optimize().await.map_err(reject)?;
    let accepted = respond(id, &controller).await;

    let task = controller.spawn_completion(pending);
    tokio::spawn(async move {
        match task.await {
            Ok(Err(e)) => error!("Background optimization failed: {}", e),
            Err(e) => error!("Background optimization task failed: {}", e),
            Ok(Ok(_)) => {}
        }
    });

    Ok((StatusCode::ACCEPTED, accepted))
}

/// Clear the session
///
/// POST /api/sessions/:id/clear
async fn clear_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let controller = state.session(&id).await.map_err(reject)?;
    controller.clear().await;
    Ok(respond(id, &controller).await)
}

/// Update planning inputs
///
/// PATCH /api/sessions/:id/planning
async fn planning_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<PlanningUpdate>,
) -> ApiResult<Json<SessionResponse>> {
    let controller = state.session(&id).await.map_err(reject)?;
    let session = controller.update_planning(update).await;
    Ok(Json(SessionResponse { id, session }))
}

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
    /// URL provider, for the url format
    pub provider: Option<String>,
}

/// Export the session in one of the output formats
///
/// GET /api/sessions/:id/export?format=gpx
async fn export_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let controller = state.session(&id).await.map_err(reject)?;
    let config = state.config.read().await.clone();

    let format = query.format.unwrap_or_else(|| config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| reject(Error::Config(format!("Unknown format: {}", format))))?;

    let snapshot = controller.snapshot().await;
    let body = match query.provider.as_deref() {
        Some(provider) if formatter.name() == "url" => {
            UrlFormatter.format_with_provider(&snapshot, &config, Some(provider))
        }
        _ => formatter.format(&snapshot, &config),
    }
    .map_err(reject)?;

    let content_type = formatter.content_type().to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Map display settings
///
/// GET /api/map
async fn map_handler(State(state): State<Arc<AppState>>) -> Json<MapConfig> {
    Json(state.config.read().await.map.clone())
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub sessions: usize,
    pub uptime_secs: u64,
    pub latency_ms: u64,
    pub stale_results: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let config = state.config.read().await;
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.session_count().await,
        uptime_secs: state.uptime_secs(),
        latency_ms: config.optimizer.latency_ms,
        stale_results: config.optimizer.stale_results.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::coord::Coordinates;
    use crate::session::ControllerSettings;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn create_test_state() -> Arc<AppState> {
        let mut config = Config::default();
        config.optimizer.latency_ms = 0;
        Arc::new(AppState::new(config).unwrap())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let response = send(app, "POST", "/api/sessions", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: SessionResponse = read_json(response).await;
        assert!(created.session.points.is_empty());
        created.id
    }

    async fn add_points(app: &Router, id: &str, points: &[(f64, f64)]) {
        for &(lat, lng) in points {
            let response = send(
                app,
                "POST",
                &format!("/api/sessions/{}/points", id),
                Some(serde_json::json!({ "lat": lat, "lng": lng })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    const SQUARE: [(f64, f64); 5] = [(0.0, 0.0), (0.0, 3.0), (3.0, 0.0), (3.0, 3.0), (1.5, 1.5)];

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state());
        new_session(&app).await;

        let response = send(&app, "GET", "/api/status", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let status: StatusResponse = read_json(response).await;
        assert!(status.running);
        assert_eq!(status.sessions, 1);
        assert_eq!(status.latency_ms, 0);
    }

    #[tokio::test]
    async fn test_map_endpoint() {
        let app = create_router(create_test_state());
        let response = send(&app, "GET", "/api/map", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let map: MapConfig = read_json(response).await;
        assert_eq!(map.zoom, 6);
        assert!(map.tile_url.contains("{z}/{x}/{y}"));
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let app = create_router(create_test_state());
        let response = send(&app, "GET", "/api/formats", None).await;
        let formats: FormatsResponse = read_json(response).await;
        assert_eq!(formats.formats.len(), 4);
    }

    #[tokio::test]
    async fn test_optimize_and_wait() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;
        add_points(&app, &id, &SQUARE).await;

        let response = send(&app, "POST", &format!("/api/sessions/{}/optimize?wait=true", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let result: SessionResponse = read_json(response).await;
        assert_eq!(result.session.centroids, vec![Coordinates::new(1.5, 1.5)]);
        assert_eq!(result.session.stats.total_grids, 1);
        assert_eq!(result.session.stats.estimated_coverage, 12.0);
        assert_eq!(result.session.region.area_km2, 15.0);
        assert_eq!(result.session.region.population, 1800.0);
        assert_eq!(result.session.details.efficiency, "Optimized");
    }

    #[tokio::test]
    async fn test_optimize_in_background() {
        let state = create_test_state();
        let app = create_router(state.clone());
        let id = new_session(&app).await;
        add_points(&app, &id, &SQUARE).await;

        let response = send(&app, "POST", &format!("/api/sessions/{}/optimize", id), None).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let accepted: SessionResponse = read_json(response).await;
        assert!(accepted.session.is_calculating);

        let controller = state.session(&id).await.unwrap();
        while controller.snapshot().await.is_calculating {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.snapshot().await.stats.total_grids, 1);
    }

    #[tokio::test]
    async fn test_optimize_insufficient_points() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;
        add_points(&app, &id, &SQUARE[..2]).await;

        let response = send(&app, "POST", &format!("/api/sessions/{}/optimize", id), None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err: ApiError = read_json(response).await;
        assert_eq!(err.code, "INSUFFICIENT_POINTS");

        let response = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        let session: SessionResponse = read_json(response).await;
        assert!(session.session.centroids.is_empty());
        assert!(!session.session.is_calculating);
    }

    #[tokio::test]
    async fn test_optimize_while_calculating_conflicts() {
        let mut config = Config::default();
        config.optimizer.latency_ms = 60_000;
        let settings = ControllerSettings::from_config(&config).unwrap();
        let state = Arc::new(AppState::with_settings(config, settings));
        let app = create_router(state);
        let id = new_session(&app).await;
        add_points(&app, &id, &SQUARE).await;

        let first = send(&app, "POST", &format!("/api/sessions/{}/optimize", id), None).await;
        assert_eq!(first.status(), StatusCode::ACCEPTED);

        let second = send(&app, "POST", &format!("/api/sessions/{}/optimize", id), None).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let err: ApiError = read_json(second).await;
        assert_eq!(err.code, "CALCULATION_IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_manual_point_invalid() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;

        let response = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/points/manual", id),
            Some(serde_json::json!({ "lat": "abc", "lng": "1.0" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = read_json(response).await;
        assert_eq!(err.code, "INVALID_INPUT");

        let response = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/points/manual", id),
            Some(serde_json::json!({ "lat": "5.6037", "lng": "-0.1870" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let session: SessionResponse = read_json(response).await;
        assert_eq!(session.session.points, vec![Coordinates::new(5.6037, -0.187)]);
    }

    #[tokio::test]
    async fn test_clear() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;
        add_points(&app, &id, &SQUARE).await;
        send(&app, "POST", &format!("/api/sessions/{}/optimize?wait=true", id), None).await;

        let response = send(&app, "POST", &format!("/api/sessions/{}/clear", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let session: SessionResponse = read_json(response).await;
        assert!(session.session.points.is_empty());
        assert!(session.session.centroids.is_empty());
        assert_eq!(session.session.stats.total_grids, 0);
    }

    #[tokio::test]
    async fn test_planning_update() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;

        let response = send(
            &app,
            "PATCH",
            &format!("/api/sessions/{}/planning", id),
            Some(serde_json::json!({ "grid_type": "custom", "custom_grid_type": "solar + storage" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let session: SessionResponse = read_json(response).await;
        assert_eq!(session.session.details.grid_type, "solar + storage");
    }

    #[tokio::test]
    async fn test_export_gpx() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;
        add_points(&app, &id, &SQUARE).await;
        send(&app, "POST", &format!("/api/sessions/{}/optimize?wait=true", id), None).await;

        let response = send(&app, "GET", &format!("/api/sessions/{}/export?format=gpx", id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/gpx+xml"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("<name>Grid 1</name>"));
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let app = create_router(create_test_state());
        let id = new_session(&app).await;
        let response = send(&app, "GET", &format!("/api/sessions/{}/export?format=kml", id), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_session() {
        let app = create_router(create_test_state());

        let response = send(&app, "GET", "/api/sessions/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let id = new_session(&app).await;
        let response = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let err: ApiError = read_json(response).await;
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let app = create_router(create_test_state());
        let a = new_session(&app).await;
        let b = new_session(&app).await;
        add_points(&app, &a, &SQUARE).await;

        let response = send(&app, "GET", &format!("/api/sessions/{}", b), None).await;
        let session: SessionResponse = read_json(response).await;
        assert!(session.session.points.is_empty());
    }
}
