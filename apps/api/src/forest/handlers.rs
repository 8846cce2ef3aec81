use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::forest::cache::layout_key;
use crate::forest::engine::LayoutSummary;
use crate::forest::tuning::ForestConfig;
use crate::models::creator::Creator;
use crate::state::AppState;

pub const CACHE_HEADER: &str = "x-layout-cache";

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub creators: Vec<Creator>,
}

fn check_size(state: &AppState, req: &LayoutRequest) -> Result<(), AppError> {
    if req.creators.len() > state.config.max_creators {
        return Err(AppError::Validation(format!(
            "Too many creators: {} (maximum {})",
            req.creators.len(),
            state.config.max_creators
        )));
    }
    Ok(())
}

/// POST /api/v1/forest/layout
pub async fn handle_generate_layout(
    State(state): State<AppState>,
    Json(req): Json<LayoutRequest>,
) -> Result<Response, AppError> {
    check_size(&state, &req)?;

    let key = layout_key(&req.creators, state.engine.config());

    match state.layouts.get(&key).await {
        Ok(Some(layout)) => {
            debug!(key = %key, "Forest layout cache hit");
            return Ok(([(CACHE_HEADER, "hit")], Json(layout)).into_response());
        }
        Ok(None) => {}
        Err(e) => warn!(
            backend = state.layouts.backend(),
            "Forest layout cache read failed, regenerating: {e}"
        ),
    }

    // CPU-bound generation — spawn_blocking to avoid blocking the async executor.
    let engine = state.engine.clone();
    let creators = req.creators;
    let layout = tokio::task::spawn_blocking(move || engine.generate(&creators))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in forest layout: {e}"))
        })?;

    if let Err(e) = state.layouts.put(&key, &layout).await {
        warn!(
            backend = state.layouts.backend(),
            "Forest layout cache write failed: {e}"
        );
    }

    Ok(([(CACHE_HEADER, "miss")], Json(layout)).into_response())
}

/// POST /api/v1/forest/layout/stats
///
/// Diagnostics: runs the generator uncached and returns its counters.
pub async fn handle_layout_stats(
    State(state): State<AppState>,
    Json(req): Json<LayoutRequest>,
) -> Result<Json<LayoutSummary>, AppError> {
    check_size(&state, &req)?;

    let engine = state.engine.clone();
    let creators = req.creators;
    let summary = tokio::task::spawn_blocking(move || engine.generate_report(&creators).summary())
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in forest stats: {e}"))
        })?;

    Ok(Json(summary))
}

/// GET /api/v1/forest/config
pub async fn handle_get_config(State(state): State<AppState>) -> Json<ForestConfig> {
    Json(state.engine.config().clone())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::forest::assembly::ForestLayout;
    use crate::forest::cache::layout_key;
    use crate::forest::{ForestConfig, LayoutEngine, LayoutStore, MemoryLayoutStore};
    use crate::models::creator::Creator;
    use crate::routes::build_router;
    use crate::state::AppState;

    use super::CACHE_HEADER;

    fn make_app(max_creators: usize) -> (Router, Arc<MemoryLayoutStore>) {
        let store = Arc::new(MemoryLayoutStore::new(16));
        let state = AppState {
            config: Config {
                max_creators,
                ..Config::default()
            },
            engine: Arc::new(LayoutEngine::new(ForestConfig::default()).unwrap()),
            layouts: store.clone(),
        };
        (build_router(state), store)
    }

    fn layout_request(body: Value) -> Request<Body> {
        post_json("/api/v1/forest/layout", body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_layout_miss_then_hit() {
        let (app, store) = make_app(100);
        let body = json!({
            "creators": [
                { "id": "a", "name": "Alice" },
                { "id": "b", "name": "Bob" }
            ]
        });

        let first = app.clone().oneshot(layout_request(body.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[CACHE_HEADER], "miss");
        let first_json = read_json(first).await;
        assert_eq!(first_json["markers"].as_array().unwrap().len(), 2);
        assert!(first_json["containerHeight"].as_f64().unwrap() >= 900.0);
        let key = layout_key(
            &[Creator::new("a", "Alice"), Creator::new("b", "Bob")],
            &ForestConfig::default(),
        );
        assert!(store.get(&key).await.unwrap().is_some());

        let second = app.oneshot(layout_request(body)).await.unwrap();
        assert_eq!(second.headers()[CACHE_HEADER], "hit");
        assert_eq!(read_json(second).await, first_json);
    }

    #[tokio::test]
    async fn test_generate_layout_empty_list() {
        let (app, _) = make_app(100);
        let response = app
            .oneshot(layout_request(json!({ "creators": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let layout: ForestLayout = serde_json::from_value(read_json(response).await).unwrap();
        assert!(layout.markers.is_empty());
        assert_eq!(layout.container_height, 900.0);
    }

    #[tokio::test]
    async fn test_generate_layout_rejects_oversized_request() {
        let (app, store) = make_app(1);
        let body = json!({
            "creators": [
                { "id": "a", "name": "Alice" },
                { "id": "b", "name": "Bob" }
            ]
        });
        let response = app.oneshot(layout_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        let key = layout_key(
            &[Creator::new("a", "Alice"), Creator::new("b", "Bob")],
            &ForestConfig::default(),
        );
        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_layout_stats_reports_counters() {
        let (app, _) = make_app(100);
        let creators: Vec<Value> = (0..25)
            .map(|i| json!({ "id": format!("c{i}"), "name": format!("Creator {i}") }))
            .collect();
        let response = app
            .oneshot(post_json(
                "/api/v1/forest/layout/stats",
                json!({ "creators": creators }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CACHE_HEADER).is_none());
        let json = read_json(response).await;
        assert_eq!(json["creators"], 25);
        assert!(json["attempts"].as_u64().unwrap() >= 25);
        assert_eq!(json["bestEffort"], 0);
        assert!(json["minSpacingFactor"].as_f64().unwrap() <= 1.0);
    }

    #[tokio::test]
    async fn test_layout_stats_rejects_oversized_request() {
        let (app, _) = make_app(0);
        let response = app
            .oneshot(post_json(
                "/api/v1/forest/layout/stats",
                json!({ "creators": [{ "id": "a", "name": "Alice" }] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_layout_rejects_malformed_body() {
        let (app, _) = make_app(100);
        let response = app
            .oneshot(layout_request(json!({ "creators": [{ "id": 7 }] })))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_get_config_returns_tuning() {
        let (app, _) = make_app(100);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/forest/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["min_canvas_height"], 900.0);
        assert_eq!(json["image_variants"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = make_app(100);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ok");
    }
}
