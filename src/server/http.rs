use crate::app::dto::*;
use crate::app::engine::LineageEngine;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct HttpState {
    pub engine: LineageEngine,
}

#[derive(Debug, Clone, serde::Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

pub fn build_router(engine: LineageEngine) -> Router {
    let state = Arc::new(HttpState { engine });

    Router::new()
        .route("/health", get(health))
        .route("/graph", get(graph))
        .route("/impact", post(impact))
        .route("/reload", post(reload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(engine: LineageEngine, addr: SocketAddr) -> Result<()> {
    let app = build_router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving lineage graph on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.engine.health())
}

async fn graph(
    State(state): State<Arc<HttpState>>,
    Query(q): Query<GraphRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.graph(q)).await {
        Ok(res) => Json(res).into_response(),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}

async fn impact(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<ImpactRequest>,
) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.impact(req)).await {
        Ok(Ok(res)) => Json(res).into_response(),
        Ok(Err(e)) => api_error(StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}

async fn reload(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let engine = state.engine.clone();
    match spawn_blocking(move || engine.reload()).await {
        Ok(Ok(res)) => Json(res).into_response(),
        Ok(Err(e)) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::record::{FieldRef, LineageRecord, RefField};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_engine() -> LineageEngine {
        let records = vec![LineageRecord::with_refs(
            FieldRef::positioned(1, 0, "dw.orders.user_id"),
            vec![RefField::labeled(FieldRef::positioned(0, 0, "ods.users.id"), "copy")],
        )];
        LineageEngine::from_records("records.json".into(), &records, AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_http_health_graph_and_impact() {
        let app = build_router(make_engine());

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/graph?mode=table")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = serde_json::json!({
          "node": "orders_1-0",
          "anchor": "user_id",
          "direction": "upstream"
        });

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/impact")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_http_impact_unknown_node_is_bad_request() {
        let app = build_router(make_engine());
        let body = serde_json::json!({ "node": "ghost" });

        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/impact")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
