// SPDX-License-Identifier: MIT

//! HTTP evaluation service
//!
//! One table is loaded at startup and shared by every request; each request
//! evaluates against its own fact store.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::{DecisionTable, Facts};
use crate::error::Result;

/// Build the service router for a loaded table
pub fn router(table: Arc<DecisionTable>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/table", get(describe_table))
        .route("/api/evaluate", post(evaluate_facts))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(table)
}

pub async fn serve(table: Arc<DecisionTable>, host: &str, port: u16) -> Result<()> {
    let app = router(table);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn describe_table(State(table): State<Arc<DecisionTable>>) -> Json<Value> {
    Json(json!({
        "inputs": table.inputs(),
        "outputs": table.outputs(),
        "row_count": table.len(),
        "rows": table.rows(),
    }))
}

async fn evaluate_facts(
    State(table): State<Arc<DecisionTable>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let facts = match Facts::from_json(&payload) {
        Ok(facts) => facts,
        Err(e) => {
            log::warn!("Rejected evaluation request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            );
        }
    };

    (StatusCode::OK, Json(table.decide(facts).to_json()))
}
