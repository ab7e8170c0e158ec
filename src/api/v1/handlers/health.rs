/*
 * Responsibility
 * - GET /health (疎通用、bearer は通さない)
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "assets": state.assets.backend_name() }))
}
