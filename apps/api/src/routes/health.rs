use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness plus whether the reference table and the LLM are usable.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let table = state.table();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cycle-api",
        "industries_loaded": table.as_ref().map(|t| t.len()).unwrap_or(0),
        "data_source_ok": table.is_ok(),
        "llm_configured": state.llm.is_some(),
        "active_sessions": state.sessions.len(),
    }))
}
