use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

/// Liveness plus a readiness hint: whether the roster file is currently
/// readable. A missing or unreadable roster leaves the flow endpoints up but
/// every leave operation failing, which is worth surfacing here.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; payload reports roster readability")
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let roster_readable = state.ledger.list_employees().await.is_ok();

    Json(json!({
        "status": "ok",
        "service": "leavedesk",
        "rosterReadable": roster_readable
    }))
}
