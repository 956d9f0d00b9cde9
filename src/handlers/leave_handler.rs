use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{models::LeaveRequestInput, AppResult, AppState};

/// POST /api/leave-request
///
/// Validates the request against the employee's remaining balance for the
/// chosen category and decrements it on success. Calendar mirroring is a
/// separate, client-initiated step through the authorization flow.
#[utoipa::path(
    post,
    path = "/api/leave-request",
    request_body = LeaveRequestInput,
    responses(
        (status = 200, description = "Leave approved and balance decremented"),
        (status = 400, description = "Insufficient balance or invalid date range"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Roster read/write failure")
    ),
    tag = "leave"
)]
pub async fn submit_leave_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LeaveRequestInput>,
) -> AppResult<Json<Value>> {
    state.ledger.submit(&request).await?;
    Ok(Json(json!({
        "message": "Leave request approved and remaining leave updated"
    })))
}
