use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{models::Employee, AppResult, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteEmployeeQuery {
    pub id: String,
}

/// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "The full employee roster", body = Vec<Employee>),
        (status = 500, description = "Roster could not be read")
    ),
    tag = "employees"
)]
pub async fn get_employees(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Employee>>> {
    let employees = state.ledger.list_employees().await?;
    Ok(Json(employees))
}

/// POST /api/employees — full-collection replace, used by the leave settings
/// surface to edit allotments and balances.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = Vec<Employee>,
    responses(
        (status = 200, description = "Roster replaced"),
        (status = 500, description = "Roster could not be written")
    ),
    tag = "employees"
)]
pub async fn replace_employees(
    State(state): State<Arc<AppState>>,
    Json(employees): Json<Vec<Employee>>,
) -> AppResult<Json<Value>> {
    state.ledger.replace_roster(&employees).await?;
    Ok(Json(json!({ "message": "Employees updated successfully" })))
}

/// DELETE /api/employees?id=
#[utoipa::path(
    delete,
    path = "/api/employees",
    params(DeleteEmployeeQuery),
    responses(
        (status = 200, description = "Employee removed from the roster"),
        (status = 500, description = "Roster could not be rewritten")
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteEmployeeQuery>,
) -> AppResult<Json<Value>> {
    state.ledger.delete_employee(&query.id).await?;
    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}
