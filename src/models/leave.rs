use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use super::LeaveCategory;

/// A leave request as submitted by the client. Transient: it is validated
/// against the employee's remaining balance and consumed immediately, never
/// persisted on its own.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub employee_id: String,
    pub leave_type: LeaveCategory,
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}
