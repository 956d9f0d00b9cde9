use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The pending calendar event payload carried through the authorization
/// redirect round-trip. Exists only between "authorization requested" and
/// "callback received".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEvent {
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}
