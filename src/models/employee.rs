use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the three recognized leave categories.
///
/// The aliases accept the `annualLeave`-style spellings the original
/// settings UI submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveCategory {
    #[serde(alias = "annualLeave")]
    Annual,
    #[serde(alias = "sickLeave")]
    Sick,
    #[serde(alias = "personalLeave")]
    Personal,
}

impl LeaveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveCategory::Annual => "annual",
            LeaveCategory::Sick => "sick",
            LeaveCategory::Personal => "personal",
        }
    }
}

/// An employee roster record: identity plus an allotment and remaining
/// balance for each leave category. The settings surface may set a remaining
/// balance independently of the allotment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub annual_leave: u32,
    pub remaining_annual_leave: u32,
    pub sick_leave: u32,
    pub remaining_sick_leave: u32,
    pub personal_leave: u32,
    pub remaining_personal_leave: u32,
}

impl Employee {
    pub fn remaining(&self, category: LeaveCategory) -> u32 {
        match category {
            LeaveCategory::Annual => self.remaining_annual_leave,
            LeaveCategory::Sick => self.remaining_sick_leave,
            LeaveCategory::Personal => self.remaining_personal_leave,
        }
    }

    pub fn remaining_mut(&mut self, category: LeaveCategory) -> &mut u32 {
        match category {
            LeaveCategory::Annual => &mut self.remaining_annual_leave,
            LeaveCategory::Sick => &mut self.remaining_sick_leave,
            LeaveCategory::Personal => &mut self.remaining_personal_leave,
        }
    }
}
