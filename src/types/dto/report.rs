use poem_openapi::Object;

use crate::types::dto::employee::EmployeeResponse;

/// Response model for a manually triggered employee report
#[derive(Object, Debug)]
pub struct ReportRunResponse {
    /// The date the report covers (YYYY-MM-DD)
    pub date: String,

    /// Number of employees added on that date
    pub employee_count: usize,

    /// Employees added on that date
    pub employees: Vec<EmployeeResponse>,
}

/// Response model describing the daily report schedule
#[derive(Object, Debug)]
pub struct SchedulerInfoResponse {
    /// Whether the daily report job is enabled
    pub enabled: bool,

    /// Hour of day the job fires (UTC)
    pub hour: u8,

    /// Minute of hour the job fires
    pub minute: u8,

    /// Configured report recipient
    pub recipient: String,
}
