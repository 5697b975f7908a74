use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::services::employee_service::to_response;
use crate::stores::EmployeeStore;
use crate::types::dto::employee::EmployeeResponse;

/// Delivery seam for finished reports
///
/// Email transport and formatting live behind this trait; the default sink
/// writes the report summary to the log.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(
        &self,
        recipient: &str,
        date: NaiveDate,
        employees: &[EmployeeResponse],
    ) -> Result<(), InternalError>;
}

/// Sink that logs report summaries instead of mailing them
pub struct LogReportSink;

#[async_trait]
impl ReportSink for LogReportSink {
    async fn deliver(
        &self,
        recipient: &str,
        date: NaiveDate,
        employees: &[EmployeeResponse],
    ) -> Result<(), InternalError> {
        tracing::info!(
            recipient,
            date = %date,
            employee_count = employees.len(),
            "Employee report ready"
        );
        for employee in employees {
            tracing::info!(
                id = employee.id,
                name = %employee.name,
                email = %employee.email,
                "Report entry"
            );
        }
        Ok(())
    }
}

/// Builds the daily "employees added on date" report
pub struct ReportService {
    employee_store: Arc<EmployeeStore>,
    sink: Arc<dyn ReportSink>,
}

impl ReportService {
    pub fn new(employee_store: Arc<EmployeeStore>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            employee_store,
            sink,
        }
    }

    /// Employees whose record was created on the given UTC day
    pub async fn employees_added_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<EmployeeResponse>, InternalError> {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end = start + 24 * 60 * 60;

        let employees = self.employee_store.find_created_between(start, end).await?;
        Ok(employees
            .into_iter()
            .map(|employee| to_response(employee, None))
            .collect())
    }

    /// Build the report for a date and hand it to the sink
    ///
    /// An empty report is skipped rather than delivered, matching the daily
    /// job behavior.
    pub async fn send_report_for_date(
        &self,
        date: NaiveDate,
        recipient: &str,
    ) -> Result<Vec<EmployeeResponse>, InternalError> {
        tracing::info!(date = %date, "Fetching employees added on date");

        let employees = self.employees_added_on(date).await?;

        if employees.is_empty() {
            tracing::info!(date = %date, "No employees found for date, skipping report");
            return Ok(employees);
        }

        tracing::info!(
            date = %date,
            employee_count = employees.len(),
            recipient,
            "Sending employee report"
        );
        self.sink.deliver(recipient, date, &employees).await?;

        Ok(employees)
    }
}
