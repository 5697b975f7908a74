use chrono::NaiveDate;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{self, STAFF_ROLES};
use crate::api::BearerAuth;
use crate::config::Settings;
use crate::errors::ApiError;
use crate::services::{AuthorityResolver, ReportService, TokenService};
use crate::types::dto::report::{ReportRunResponse, SchedulerInfoResponse};

/// Report endpoints, gated to ADMIN and HR roles
pub struct ReportsApi {
    token_service: Arc<TokenService>,
    authority_resolver: Arc<dyn AuthorityResolver>,
    report_service: Arc<ReportService>,
    settings: Arc<Settings>,
}

impl ReportsApi {
    pub fn new(
        token_service: Arc<TokenService>,
        authority_resolver: Arc<dyn AuthorityResolver>,
        report_service: Arc<ReportService>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            token_service,
            authority_resolver,
            report_service,
            settings,
        }
    }

    async fn authorize(&self, auth: &BearerAuth) -> Result<(), ApiError> {
        helpers::authorize(
            &self.token_service,
            self.authority_resolver.as_ref(),
            &auth.0.token,
            &STAFF_ROLES,
        )
        .await
    }
}

/// API tags for report endpoints
#[derive(Tags)]
enum ApiTags {
    /// Employee report endpoints
    Reports,
}

#[OpenApi(prefix_path = "/reports")]
impl ReportsApi {
    /// Trigger a one-off employee report for a date (YYYY-MM-DD)
    #[oai(
        path = "/employees/date/:date",
        method = "post",
        tag = "ApiTags::Reports"
    )]
    async fn run_for_date(
        &self,
        auth: BearerAuth,
        date: Path<String>,
    ) -> Result<Json<ReportRunResponse>, ApiError> {
        self.authorize(&auth).await?;

        let date = NaiveDate::parse_from_str(&date.0, "%Y-%m-%d")
            .map_err(|e| ApiError::bad_request(format!("Invalid date {}: {}", date.0, e)))?;

        let employees = self
            .report_service
            .send_report_for_date(date, &self.settings.report_recipient)
            .await?;

        Ok(Json(ReportRunResponse {
            date: date.to_string(),
            employee_count: employees.len(),
            employees,
        }))
    }

    /// Describe the daily report schedule
    #[oai(path = "/scheduler/info", method = "get", tag = "ApiTags::Reports")]
    async fn scheduler_info(&self, auth: BearerAuth) -> Result<Json<SchedulerInfoResponse>, ApiError> {
        self.authorize(&auth).await?;

        Ok(Json(SchedulerInfoResponse {
            enabled: self.settings.scheduler_enabled,
            hour: self.settings.scheduler_hour,
            minute: self.settings.scheduler_minute,
            recipient: self.settings.report_recipient.clone(),
        }))
    }
}
