use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{self, STAFF_ROLES};
use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::{AuthorityResolver, EmployeeService, TokenService};
use crate::types::dto::employee::{
    CreateEmployeeRequest, EmployeeResponse, UpdateEmployeeRequest, UpdateEmployeeStatusRequest,
};

/// Employee management endpoints, gated to ADMIN and HR roles
pub struct EmployeesApi {
    token_service: Arc<TokenService>,
    authority_resolver: Arc<dyn AuthorityResolver>,
    employee_service: Arc<EmployeeService>,
}

impl EmployeesApi {
    pub fn new(
        token_service: Arc<TokenService>,
        authority_resolver: Arc<dyn AuthorityResolver>,
        employee_service: Arc<EmployeeService>,
    ) -> Self {
        Self {
            token_service,
            authority_resolver,
            employee_service,
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

/// API tags for employee endpoints
#[derive(Tags)]
enum ApiTags {
    /// Employee management endpoints
    Employees,
}

#[OpenApi(prefix_path = "/employees")]
impl EmployeesApi {
    /// List employees with optional search and department filter
    #[oai(path = "/", method = "get", tag = "ApiTags::Employees")]
    async fn list(
        &self,
        auth: BearerAuth,
        search: Query<Option<String>>,
        department_id: Query<Option<i64>>,
    ) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
        self.authorize(&auth).await?;

        let employees = self
            .employee_service
            .get_all(search.0.as_deref(), department_id.0)
            .await?;
        Ok(Json(employees))
    }

    /// Get a single employee by id
    #[oai(path = "/:id", method = "get", tag = "ApiTags::Employees")]
    async fn get(&self, auth: BearerAuth, id: Path<i64>) -> Result<Json<EmployeeResponse>, ApiError> {
        self.authorize(&auth).await?;

        let employee = self.employee_service.get_by_id(id.0).await?;
        Ok(Json(employee))
    }

    /// Create a new employee
    #[oai(path = "/", method = "post", tag = "ApiTags::Employees")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateEmployeeRequest>,
    ) -> Result<Json<EmployeeResponse>, ApiError> {
        self.authorize(&auth).await?;

        let employee = self.employee_service.create(body.0).await?;
        Ok(Json(employee))
    }

    /// Partially update an employee
    #[oai(path = "/:id", method = "put", tag = "ApiTags::Employees")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<i64>,
        body: Json<UpdateEmployeeRequest>,
    ) -> Result<Json<EmployeeResponse>, ApiError> {
        self.authorize(&auth).await?;

        let employee = self.employee_service.update(id.0, body.0).await?;
        Ok(Json(employee))
    }

    /// Delete an employee
    #[oai(path = "/:id", method = "delete", tag = "ApiTags::Employees")]
    async fn delete(&self, auth: BearerAuth, id: Path<i64>) -> Result<(), ApiError> {
        self.authorize(&auth).await?;

        self.employee_service.delete(id.0).await?;
        Ok(())
    }

    /// List the employees of a department
    #[oai(
        path = "/department/:department_id",
        method = "get",
        tag = "ApiTags::Employees"
    )]
    async fn by_department(
        &self,
        auth: BearerAuth,
        department_id: Path<i64>,
    ) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
        self.authorize(&auth).await?;

        let employees = self
            .employee_service
            .get_by_department(department_id.0)
            .await?;
        Ok(Json(employees))
    }

    /// Update only the employment status
    #[oai(path = "/:id/status", method = "patch", tag = "ApiTags::Employees")]
    async fn update_status(
        &self,
        auth: BearerAuth,
        id: Path<i64>,
        body: Json<UpdateEmployeeStatusRequest>,
    ) -> Result<Json<EmployeeResponse>, ApiError> {
        self.authorize(&auth).await?;

        let employee = self
            .employee_service
            .update_status(id.0, body.0.status)
            .await?;
        Ok(Json(employee))
    }
}
