use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{self, ANY_AUTHENTICATED};
use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::{AuthorityResolver, DepartmentService, TokenService};
use crate::types::dto::department::{DepartmentRequest, DepartmentResponse};

/// Department endpoints, open to any authenticated identity
pub struct DepartmentsApi {
    token_service: Arc<TokenService>,
    authority_resolver: Arc<dyn AuthorityResolver>,
    department_service: Arc<DepartmentService>,
}

impl DepartmentsApi {
    pub fn new(
        token_service: Arc<TokenService>,
        authority_resolver: Arc<dyn AuthorityResolver>,
        department_service: Arc<DepartmentService>,
    ) -> Self {
        Self {
            token_service,
            authority_resolver,
            department_service,
        }
    }

    async fn authorize(&self, auth: &BearerAuth) -> Result<(), ApiError> {
        helpers::authorize(
            &self.token_service,
            self.authority_resolver.as_ref(),
            &auth.0.token,
            &ANY_AUTHENTICATED,
        )
        .await
    }
}

/// API tags for department endpoints
#[derive(Tags)]
enum ApiTags {
    /// Department management endpoints
    Departments,
}

#[OpenApi(prefix_path = "/departments")]
impl DepartmentsApi {
    /// List all departments
    #[oai(path = "/", method = "get", tag = "ApiTags::Departments")]
    async fn list(&self, auth: BearerAuth) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
        self.authorize(&auth).await?;

        let departments = self.department_service.get_all().await?;
        Ok(Json(departments))
    }

    /// Get a single department by id
    #[oai(path = "/:id", method = "get", tag = "ApiTags::Departments")]
    async fn get(
        &self,
        auth: BearerAuth,
        id: Path<i64>,
    ) -> Result<Json<DepartmentResponse>, ApiError> {
        self.authorize(&auth).await?;

        let department = self.department_service.get_by_id(id.0).await?;
        Ok(Json(department))
    }

    /// Create a new department
    #[oai(path = "/", method = "post", tag = "ApiTags::Departments")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<DepartmentRequest>,
    ) -> Result<Json<DepartmentResponse>, ApiError> {
        self.authorize(&auth).await?;

        let department = self.department_service.create(body.0).await?;
        Ok(Json(department))
    }

    /// Update a department
    #[oai(path = "/:id", method = "put", tag = "ApiTags::Departments")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<i64>,
        body: Json<DepartmentRequest>,
    ) -> Result<Json<DepartmentResponse>, ApiError> {
        self.authorize(&auth).await?;

        let department = self.department_service.update(id.0, body.0).await?;
        Ok(Json(department))
    }

    /// Delete a department
    #[oai(path = "/:id", method = "delete", tag = "ApiTags::Departments")]
    async fn delete(&self, auth: BearerAuth, id: Path<i64>) -> Result<(), ApiError> {
        self.authorize(&auth).await?;

        self.department_service.delete(id.0).await?;
        Ok(())
    }
}
