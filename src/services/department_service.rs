use sea_orm::ActiveValue::Set;
use std::sync::Arc;

use crate::cache::EntityCaches;
use crate::errors::internal::DirectoryError;
use crate::errors::InternalError;
use crate::stores::{DepartmentStore, EmployeeStore};
use crate::types::db::department;
use crate::types::dto::department::{DepartmentRequest, DepartmentResponse};

/// CRUD over department records with cooperative read-through caching
pub struct DepartmentService {
    department_store: Arc<DepartmentStore>,
    employee_store: Arc<EmployeeStore>,
    caches: Arc<EntityCaches>,
}

impl DepartmentService {
    pub fn new(
        department_store: Arc<DepartmentStore>,
        employee_store: Arc<EmployeeStore>,
        caches: Arc<EntityCaches>,
    ) -> Self {
        Self {
            department_store,
            employee_store,
            caches,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<DepartmentResponse>, InternalError> {
        let departments = self.department_store.list_all().await?;

        let mut responses = Vec::with_capacity(departments.len());
        for department in departments {
            let head_count = self.effective_head_count(&department).await?;
            responses.push(to_response(department, head_count));
        }
        Ok(responses)
    }

    /// Cached read by id; a miss loads from the store and populates the cache
    pub async fn get_by_id(&self, id: i64) -> Result<DepartmentResponse, InternalError> {
        if let Some(cached) = self.caches.get_department(id).await {
            return Ok(cached);
        }

        let department = self
            .department_store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DepartmentNotFound { id })?;

        let head_count = self.effective_head_count(&department).await?;
        let response = to_response(department, head_count);
        self.caches.put_department(id, response.clone()).await;
        Ok(response)
    }

    /// Create a department; the whole departments cache is distrusted because
    /// a new row may affect aggregate views
    pub async fn create(
        &self,
        request: DepartmentRequest,
    ) -> Result<DepartmentResponse, InternalError> {
        // Check name uniqueness up front for a clean 400 instead of a
        // constraint violation
        if self
            .department_store
            .find_by_name(&request.name)
            .await?
            .is_some()
        {
            return Err(InternalError::Directory(
                DirectoryError::DuplicateDepartmentName { name: request.name },
            ));
        }

        let new_department = department::ActiveModel {
            name: Set(request.name),
            description: Set(request.description),
            location: Set(request.location),
            budget: Set(request.budget),
            head_count: Set(0),
            ..Default::default()
        };

        let saved = self.department_store.insert(new_department).await?;
        self.caches.on_department_created();

        Ok(to_response(saved, 0))
    }

    /// Partial update; recomputes head count and evicts the cache entry
    pub async fn update(
        &self,
        id: i64,
        request: DepartmentRequest,
    ) -> Result<DepartmentResponse, InternalError> {
        let current = self
            .department_store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::DepartmentNotFound { id })?;

        let head_count = self.employee_store.count_by_department(id).await? as i64;

        let mut changes = department::ActiveModel {
            name: Set(request.name),
            head_count: Set(head_count),
            ..Default::default()
        };
        if let Some(description) = request.description {
            changes.description = Set(Some(description));
        }
        if let Some(location) = request.location {
            changes.location = Set(Some(location));
        }
        if let Some(budget) = request.budget {
            changes.budget = Set(Some(budget));
        }

        let updated = self
            .department_store
            .update(id, current.version, changes)
            .await?;
        self.caches.on_department_changed(id).await;

        Ok(to_response(updated, head_count))
    }

    /// Delete by id; evicts the department entry, its roster and the
    /// employee cache entries the FK set-null just invalidated
    pub async fn delete(&self, id: i64) -> Result<(), InternalError> {
        let deleted = self.department_store.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(InternalError::Directory(
                DirectoryError::DepartmentNotFound { id },
            ));
        }

        self.caches.on_department_deleted(id).await;
        Ok(())
    }

    /// Stored head count, recomputed from the employee table when unset
    async fn effective_head_count(
        &self,
        department: &department::Model,
    ) -> Result<i64, InternalError> {
        if department.head_count > 0 {
            return Ok(department.head_count);
        }
        Ok(self.employee_store.count_by_department(department.id).await? as i64)
    }
}

fn to_response(department: department::Model, head_count: i64) -> DepartmentResponse {
    DepartmentResponse {
        id: department.id,
        name: department.name,
        description: department.description,
        location: department.location,
        budget: department.budget,
        head_count,
        created_at: department.created_at,
        updated_at: department.updated_at,
        version: department.version,
    }
}
