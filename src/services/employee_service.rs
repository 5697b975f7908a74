use chrono::NaiveDate;
use sea_orm::ActiveValue::Set;
use std::sync::Arc;

use crate::cache::EntityCaches;
use crate::errors::internal::DirectoryError;
use crate::errors::InternalError;
use crate::stores::{DepartmentStore, EmployeeStore};
use crate::types::db::employee;
use crate::types::dto::employee::{
    CreateEmployeeRequest, EmployeeResponse, UpdateEmployeeRequest,
};

const VALID_STATUSES: [&str; 3] = ["ACTIVE", "INACTIVE", "TERMINATED"];

/// Default result cap for unpaginated list queries
const LIST_LIMIT: u64 = 500;

/// CRUD over employee records with cooperative read-through caching
pub struct EmployeeService {
    employee_store: Arc<EmployeeStore>,
    department_store: Arc<DepartmentStore>,
    caches: Arc<EntityCaches>,
}

impl EmployeeService {
    pub fn new(
        employee_store: Arc<EmployeeStore>,
        department_store: Arc<DepartmentStore>,
        caches: Arc<EntityCaches>,
    ) -> Self {
        Self {
            employee_store,
            department_store,
            caches,
        }
    }

    pub async fn get_all(
        &self,
        search: Option<&str>,
        department_id: Option<i64>,
    ) -> Result<Vec<EmployeeResponse>, InternalError> {
        let rows = self
            .employee_store
            .list(search, department_id, LIST_LIMIT)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(employee, dept)| to_response(employee, dept.map(|d| d.name)))
            .collect())
    }

    /// Cached read by id; a miss loads from the store and populates the cache
    pub async fn get_by_id(&self, id: i64) -> Result<EmployeeResponse, InternalError> {
        if let Some(cached) = self.caches.get_employee(id).await {
            return Ok(cached);
        }

        let (employee, dept) = self
            .employee_store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound { id })?;

        let response = to_response(employee, dept.map(|d| d.name));
        self.caches.put_employee(id, response.clone()).await;
        Ok(response)
    }

    /// Create an employee; coarsely invalidates both employee caches
    pub async fn create(
        &self,
        request: CreateEmployeeRequest,
    ) -> Result<EmployeeResponse, InternalError> {
        let status = match request.status {
            Some(status) => validate_status(status)?,
            None => "ACTIVE".to_string(),
        };
        let hire_date = request.hire_date.as_deref().map(parse_date).transpose()?;

        // Check email uniqueness up front for a clean 400 instead of a
        // constraint violation
        if self.employee_store.find_by_email(&request.email).await?.is_some() {
            return Err(InternalError::Directory(
                DirectoryError::DuplicateEmployeeEmail {
                    email: request.email,
                },
            ));
        }

        let department = match request.department_id {
            Some(department_id) => Some(
                self.department_store
                    .find_by_id(department_id)
                    .await?
                    .ok_or(DirectoryError::DepartmentNotFound { id: department_id })?,
            ),
            None => None,
        };

        let new_employee = employee::ActiveModel {
            name: Set(request.name),
            email: Set(request.email),
            employee_code: Set(request.employee_code),
            status: Set(status),
            phone_number: Set(request.phone_number),
            address: Set(request.address),
            hire_date: Set(hire_date),
            salary: Set(request.salary),
            job_title: Set(request.job_title),
            department_id: Set(request.department_id),
            ..Default::default()
        };

        let saved = self.employee_store.insert(new_employee).await?;
        self.caches.on_employee_created();

        Ok(to_response(saved, department.map(|d| d.name)))
    }

    /// Partial update; evicts the employee's cache entries by id
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEmployeeRequest,
    ) -> Result<EmployeeResponse, InternalError> {
        let (current, _) = self
            .employee_store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound { id })?;

        let mut changes = employee::ActiveModel::default();
        if let Some(name) = request.name {
            changes.name = Set(name);
        }
        if let Some(email) = request.email {
            changes.email = Set(email);
        }
        if let Some(employee_code) = request.employee_code {
            changes.employee_code = Set(Some(employee_code));
        }
        if let Some(status) = request.status {
            changes.status = Set(validate_status(status)?);
        }
        if let Some(phone_number) = request.phone_number {
            changes.phone_number = Set(Some(phone_number));
        }
        if let Some(address) = request.address {
            changes.address = Set(Some(address));
        }
        if let Some(hire_date) = request.hire_date.as_deref() {
            changes.hire_date = Set(Some(parse_date(hire_date)?));
        }
        if let Some(salary) = request.salary {
            changes.salary = Set(Some(salary));
        }
        if let Some(job_title) = request.job_title {
            changes.job_title = Set(Some(job_title));
        }
        if let Some(department_id) = request.department_id {
            self.department_store
                .find_by_id(department_id)
                .await?
                .ok_or(DirectoryError::DepartmentNotFound { id: department_id })?;
            changes.department_id = Set(Some(department_id));
        }

        let updated = self
            .employee_store
            .update(id, current.version, changes)
            .await?;
        self.caches.on_employee_changed(id).await;

        let department_name = match updated.department_id {
            Some(department_id) => self
                .department_store
                .find_by_id(department_id)
                .await?
                .map(|d| d.name),
            None => None,
        };

        Ok(to_response(updated, department_name))
    }

    /// Delete by id; evicts the employee's cache entries
    pub async fn delete(&self, id: i64) -> Result<(), InternalError> {
        let deleted = self.employee_store.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(InternalError::Directory(DirectoryError::EmployeeNotFound {
                id,
            }));
        }

        self.caches.on_employee_changed(id).await;
        Ok(())
    }

    /// Cached list of a department's employees
    pub async fn get_by_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<EmployeeResponse>, InternalError> {
        if let Some(cached) = self.caches.get_department_employees(department_id).await {
            return Ok(cached);
        }

        let department = self
            .department_store
            .find_by_id(department_id)
            .await?
            .ok_or(DirectoryError::DepartmentNotFound { id: department_id })?;

        let employees = self.employee_store.find_by_department(department_id).await?;
        let responses: Vec<EmployeeResponse> = employees
            .into_iter()
            .map(|employee| to_response(employee, Some(department.name.clone())))
            .collect();

        self.caches
            .put_department_employees(department_id, responses.clone())
            .await;
        Ok(responses)
    }

    /// Status-only update without loading the full row first
    pub async fn update_status(
        &self,
        id: i64,
        status: String,
    ) -> Result<EmployeeResponse, InternalError> {
        let status = validate_status(status)?;

        let updated = self.employee_store.update_status(id, &status).await?;
        if updated == 0 {
            return Err(InternalError::Directory(DirectoryError::EmployeeNotFound {
                id,
            }));
        }

        self.caches.on_employee_changed(id).await;

        let (employee, dept) = self
            .employee_store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::EmployeeNotFound { id })?;
        Ok(to_response(employee, dept.map(|d| d.name)))
    }
}

fn validate_status(status: String) -> Result<String, InternalError> {
    if VALID_STATUSES.contains(&status.as_str()) {
        Ok(status)
    } else {
        Err(InternalError::Directory(DirectoryError::InvalidStatus {
            status,
        }))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, InternalError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        InternalError::Directory(DirectoryError::InvalidDate {
            value: value.to_string(),
            message: e.to_string(),
        })
    })
}

/// Map a database row to its response model
pub fn to_response(employee: employee::Model, department_name: Option<String>) -> EmployeeResponse {
    EmployeeResponse {
        id: employee.id,
        name: employee.name,
        email: employee.email,
        employee_code: employee.employee_code,
        status: employee.status,
        phone_number: employee.phone_number,
        address: employee.address,
        hire_date: employee.hire_date.map(|d| d.to_string()),
        salary: employee.salary,
        job_title: employee.job_title,
        department_id: employee.department_id,
        department_name,
        created_at: employee.created_at,
        updated_at: employee.updated_at,
        version: employee.version,
    }
}
