use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::errors::internal::{DatabaseError, DirectoryError};
use crate::errors::InternalError;
use crate::types::db::{department, employee};

/// Data access for employee records
pub struct EmployeeStore {
    db: DatabaseConnection,
}

impl EmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<(employee::Model, Option<department::Model>)>, InternalError> {
        employee::Entity::find_by_id(id)
            .find_also_related(department::Entity)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_id", e))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<employee::Model>, InternalError> {
        employee::Entity::find()
            .filter(employee::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_email", e))
    }

    /// List employees with optional substring search and department filter
    ///
    /// The search matches name, email and employee code.
    pub async fn list(
        &self,
        search: Option<&str>,
        department_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<(employee::Model, Option<department::Model>)>, InternalError> {
        let mut query = employee::Entity::find().find_also_related(department::Entity);

        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(employee::Column::Name.contains(search))
                    .add(employee::Column::Email.contains(search))
                    .add(employee::Column::EmployeeCode.contains(search)),
            );
        }

        if let Some(department_id) = department_id {
            query = query.filter(employee::Column::DepartmentId.eq(department_id));
        }

        query
            .order_by_asc(employee::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_employees", e))
    }

    pub async fn find_by_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<employee::Model>, InternalError> {
        employee::Entity::find()
            .filter(employee::Column::DepartmentId.eq(department_id))
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employees_by_department", e))
    }

    pub async fn count_by_department(&self, department_id: i64) -> Result<u64, InternalError> {
        employee::Entity::find()
            .filter(employee::Column::DepartmentId.eq(department_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_employees_by_department", e))
    }

    /// Employees whose record was created within [start, end) epoch seconds
    pub async fn find_created_between(
        &self,
        start: i64,
        end: i64,
    ) -> Result<Vec<employee::Model>, InternalError> {
        employee::Entity::find()
            .filter(employee::Column::CreatedAt.gte(start))
            .filter(employee::Column::CreatedAt.lt(end))
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employees_created_between", e))
    }

    pub async fn insert(
        &self,
        mut employee: employee::ActiveModel,
    ) -> Result<employee::Model, InternalError> {
        let now = Utc::now().timestamp();
        employee.created_at = Set(now);
        employee.updated_at = Set(now);
        employee.version = Set(0);

        employee
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_employee", e))
    }

    /// Apply a version-guarded update with the changed columns already Set
    ///
    /// Callers must have loaded the row at `expected_version`; a concurrent
    /// writer that committed first surfaces as `VersionConflict`.
    pub async fn update(
        &self,
        id: i64,
        expected_version: i64,
        mut changes: employee::ActiveModel,
    ) -> Result<employee::Model, InternalError> {
        changes.updated_at = Set(Utc::now().timestamp());
        changes.version = Set(expected_version + 1);

        let result = employee::Entity::update_many()
            .set(changes)
            .filter(employee::Column::Id.eq(id))
            .filter(employee::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_employee", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::Database(DatabaseError::VersionConflict {
                entity: "employee",
                id,
            }));
        }

        let updated = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("reload_employee", e))?;

        updated.ok_or(InternalError::Directory(DirectoryError::EmployeeNotFound {
            id,
        }))
    }

    /// Direct status update without loading the row first
    ///
    /// Returns the number of rows changed; zero means the employee does not
    /// exist.
    pub async fn update_status(&self, id: i64, status: &str) -> Result<u64, InternalError> {
        let result = employee::Entity::update_many()
            .col_expr(employee::Column::Status, Expr::value(status))
            .col_expr(
                employee::Column::UpdatedAt,
                Expr::value(Utc::now().timestamp()),
            )
            .filter(employee::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_employee_status", e))?;

        Ok(result.rows_affected)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<u64, InternalError> {
        let result = employee::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_employee", e))?;

        Ok(result.rows_affected)
    }
}
