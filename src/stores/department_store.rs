use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::errors::internal::{DatabaseError, DirectoryError};
use crate::errors::InternalError;
use crate::types::db::department;

/// Data access for department records
pub struct DepartmentStore {
    db: DatabaseConnection,
}

impl DepartmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<department::Model>, InternalError> {
        department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_department_by_id", e))
    }

    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<department::Model>, InternalError> {
        department::Entity::find()
            .filter(department::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_department_by_name", e))
    }

    pub async fn list_all(&self) -> Result<Vec<department::Model>, InternalError> {
        department::Entity::find()
            .order_by_asc(department::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_departments", e))
    }

    pub async fn insert(
        &self,
        mut department: department::ActiveModel,
    ) -> Result<department::Model, InternalError> {
        let now = Utc::now().timestamp();
        department.created_at = Set(now);
        department.updated_at = Set(now);
        department.version = Set(0);

        department
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_department", e))
    }

    /// Apply a version-guarded update with the changed columns already Set
    pub async fn update(
        &self,
        id: i64,
        expected_version: i64,
        mut changes: department::ActiveModel,
    ) -> Result<department::Model, InternalError> {
        changes.updated_at = Set(Utc::now().timestamp());
        changes.version = Set(expected_version + 1);

        let result = department::Entity::update_many()
            .set(changes)
            .filter(department::Column::Id.eq(id))
            .filter(department::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_department", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::Database(DatabaseError::VersionConflict {
                entity: "department",
                id,
            }));
        }

        let updated = department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("reload_department", e))?;

        updated.ok_or(InternalError::Directory(
            DirectoryError::DepartmentNotFound { id },
        ))
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<u64, InternalError> {
        let result = department::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_department", e))?;

        Ok(result.rows_affected)
    }
}
