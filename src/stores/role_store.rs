use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::InternalError;
use crate::types::db::role;
use crate::types::internal::RoleName;

/// Read access to the fixed role reference table
///
/// Roles are seeded by the migration and never mutated at runtime.
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_name(&self, name: RoleName) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }
}
