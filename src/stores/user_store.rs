use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};

use crate::errors::internal::DatabaseError;
use crate::errors::InternalError;
use crate::types::db::{role, user, user_role};

/// A user together with its resolved role set
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: user::Model,
    pub roles: Vec<role::Model>,
}

/// Data access for identity records
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up a user by email, loading its role set in the same query
    pub async fn find_by_email_with_roles(
        &self,
        email: &str,
    ) -> Result<Option<UserWithRoles>, InternalError> {
        let mut rows = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email_with_roles", e))?;

        Ok(rows
            .pop()
            .map(|(user, roles)| UserWithRoles { user, roles }))
    }

    /// Look up a user by external subject id, loading its role set
    pub async fn find_by_external_id_with_roles(
        &self,
        external_id: &str,
    ) -> Result<Option<UserWithRoles>, InternalError> {
        let mut rows = user::Entity::find()
            .filter(user::Column::ExternalId.eq(external_id))
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_external_id_with_roles", e))?;

        Ok(rows
            .pop()
            .map(|(user, roles)| UserWithRoles { user, roles }))
    }

    /// Persist a new user and grant it the given role in one transaction
    ///
    /// A user row without its role membership must never be observable.
    pub async fn create_with_role(
        &self,
        email: Option<String>,
        external_id: String,
        name: Option<String>,
        picture: Option<String>,
        role: &role::Model,
    ) -> Result<UserWithRoles, InternalError> {
        let now = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let new_user = user::ActiveModel {
            email: Set(email),
            external_id: Set(external_id),
            name: Set(name),
            picture: Set(picture),
            created_at: Set(now),
            updated_at: Set(now),
            version: Set(0),
            ..Default::default()
        };

        let user = new_user
            .insert(&txn)
            .await
            .map_err(|e| InternalError::database("insert_user", e))?;

        let membership = user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(role.id),
        };
        membership
            .insert(&txn)
            .await
            .map_err(|e| InternalError::database("insert_user_role", e))?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        Ok(UserWithRoles {
            user,
            roles: vec![role.clone()],
        })
    }

    /// Update profile metadata (name, picture) for an existing user
    ///
    /// The update is guarded by the row's version counter. A concurrent writer
    /// that got there first causes a `VersionConflict`; callers on the
    /// authentication path do not retry (known gap, inherited policy).
    pub async fn update_profile(
        &self,
        current: &user::Model,
        name: Option<String>,
        picture: Option<String>,
    ) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();

        let result = user::Entity::update_many()
            .col_expr(user::Column::Name, Expr::value(name))
            .col_expr(user::Column::Picture, Expr::value(picture))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .col_expr(user::Column::Version, Expr::value(current.version + 1))
            .filter(user::Column::Id.eq(current.id))
            .filter(user::Column::Version.eq(current.version))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_user_profile", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::Database(DatabaseError::VersionConflict {
                entity: "user",
                id: current.id,
            }));
        }

        Ok(())
    }
}
