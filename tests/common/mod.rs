// Common test utilities for integration tests

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};

use ems_backend::types::db::{role, user_role};
use ems_backend::types::internal::TokenClaims;

/// Creates a test database with migrations (and the role seed) applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Builds verified-looking claims for resolver tests
pub fn test_claims(email: Option<&str>, sub: &str, name: Option<&str>) -> TokenClaims {
    let now = Utc::now().timestamp();
    TokenClaims {
        sub: sub.to_string(),
        email: email.map(str::to_string),
        name: name.map(str::to_string),
        picture: None,
        exp: now + 600,
        iat: now,
        iss: None,
        aud: None,
    }
}

/// Grants an additional role to an existing user
pub async fn grant_role(db: &DatabaseConnection, user_id: i64, role_name: &str) {
    let role = role::Entity::find()
        .filter(role::Column::Name.eq(role_name))
        .one(db)
        .await
        .expect("Failed to query role")
        .expect("Role should be seeded");

    user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role.id),
    }
    .insert(db)
    .await
    .expect("Failed to grant role");
}
