mod common;

use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use ems_backend::errors::internal::UserError;
use ems_backend::errors::InternalError;
use ems_backend::services::{AuthorityResolver, LocalStoreAuthorityResolver};
use ems_backend::stores::{RoleStore, UserStore};
use ems_backend::types::db::{role, user};

use common::{grant_role, setup_test_db, test_claims};

async fn setup_resolver() -> (sea_orm::DatabaseConnection, LocalStoreAuthorityResolver) {
    let db = setup_test_db().await;
    let resolver = LocalStoreAuthorityResolver::new(
        Arc::new(UserStore::new(db.clone())),
        Arc::new(RoleStore::new(db.clone())),
    );
    (db, resolver)
}

#[tokio::test]
async fn first_resolution_provisions_exactly_one_user() {
    let (db, resolver) = setup_resolver().await;
    let claims = test_claims(Some("a@x.com"), "google-1", Some("Alice"));

    let authorities = resolver
        .resolve_authorities(&claims)
        .await
        .expect("Resolution should succeed");

    let expected: HashSet<String> = ["ROLE_USER".to_string()].into_iter().collect();
    assert_eq!(authorities, expected);

    let created = user::Entity::find()
        .filter(user::Column::Email.eq("a@x.com"))
        .one(&db)
        .await
        .expect("Failed to query users")
        .expect("User should have been provisioned");
    assert_eq!(created.external_id, "google-1");
    assert_eq!(created.name.as_deref(), Some("Alice"));

    // Resolving the same identity again must not create a second user
    resolver
        .resolve_authorities(&claims)
        .await
        .expect("Second resolution should succeed");

    let user_count = user::Entity::find()
        .count(&db)
        .await
        .expect("Failed to count users");
    assert_eq!(user_count, 1);
}

#[tokio::test]
async fn authorities_carry_all_roles_with_prefix() {
    let (db, resolver) = setup_resolver().await;
    let claims = test_claims(Some("hr@x.com"), "google-2", None);

    resolver
        .resolve_authorities(&claims)
        .await
        .expect("Provisioning should succeed");

    let user = user::Entity::find()
        .filter(user::Column::Email.eq("hr@x.com"))
        .one(&db)
        .await
        .expect("Failed to query users")
        .expect("User should exist");
    grant_role(&db, user.id, "ADMIN").await;
    grant_role(&db, user.id, "HR").await;

    let authorities = resolver
        .resolve_authorities(&claims)
        .await
        .expect("Resolution should succeed");

    let expected: HashSet<String> = ["ROLE_USER", "ROLE_ADMIN", "ROLE_HR"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(authorities, expected);
}

#[tokio::test]
async fn profile_refresh_updates_name_but_not_authorities() {
    let (db, resolver) = setup_resolver().await;

    let before = test_claims(Some("b@x.com"), "google-3", Some("Old"));
    let first = resolver
        .resolve_authorities(&before)
        .await
        .expect("Provisioning should succeed");

    let after = test_claims(Some("b@x.com"), "google-3", Some("New"));
    let second = resolver
        .resolve_authorities(&after)
        .await
        .expect("Resolution should succeed");

    assert_eq!(first, second);

    let user = user::Entity::find()
        .filter(user::Column::Email.eq("b@x.com"))
        .one(&db)
        .await
        .expect("Failed to query users")
        .expect("User should exist");
    assert_eq!(user.name.as_deref(), Some("New"));
    assert_eq!(user.version, 1);
}

#[tokio::test]
async fn lookup_falls_back_to_external_id() {
    let (db, resolver) = setup_resolver().await;

    // Provision with no email claim, then authenticate with an email the
    // store has never seen; the external id must find the same account.
    let no_email = test_claims(None, "google-4", Some("Carol"));
    resolver
        .resolve_authorities(&no_email)
        .await
        .expect("Provisioning should succeed");

    let with_email = test_claims(Some("carol@x.com"), "google-4", Some("Carol"));
    resolver
        .resolve_authorities(&with_email)
        .await
        .expect("Resolution should succeed");

    let user_count = user::Entity::find()
        .count(&db)
        .await
        .expect("Failed to count users");
    assert_eq!(user_count, 1);
}

#[tokio::test]
async fn missing_default_role_fails_hard() {
    let (db, resolver) = setup_resolver().await;

    role::Entity::delete_many()
        .filter(role::Column::Name.eq("USER"))
        .exec(&db)
        .await
        .expect("Failed to delete seeded role");

    let claims = test_claims(Some("c@x.com"), "google-5", None);
    let result = resolver.resolve_authorities(&claims).await;

    assert!(matches!(
        result,
        Err(InternalError::User(UserError::DefaultRoleMissing { .. }))
    ));
}

#[tokio::test]
async fn identityless_claims_resolve_to_no_authorities() {
    let (db, resolver) = setup_resolver().await;

    let claims = test_claims(None, "", None);
    let authorities = resolver
        .resolve_authorities(&claims)
        .await
        .expect("Resolution should succeed");

    assert!(authorities.is_empty());

    let user_count = user::Entity::find()
        .count(&db)
        .await
        .expect("Failed to count users");
    assert_eq!(user_count, 0);
}
