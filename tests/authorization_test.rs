mod common;

use std::sync::Arc;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use ems_backend::api::helpers::{authorize, ANY_AUTHENTICATED, STAFF_ROLES};
use ems_backend::errors::ApiError;
use ems_backend::services::{LocalStoreAuthorityResolver, TokenService};
use ems_backend::stores::{RoleStore, UserStore};
use ems_backend::types::db::user;
use ems_backend::types::internal::TokenClaims;

use common::{grant_role, setup_test_db, test_claims};

const SECRET: &str = "test-secret-key-minimum-32-characters-long";

fn mint(claims: &TokenClaims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("Failed to encode test token")
}

async fn setup_gate() -> (
    DatabaseConnection,
    TokenService,
    LocalStoreAuthorityResolver,
) {
    let db = setup_test_db().await;
    let token_service = TokenService::new(SECRET.to_string(), None, None);
    let resolver = LocalStoreAuthorityResolver::new(
        Arc::new(UserStore::new(db.clone())),
        Arc::new(RoleStore::new(db.clone())),
    );
    (db, token_service, resolver)
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (_db, token_service, resolver) = setup_gate().await;

    let result = authorize(&token_service, &resolver, "not-a-jwt", &STAFF_ROLES).await;
    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn default_role_cannot_reach_staff_endpoints() {
    let (_db, token_service, resolver) = setup_gate().await;

    let token = mint(&test_claims(Some("a@x.com"), "google-1", Some("Alice")));
    let result = authorize(&token_service, &resolver, &token, &STAFF_ROLES).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn granted_staff_role_passes_the_gate() {
    let (db, token_service, resolver) = setup_gate().await;

    let token = mint(&test_claims(Some("hr@x.com"), "google-2", None));

    // First pass provisions the account with the default role only
    authorize(&token_service, &resolver, &token, &ANY_AUTHENTICATED)
        .await
        .expect("Authenticated-only gate should pass");

    let provisioned = user::Entity::find()
        .filter(user::Column::Email.eq("hr@x.com"))
        .one(&db)
        .await
        .expect("Failed to query users")
        .expect("User should exist");
    grant_role(&db, provisioned.id, "HR").await;

    authorize(&token_service, &resolver, &token, &STAFF_ROLES)
        .await
        .expect("HR role should pass the staff gate");
}

#[tokio::test]
async fn empty_requirement_admits_any_verified_token() {
    let (_db, token_service, resolver) = setup_gate().await;

    let token = mint(&test_claims(Some("b@x.com"), "google-3", None));
    authorize(&token_service, &resolver, &token, &ANY_AUTHENTICATED)
        .await
        .expect("Any verified token should pass an ungated endpoint");
}
