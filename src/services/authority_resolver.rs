use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::stores::{RoleStore, UserStore, UserWithRoles};
use crate::types::db::role;
use crate::types::internal::{RoleName, TokenClaims, AUTHORITY_PREFIX};

/// Maps verified token claims to the set of authority strings for that
/// identity
///
/// Two interchangeable strategies exist behind this capability: the local
/// user store (this module) and the remote user service
/// (`UserServiceClient`). Deployment configuration selects exactly one.
#[async_trait]
pub trait AuthorityResolver: Send + Sync {
    async fn resolve_authorities(
        &self,
        claims: &TokenClaims,
    ) -> Result<HashSet<String>, InternalError>;
}

/// Authority resolution backed by the local user store
///
/// Any previously-unseen verified identity is provisioned automatically with
/// the default USER role. There is no rate limit or approval gate on this
/// path; that policy is inherited as-is and flagged for product review.
pub struct LocalStoreAuthorityResolver {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
}

impl LocalStoreAuthorityResolver {
    pub fn new(user_store: Arc<UserStore>, role_store: Arc<RoleStore>) -> Self {
        Self {
            user_store,
            role_store,
        }
    }

    async fn provision_user(&self, claims: &TokenClaims) -> Result<UserWithRoles, InternalError> {
        let default_role = self
            .role_store
            .find_by_name(RoleName::User)
            .await?
            .ok_or(UserError::DefaultRoleMissing {
                role: RoleName::User.as_str().to_string(),
            })?;

        tracing::info!(
            email = claims.email.as_deref().unwrap_or("<none>"),
            external_id = %claims.sub,
            "Creating new user on first authentication"
        );

        self.user_store
            .create_with_role(
                claims.email.clone().filter(|e| !e.is_empty()),
                claims.sub.clone(),
                claims.name.clone(),
                claims.picture.clone(),
                &default_role,
            )
            .await
    }

    /// Keep profile metadata fresh without an explicit update endpoint
    ///
    /// Only non-empty claims that differ from the stored values trigger a
    /// write. The write is version-guarded; a concurrent login that wins the
    /// race surfaces as a version conflict which this path does not retry.
    async fn refresh_profile(
        &self,
        found: &UserWithRoles,
        claims: &TokenClaims,
    ) -> Result<(), InternalError> {
        let claim_name = claims.name.as_deref().filter(|n| !n.is_empty());
        let claim_picture = claims.picture.as_deref().filter(|p| !p.is_empty());

        let name_changed = claim_name.is_some() && claim_name != found.user.name.as_deref();
        let picture_changed =
            claim_picture.is_some() && claim_picture != found.user.picture.as_deref();

        if !name_changed && !picture_changed {
            return Ok(());
        }

        let new_name = if name_changed {
            claim_name.map(str::to_string)
        } else {
            found.user.name.clone()
        };
        let new_picture = if picture_changed {
            claim_picture.map(str::to_string)
        } else {
            found.user.picture.clone()
        };

        self.user_store
            .update_profile(&found.user, new_name, new_picture)
            .await
    }
}

#[async_trait]
impl AuthorityResolver for LocalStoreAuthorityResolver {
    async fn resolve_authorities(
        &self,
        claims: &TokenClaims,
    ) -> Result<HashSet<String>, InternalError> {
        // Without an identity key there is nothing to look up or provision.
        // Authentication already succeeded upstream; the request proceeds
        // with no authorities.
        if claims.has_no_identity() {
            tracing::warn!("Token carries neither email nor subject, returning no authorities");
            return Ok(HashSet::new());
        }

        let email = claims.email.as_deref().filter(|e| !e.is_empty());

        // Email first, external subject id as fallback
        let mut found = None;
        if let Some(email) = email {
            found = self.user_store.find_by_email_with_roles(email).await?;
        }
        if found.is_none() && !claims.sub.is_empty() {
            found = self
                .user_store
                .find_by_external_id_with_roles(&claims.sub)
                .await?;
        }

        let resolved = match found {
            None => self.provision_user(claims).await?,
            Some(found) => {
                self.refresh_profile(&found, claims).await?;
                found
            }
        };

        Ok(authorities_from_roles(&resolved.roles))
    }
}

/// Map a role set to prefixed authority strings
pub fn authorities_from_roles(roles: &[role::Model]) -> HashSet<String> {
    roles
        .iter()
        .map(|role| format!("{}{}", AUTHORITY_PREFIX, role.name))
        .collect()
}
